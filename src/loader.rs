//! YAML scene file loading.
//!
//! The on-disk document is deserialized into mirror structs, then converted
//! and validated into the runtime [`Scene`]. Defaults and error messages
//! follow the scene-file format reference printed by `--scene-help`.

use std::fs;
use std::path::Path;

use glam::Vec3A;
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Geometry;
use crate::light::{self, Light};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::scene::{Resolution, Scene};
use crate::sphere::Sphere;
use crate::texture::{self, Texture};

/// Errors surfaced while loading a scene file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The scene file could not be read.
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid YAML or is missing a required field.
    #[error("failed to parse scene file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `k_specular_n` must be a whole number.
    #[error("fractional k_specular_n values not allowed")]
    FractionalSpecularExponent,

    /// The named texture is not one of the known procedural textures.
    #[error("unknown texture type: {0}")]
    UnknownTexture(String),

    /// Meshes can only be specified inline.
    #[error("external mesh files not supported: {0}")]
    ExternalMesh(String),

    /// An inline mesh needs at least its vertexes.
    #[error("inline mesh requires vertexes")]
    MeshWithoutVertexes,

    /// Mesh indices come in triangles.
    #[error("mesh index count {0} is not divisible by 3")]
    RaggedIndexes(usize),

    /// A mesh index referenced a vertex that does not exist.
    #[error("mesh index {index} out of range for {vertex_count} vertexes")]
    IndexOutOfRange {
        /// The offending index value.
        index: u32,
        /// Number of vertexes in the mesh.
        vertex_count: usize,
    },

    /// A sphere light needs a center (or position).
    #[error("sphere light requires center")]
    SphereLightWithoutCenter,
}

/// Scene file format reference printed by `--scene-help`.
pub const SCENE_HELP: &str = "\
Scene files are YAML documents with the following structure:

  observer: [x, y, z]          eye position (required)
  screen:                      world-space screen rectangle (required)
    top_left: [x, y, z]
    top_right: [x, y, z]
    bottom_right: [x, y, z]
  resolution: [width, height]  output size in pixels (required)
  samples: N                   rays per pixel (default 1)
  photon_mapping: bool         enable the caustic pre-pass (default false)

  geometry:                    (required; both lists optional)
    spheres:
      - center: [x, y, z]
        radius: R
        ...material keys...
    meshes:
      - vertexes: [[x, y, z], ...]
        indexes: [i, j, k, ...]   three per triangle (default 0..n)
        smooth: bool              interpolate vertex normals (default false)
        ...material keys...

  lights:                      (required; all lists optional)
    ambient: [r, g, b]         (default black)
    points:
      - position: [x, y, z]
        color: [r, g, b]
        intensity: F           photon energy multiplier (default 1)
        photon_samples: N      photons shot per light (default 10000)
    spheres:
      - center: [x, y, z]
        color: [r, g, b]
        radius: R
        density: D             samples per unit volume (default 1)
        seed: N                expansion RNG seed (default 0)

Material keys (all optional, listed with defaults):
  color: [1, 1, 1]             primary color
  secondary_color: [0, 0, 0]   secondary color for two-tone textures
  texture: checkerboard | dotsnlines
  period: 1.0                  dotsnlines repeat distance
  width: 0.125                 dotsnlines line width
  reflectivity: 0.0            mirror coefficient (or mirrored: bool)
  refractive_index: 1.0
  opacity: 1.0                 1 - opacity is transmitted
  k_ambient: 1.0
  k_matte: 0.0                 Lambertian coefficient
  k_specular: 0.0              specular coefficient
  k_specular_n: 2              specular exponent, must be an integer
  k_flat: 1 when matte and specular are both 0, else 0
";

fn default_samples() -> u32 {
    1
}

fn default_intensity() -> f32 {
    1.0
}

fn default_photon_samples() -> u32 {
    light::DEFAULT_PHOTON_SAMPLES
}

fn default_density() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct SceneDoc {
    observer: [f32; 3],
    screen: ScreenDoc,
    resolution: [u32; 2],
    #[serde(default = "default_samples")]
    samples: u32,
    #[serde(default)]
    photon_mapping: bool,
    geometry: GeometryDoc,
    lights: LightsDoc,
}

#[derive(Debug, Deserialize)]
struct ScreenDoc {
    top_left: [f32; 3],
    top_right: [f32; 3],
    bottom_right: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct GeometryDoc {
    #[serde(default)]
    spheres: Vec<SphereDoc>,
    #[serde(default)]
    meshes: Vec<MeshDoc>,
}

#[derive(Debug, Deserialize)]
struct SphereDoc {
    center: [f32; 3],
    radius: f32,
    #[serde(flatten)]
    material: MaterialDoc,
}

#[derive(Debug, Deserialize)]
struct MeshDoc {
    #[serde(default)]
    vertexes: Vec<[f32; 3]>,
    indexes: Option<Vec<u32>>,
    file: Option<String>,
    #[serde(default)]
    smooth: bool,
    #[serde(flatten)]
    material: MaterialDoc,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MaterialDoc {
    color: Option<[f32; 3]>,
    secondary_color: Option<[f32; 3]>,
    texture: Option<String>,
    period: Option<f32>,
    width: Option<f32>,
    reflectivity: Option<f32>,
    mirrored: Option<bool>,
    refractive_index: Option<f32>,
    opacity: Option<f32>,
    k_ambient: Option<f32>,
    k_matte: Option<f32>,
    k_specular: Option<f32>,
    k_specular_n: Option<f32>,
    k_flat: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct LightsDoc {
    #[serde(default)]
    ambient: Option<[f32; 3]>,
    #[serde(default)]
    points: Vec<PointLightDoc>,
    #[serde(default)]
    spheres: Vec<SphereLightDoc>,
}

#[derive(Debug, Deserialize)]
struct PointLightDoc {
    position: [f32; 3],
    color: [f32; 3],
    #[serde(default = "default_intensity")]
    intensity: f32,
    #[serde(default = "default_photon_samples")]
    photon_samples: u32,
}

#[derive(Debug, Deserialize)]
struct SphereLightDoc {
    center: Option<[f32; 3]>,
    position: Option<[f32; 3]>,
    color: [f32; 3],
    radius: f32,
    #[serde(default = "default_density")]
    density: f32,
    #[serde(default)]
    seed: u64,
}

impl MaterialDoc {
    fn into_material(self) -> Result<Material, LoadError> {
        let color = self.color.map(Vec3A::from).unwrap_or(Vec3A::ONE);
        let secondary_color = self.secondary_color.map(Vec3A::from).unwrap_or(Vec3A::ZERO);

        let texture = match self.texture.as_deref() {
            None => None,
            Some("checkerboard") => Some(Texture::Checkerboard),
            Some("dotsnlines") => Some(Texture::DotsNLines {
                period: self.period.unwrap_or(texture::DEFAULT_PERIOD),
                width: self.width.unwrap_or(texture::DEFAULT_WIDTH),
            }),
            Some(other) => return Err(LoadError::UnknownTexture(other.to_string())),
        };

        let reflectivity = match (self.reflectivity, self.mirrored) {
            (Some(value), _) => value,
            (None, Some(true)) => 1.0,
            _ => 0.0,
        };

        let k_matte = self.k_matte.unwrap_or(0.0);
        let k_specular = self.k_specular.unwrap_or(0.0);
        let k_specular_n = self.k_specular_n.unwrap_or(2.0);
        if k_specular_n.floor() != k_specular_n {
            return Err(LoadError::FractionalSpecularExponent);
        }
        let k_flat = self.k_flat.unwrap_or(if k_matte > 0.0 || k_specular > 0.0 {
            0.0
        } else {
            1.0
        });

        Ok(Material {
            color,
            secondary_color,
            texture,
            opacity: self.opacity.unwrap_or(1.0),
            refractive_index: self.refractive_index.unwrap_or(1.0),
            reflectivity,
            k_ambient: self.k_ambient.unwrap_or(1.0),
            k_matte,
            k_specular,
            k_specular_n,
            k_flat,
        })
    }
}

impl MeshDoc {
    fn into_mesh(self) -> Result<(Mesh, Material), LoadError> {
        if let Some(file) = self.file {
            return Err(LoadError::ExternalMesh(file));
        }
        if self.vertexes.is_empty() {
            return Err(LoadError::MeshWithoutVertexes);
        }

        let vertexes: Vec<Vec3A> = self.vertexes.into_iter().map(Vec3A::from).collect();
        let indexes = self
            .indexes
            .unwrap_or_else(|| (0..vertexes.len() as u32).collect());

        if indexes.len() % 3 != 0 {
            return Err(LoadError::RaggedIndexes(indexes.len()));
        }
        for &index in &indexes {
            if index as usize >= vertexes.len() {
                return Err(LoadError::IndexOutOfRange {
                    index,
                    vertex_count: vertexes.len(),
                });
            }
        }

        let material = self.material.into_material()?;
        Ok((Mesh::new(vertexes, indexes, self.smooth), material))
    }
}

impl SceneDoc {
    fn into_scene(self) -> Result<Scene, LoadError> {
        let mut geometry = Geometry::default();
        let mut sphere_materials = Vec::with_capacity(self.geometry.spheres.len());
        for sphere in self.geometry.spheres {
            let radius = sphere.radius;
            geometry
                .spheres
                .push(Sphere::new(Vec3A::from(sphere.center), radius * radius));
            sphere_materials.push(sphere.material.into_material()?);
        }

        let mut mesh_materials = Vec::with_capacity(self.geometry.meshes.len());
        for mesh in self.geometry.meshes {
            let (mesh, material) = mesh.into_mesh()?;
            geometry.meshes.push(mesh);
            mesh_materials.push(material);
        }

        let mut lights = Vec::new();
        for point in self.lights.points {
            lights.push(Light {
                position: Vec3A::from(point.position),
                color: Vec3A::from(point.color),
                intensity: point.intensity,
                photon_samples: point.photon_samples,
            });
        }
        for sphere in self.lights.spheres {
            let center = sphere
                .center
                .or(sphere.position)
                .ok_or(LoadError::SphereLightWithoutCenter)?;
            lights.extend(light::expand_sphere_light(
                Vec3A::from(center),
                Vec3A::from(sphere.color),
                sphere.radius,
                sphere.density,
                sphere.seed,
            ));
        }

        Ok(Scene {
            res: Resolution {
                x: self.resolution[0],
                y: self.resolution[1],
            },
            sample_count: self.samples,
            photon_mapping: self.photon_mapping,
            observer: Vec3A::from(self.observer),
            screen_top_left: Vec3A::from(self.screen.top_left),
            screen_top_right: Vec3A::from(self.screen.top_right),
            screen_bottom_right: Vec3A::from(self.screen.bottom_right),
            geometry,
            sphere_materials,
            mesh_materials,
            lights,
            ambient_light: self.lights.ambient.map(Vec3A::from).unwrap_or(Vec3A::ZERO),
        })
    }
}

/// Load and validate a scene from a YAML document in a string.
pub fn load_scene_from_str(document: &str) -> Result<Scene, LoadError> {
    let doc: SceneDoc = serde_yaml::from_str(document)?;
    doc.into_scene()
}

/// Load and validate a scene from a YAML file.
pub fn load_scene_from_file(path: impl AsRef<Path>) -> Result<Scene, LoadError> {
    let document = fs::read_to_string(path)?;
    load_scene_from_str(&document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
observer: [0, 0, -10]
screen:
  top_left: [-5, 5, 0]
  top_right: [5, 5, 0]
  bottom_right: [5, -5, 0]
resolution: [100, 100]
geometry:
  spheres:
    - center: [0, 0, 10]
      radius: 3
      color: [1, 0, 0]
lights:
  points:
    - position: [0, 0, -10]
      color: [1, 1, 1]
";

    #[test]
    fn minimal_scene_loads() {
        let scene = load_scene_from_str(MINIMAL).expect("valid scene");
        assert_eq!(scene.res.x, 100);
        assert_eq!(scene.sample_count, 1);
        assert!(!scene.photon_mapping);
        assert_eq!(scene.geometry.spheres.len(), 1);
        assert_eq!(scene.sphere_materials.len(), 1);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.ambient_light, Vec3A::ZERO);

        // radius is stored squared
        assert!((scene.geometry.spheres[0].radius_squared - 9.0).abs() < 1e-5);
        // material defaults: flat white falls back to the given color
        let material = &scene.sphere_materials[0];
        assert_eq!(material.color, Vec3A::new(1.0, 0.0, 0.0));
        assert_eq!(material.k_flat, 1.0);
        assert_eq!(material.opacity, 1.0);
    }

    #[test]
    fn missing_observer_names_the_field() {
        let doc = MINIMAL.replace("observer: [0, 0, -10]\n", "");
        let err = load_scene_from_str(&doc).unwrap_err();
        assert!(err.to_string().contains("observer"), "got: {err}");
    }

    #[test]
    fn fractional_specular_exponent_is_rejected() {
        let doc = MINIMAL.replace("radius: 3", "radius: 3\n      k_specular_n: 2.5");
        let err = load_scene_from_str(&doc).unwrap_err();
        assert!(matches!(err, LoadError::FractionalSpecularExponent));
    }

    #[test]
    fn mirrored_flag_maps_to_full_reflectivity() {
        let doc = MINIMAL.replace("radius: 3", "radius: 3\n      mirrored: true");
        let scene = load_scene_from_str(&doc).expect("valid scene");
        assert_eq!(scene.sphere_materials[0].reflectivity, 1.0);
    }

    #[test]
    fn k_flat_defaults_to_zero_with_matte_shading() {
        let doc = MINIMAL.replace("radius: 3", "radius: 3\n      k_matte: 0.8");
        let scene = load_scene_from_str(&doc).expect("valid scene");
        let material = &scene.sphere_materials[0];
        assert_eq!(material.k_flat, 0.0);
        assert_eq!(material.k_matte, 0.8);
    }

    #[test]
    fn unknown_texture_is_rejected() {
        let doc = MINIMAL.replace("radius: 3", "radius: 3\n      texture: swirl");
        let err = load_scene_from_str(&doc).unwrap_err();
        assert!(matches!(err, LoadError::UnknownTexture(name) if name == "swirl"));
    }

    #[test]
    fn dotsnlines_texture_reads_sibling_parameters() {
        let doc = MINIMAL.replace(
            "radius: 3",
            "radius: 3\n      texture: dotsnlines\n      period: 2.5",
        );
        let scene = load_scene_from_str(&doc).expect("valid scene");
        assert_eq!(
            scene.sphere_materials[0].texture,
            Some(Texture::DotsNLines {
                period: 2.5,
                width: texture::DEFAULT_WIDTH
            })
        );
    }

    #[test]
    fn mesh_without_indexes_gets_sequential_ones() {
        let doc = MINIMAL.replace(
            "lights:",
            "  meshes:\n    - vertexes:\n        - [-1, -1, 5]\n        - [1, -1, 5]\n        - [0, 1, 5]\nlights:",
        );
        let scene = load_scene_from_str(&doc).expect("valid scene");
        assert_eq!(scene.geometry.meshes[0].indexes, vec![0, 1, 2]);
        assert!(!scene.geometry.meshes[0].smooth);
    }

    #[test]
    fn external_mesh_file_is_rejected() {
        let doc = MINIMAL.replace(
            "lights:",
            "  meshes:\n    - file: bunny.obj\nlights:",
        );
        let err = load_scene_from_str(&doc).unwrap_err();
        assert!(matches!(err, LoadError::ExternalMesh(file) if file == "bunny.obj"));
    }

    #[test]
    fn out_of_range_mesh_index_is_rejected() {
        let doc = MINIMAL.replace(
            "lights:",
            "  meshes:\n    - vertexes:\n        - [-1, -1, 5]\n        - [1, -1, 5]\n        - [0, 1, 5]\n      indexes: [0, 1, 7]\nlights:",
        );
        let err = load_scene_from_str(&doc).unwrap_err();
        assert!(matches!(err, LoadError::IndexOutOfRange { index: 7, .. }));
    }

    #[test]
    fn sphere_lights_expand_into_point_samples() {
        let doc = MINIMAL.replace(
            "lights:\n",
            "lights:\n  spheres:\n    - center: [0, 5, 5]\n      color: [1, 1, 1]\n      radius: 2\n",
        );
        let scene = load_scene_from_str(&doc).expect("valid scene");
        let expected = (4.0 / 3.0 * std::f32::consts::PI * 8.0) as usize;
        // the original point light plus the expanded samples
        assert_eq!(scene.lights.len(), 1 + expected);
    }

    #[test]
    fn samples_and_photon_settings_are_honored() {
        let doc = MINIMAL
            .replace("resolution: [100, 100]", "resolution: [100, 100]\nsamples: 4\nphoton_mapping: true")
            .replace("color: [1, 1, 1]", "color: [1, 1, 1]\n      intensity: 3\n      photon_samples: 500");
        let scene = load_scene_from_str(&doc).expect("valid scene");
        assert_eq!(scene.sample_count, 4);
        assert!(scene.photon_mapping);
        assert_eq!(scene.lights[0].intensity, 3.0);
        assert_eq!(scene.lights[0].photon_samples, 500);
    }
}
