//! Photon map for caustic lighting.
//!
//! Before rendering, each light shoots photons into the hemisphere below
//! it. A photon is only recorded when it lands on an opaque surface after
//! passing through at least one refractive interface, which restricts the
//! stored energy to caustics. The map is owned by the renderer and
//! read-only while rendering.

use glam::Vec3A;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::geometry::{refracted, Primitive};
use crate::random;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::{BACKOFF, MAX_DEPTH};

/// A photon recorded on a surface.
#[derive(Debug, Clone, Copy)]
pub struct Photon {
    /// Surface position where the photon landed.
    pub position: Vec3A,

    /// Incoming travel direction.
    pub direction: Vec3A,

    /// Carried energy.
    pub energy: Vec3A,
}

/// Per-primitive photon lists, indexed like the scene geometry.
#[derive(Debug, Default)]
pub struct PhotonMap {
    sphere_photons: Vec<Vec<Photon>>,
    mesh_photons: Vec<Vec<Photon>>,
}

impl PhotonMap {
    /// An empty map shaped to the scene's geometry.
    pub fn empty(scene: &Scene) -> Self {
        Self {
            sphere_photons: vec![Vec::new(); scene.geometry.spheres.len()],
            mesh_photons: vec![Vec::new(); scene.geometry.meshes.len()],
        }
    }

    /// Photons recorded on the given sphere.
    pub fn sphere_photons(&self, index: usize) -> &[Photon] {
        &self.sphere_photons[index]
    }

    /// Photons recorded on the given mesh.
    pub fn mesh_photons(&self, index: usize) -> &[Photon] {
        &self.mesh_photons[index]
    }

    /// Total number of stored photons.
    pub fn len(&self) -> usize {
        self.sphere_photons.iter().map(Vec::len).sum::<usize>()
            + self.mesh_photons.iter().map(Vec::len).sum::<usize>()
    }

    /// Whether the map holds no photons at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a photon to the given primitive's list.
    pub fn record(&mut self, primitive: Primitive, photon: Photon) {
        match primitive {
            Primitive::Sphere(index) => self.sphere_photons[index].push(photon),
            Primitive::Mesh { mesh, .. } => self.mesh_photons[mesh].push(photon),
        }
    }

    /// Shoot photons from every light and record the caustic hits.
    ///
    /// Each light gets its own seeded stream, so the map is deterministic
    /// for a given scene.
    pub fn build(scene: &Scene) -> Self {
        let mut map = Self::empty(scene);

        let total: u64 = scene.lights.iter().map(|l| u64::from(l.photon_samples)).sum();
        info!(
            "Shooting {} photons from {} lights...",
            total,
            scene.lights.len()
        );
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap(),
        );

        for (light_index, light) in scene.lights.iter().enumerate() {
            if light.photon_samples == 0 {
                continue;
            }
            let mut rng = ChaCha20Rng::seed_from_u64(light_index as u64);
            let energy = light.color * light.intensity / light.photon_samples as f32;
            for _ in 0..light.photon_samples {
                let direction = random::downward_hemisphere_dir(&mut rng);
                let ray = Ray::new(light.position, direction);
                map.walk(scene, &ray, energy, 1.0, false, 0);
                pb.inc(1);
            }
        }
        pb.finish();

        info!("Photon map holds {} caustic photons", map.len());
        map
    }

    /// One step of the photon walk.
    ///
    /// `indirect` is set once the photon has crossed a refractive
    /// interface; only indirect photons are recorded.
    fn walk(
        &mut self,
        scene: &Scene,
        ray: &Ray,
        energy: Vec3A,
        current_refractive_index: f32,
        indirect: bool,
        depth: u32,
    ) {
        let Some(hit) = scene.geometry.nearest_hit(ray) else {
            return;
        };

        let material = scene.material_for(hit.primitive);
        let pos = ray.position_at(hit.t - BACKOFF);

        if material.translucence() > 0.0 {
            if depth >= MAX_DEPTH {
                return;
            }
            let mut normal = hit.normal_at(&scene.geometry, pos);
            if normal.dot(ray.direction) > 0.0 {
                normal = -normal;
            }
            let direction = refracted(
                ray.direction,
                normal,
                current_refractive_index,
                material.refractive_index,
            );
            let inside_pos = ray.position_at(hit.t + BACKOFF);
            let next = Ray::new(inside_pos, direction);
            self.walk(
                scene,
                &next,
                energy,
                material.refractive_index,
                true,
                depth + 1,
            );
        } else if indirect {
            self.record(
                hit.primitive,
                Photon {
                    position: pos,
                    direction: ray.direction,
                    energy,
                },
            );
        }
    }
}
