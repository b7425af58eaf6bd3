//! Runtime scene description.
//!
//! A [`Scene`] is immutable once loaded and is shared by reference across
//! render workers and the photon pre-pass.

use glam::Vec3A;

use crate::geometry::{Geometry, Primitive};
use crate::light::Light;
use crate::material::Material;

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    /// Horizontal pixel count.
    pub x: u32,

    /// Vertical pixel count.
    pub y: u32,
}

/// Fully resolved scene: observer, screen rectangle, geometry, materials,
/// and lights.
#[derive(Debug)]
pub struct Scene {
    /// Output resolution.
    pub res: Resolution,

    /// Rays cast per pixel.
    pub sample_count: u32,

    /// Whether the photon pre-pass runs and its gather contributes light.
    pub photon_mapping: bool,

    /// Eye position.
    pub observer: Vec3A,

    /// Top-left corner of the screen rectangle in world space.
    pub screen_top_left: Vec3A,

    /// Top-right corner of the screen rectangle.
    pub screen_top_right: Vec3A,

    /// Bottom-right corner of the screen rectangle.
    pub screen_bottom_right: Vec3A,

    /// Spheres and meshes.
    pub geometry: Geometry,

    /// Materials aligned 1:1 with `geometry.spheres`.
    pub sphere_materials: Vec<Material>,

    /// Materials aligned 1:1 with `geometry.meshes`.
    pub mesh_materials: Vec<Material>,

    /// Point lights, including expanded sphere-light samples.
    pub lights: Vec<Light>,

    /// Ambient light color.
    pub ambient_light: Vec3A,
}

impl Scene {
    /// Screen-space step between horizontally adjacent pixels.
    pub fn screen_offset_per_px_x(&self) -> Vec3A {
        (self.screen_top_right - self.screen_top_left) / (self.res.x + 1) as f32
    }

    /// Screen-space step between vertically adjacent pixels.
    pub fn screen_offset_per_px_y(&self) -> Vec3A {
        (self.screen_bottom_right - self.screen_top_right) / (self.res.y + 1) as f32
    }

    /// Material of the given primitive.
    pub fn material_for(&self, primitive: Primitive) -> &Material {
        match primitive {
            Primitive::Sphere(index) => &self.sphere_materials[index],
            Primitive::Mesh { mesh, .. } => &self.mesh_materials[mesh],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_scene() -> Scene {
        Scene {
            res: Resolution { x: 99, y: 49 },
            sample_count: 1,
            photon_mapping: false,
            observer: Vec3A::ZERO,
            screen_top_left: Vec3A::new(-5.0, 5.0, 1.0),
            screen_top_right: Vec3A::new(5.0, 5.0, 1.0),
            screen_bottom_right: Vec3A::new(5.0, -5.0, 1.0),
            geometry: Geometry::default(),
            sphere_materials: Vec::new(),
            mesh_materials: Vec::new(),
            lights: Vec::new(),
            ambient_light: Vec3A::ZERO,
        }
    }

    #[test]
    fn screen_offsets_divide_by_resolution_plus_one() {
        let scene = empty_scene();
        assert!(scene
            .screen_offset_per_px_x()
            .distance(Vec3A::new(0.1, 0.0, 0.0))
            < 1e-5);
        assert!(scene
            .screen_offset_per_px_y()
            .distance(Vec3A::new(0.0, -0.2, 0.0))
            < 1e-5);
    }
}
