//! Parametric rays.

use glam::Vec3A;

/// A half-line through the scene, parameterized as origin + t * direction.
///
/// Directions are kept unit length so the parameter t doubles as a
/// distance; the intersection routines debug-assert this.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Where the ray starts.
    pub origin: Vec3A,

    /// Unit travel direction.
    pub direction: Vec3A,
}

impl Ray {
    /// Build a ray from a start point and a unit direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Point reached after traveling t along the direction.
    pub fn position_at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}
