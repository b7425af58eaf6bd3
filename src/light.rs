//! Point lights and sphere-light expansion.

use std::f32::consts::PI;

use glam::Vec3A;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::random;

/// Default photon count per light for the caustic pre-pass.
pub const DEFAULT_PHOTON_SAMPLES: u32 = 10_000;

/// Point light sample.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    /// Position in world space.
    pub position: Vec3A,

    /// Emitted color; channels are non-negative.
    pub color: Vec3A,

    /// Energy multiplier for photon shooting.
    pub intensity: f32,

    /// Photons shot from this light when photon mapping is enabled.
    pub photon_samples: u32,
}

impl Light {
    /// Create a point light with default photon-shooting parameters.
    pub fn new(position: Vec3A, color: Vec3A) -> Self {
        Self {
            position,
            color,
            intensity: 1.0,
            photon_samples: DEFAULT_PHOTON_SAMPLES,
        }
    }
}

/// Expand a sphere light into point-light samples distributed uniformly
/// within its volume.
///
/// The sample count is ⌊4/3·π·r³·density⌋ and each sample carries
/// color / count, so total emission is independent of density. The
/// expansion is deterministic for a given seed.
pub fn expand_sphere_light(
    center: Vec3A,
    color: Vec3A,
    radius: f32,
    density: f32,
    seed: u64,
) -> Vec<Light> {
    let volume = 4.0 / 3.0 * PI * radius * radius * radius;
    let count = (volume * density) as usize;
    if count == 0 {
        return Vec::new();
    }

    let per_point_color = color / count as f32;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut lights = Vec::with_capacity(count);
    while lights.len() < count {
        let candidate = random::vec_in_unit_ball(&mut rng);
        lights.push(Light {
            position: center + radius * candidate,
            color: per_point_color,
            intensity: 1.0,
            photon_samples: DEFAULT_PHOTON_SAMPLES,
        });
    }
    lights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_count_follows_volume_and_density() {
        let samples = expand_sphere_light(Vec3A::ZERO, Vec3A::ONE, 2.0, 1.5, 0);
        let expected = (4.0 / 3.0 * PI * 8.0 * 1.5) as usize;
        assert_eq!(samples.len(), expected);
    }

    #[test]
    fn samples_share_the_light_energy() {
        let color = Vec3A::new(3.0, 6.0, 9.0);
        let samples = expand_sphere_light(Vec3A::ZERO, color, 1.5, 1.0, 0);
        let count = samples.len() as f32;
        for light in &samples {
            assert!(light.color.distance(color / count) < 1e-6);
        }
    }

    #[test]
    fn samples_stay_within_the_sphere() {
        let center = Vec3A::new(1.0, -2.0, 3.0);
        let radius = 2.5;
        let samples = expand_sphere_light(center, Vec3A::ONE, radius, 1.0, 3);
        for light in &samples {
            assert!(light.position.distance(center) <= radius + 1e-4);
        }
    }

    #[test]
    fn expansion_is_deterministic_on_seed() {
        let a = expand_sphere_light(Vec3A::ZERO, Vec3A::ONE, 1.0, 2.0, 9);
        let b = expand_sphere_light(Vec3A::ZERO, Vec3A::ONE, 1.0, 2.0, 9);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn tiny_sphere_light_expands_to_nothing() {
        let samples = expand_sphere_light(Vec3A::ZERO, Vec3A::ONE, 0.1, 1.0, 0);
        assert!(samples.is_empty());
    }
}
