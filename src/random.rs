//! Deterministic sampling helpers.
//!
//! Every random stream in the renderer is an explicitly seeded ChaCha20
//! generator, so identical scenes produce identical images regardless of
//! thread count or scheduling. These helpers take the generator as an
//! argument instead of reaching for ambient state.

use glam::Vec3A;
use rand::Rng;

/// Rejection-sample a point from [-1, 1)³ until it falls within the unit
/// ball.
pub fn vec_in_unit_ball(rng: &mut impl Rng) -> Vec3A {
    loop {
        let candidate = Vec3A::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if candidate.length() <= 1.0 {
            return candidate;
        }
    }
}

/// Unit direction sampled uniformly from the downward (y <= 0) hemisphere.
pub fn downward_hemisphere_dir(rng: &mut impl Rng) -> Vec3A {
    loop {
        let candidate = Vec3A::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let length = candidate.length();
        if length <= 1.0 && candidate.y <= 0.0 && length > 0.0 {
            return candidate / length;
        }
    }
}
