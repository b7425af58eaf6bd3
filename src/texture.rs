//! Procedural 3D textures evaluated at surface hit positions.
//!
//! Textures are tagged descriptors rather than closures so materials stay
//! trivially shareable across render workers.

use glam::Vec3A;

/// Procedural texture resolved at scene load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Texture {
    /// Unit checkerboard over the xy plane.
    Checkerboard,

    /// Repeating grid of dots and lines.
    DotsNLines {
        /// Repeat distance of the pattern.
        period: f32,
        /// Line width within one period.
        width: f32,
    },
}

/// Default repeat distance for [`Texture::DotsNLines`].
pub const DEFAULT_PERIOD: f32 = 1.0;

/// Default line width for [`Texture::DotsNLines`].
pub const DEFAULT_WIDTH: f32 = 0.125;

impl Texture {
    /// Resolve the base color at a 3D position.
    ///
    /// The pattern intensity blends from `secondary` (0) to `primary` (1);
    /// the default white/black material colors reproduce a grayscale
    /// pattern.
    pub fn color_at(&self, position: Vec3A, primary: Vec3A, secondary: Vec3A) -> Vec3A {
        let intensity = match *self {
            Texture::Checkerboard => checkerboard_3d(position),
            Texture::DotsNLines { period, width } => dotsnlines_3d(position, period, width),
        };
        secondary.lerp(primary, intensity)
    }
}

fn checkerboard_3d(position: Vec3A) -> f32 {
    let x = position.x.floor();
    let y = position.y.floor();
    let on = ((x + y) % 2.0).abs() < 1.0;
    if on {
        1.0
    } else {
        0.0
    }
}

fn dotsnlines_3d(position: Vec3A, period: f32, width: f32) -> f32 {
    let p = period;
    let w = width;
    let z_value = (position.z % p + p / 2.0).floor();

    let x_value = (position.x % p + w).floor();
    let y_value = ((position.y + z_value) % p + w).floor();
    x_value * y_value
}
