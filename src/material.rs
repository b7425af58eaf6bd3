//! Surface material coefficients.

use glam::Vec3A;

use crate::texture::Texture;

/// Per-surface shading coefficients.
///
/// Invariant: `0 <= reflectivity <= opacity <= 1`, so the solid component
/// never goes negative.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Primary surface color.
    pub color: Vec3A,

    /// Secondary color used by two-tone textures.
    pub secondary_color: Vec3A,

    /// Optional procedural texture overriding `color` per position.
    pub texture: Option<Texture>,

    /// Fraction of light that does not pass through the surface, in [0, 1].
    pub opacity: f32,

    /// Refractive index of the volume behind the surface, at least 1.
    pub refractive_index: f32,

    /// Mirror reflection coefficient, in [0, opacity].
    pub reflectivity: f32,

    /// Ambient light coefficient.
    pub k_ambient: f32,

    /// Lambertian (matte) coefficient.
    pub k_matte: f32,

    /// Specular highlight coefficient.
    pub k_specular: f32,

    /// Specular exponent. Integral by the scene-load contract, kept as a
    /// float for the pow call.
    pub k_specular_n: f32,

    /// Flat (shadow-only) light coefficient.
    pub k_flat: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3A::ONE,
            secondary_color: Vec3A::ZERO,
            texture: None,
            opacity: 1.0,
            refractive_index: 1.0,
            reflectivity: 0.0,
            k_ambient: 1.0,
            k_matte: 0.0,
            k_specular: 0.0,
            k_specular_n: 2.0,
            k_flat: 1.0,
        }
    }
}

impl Material {
    /// Fraction of incoming light shaded as a solid surface.
    pub fn solid_component(&self) -> f32 {
        self.opacity - self.reflectivity
    }

    /// Fraction of light transmitted through the surface.
    pub fn translucence(&self) -> f32 {
        1.0 - self.opacity
    }

    /// Base color at a position: texture lookup when present, else `color`.
    pub fn base_color_at(&self, position: Vec3A) -> Vec3A {
        match self.texture {
            Some(texture) => texture.color_at(position, self.color, self.secondary_color),
            None => self.color,
        }
    }
}
