//! Row-major image buffer and PNG export.

use glam::Vec3A;
use log::info;
use thiserror::Error;

use ::image::{ImageBuffer, Rgb};

/// Errors from image construction or export.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The requested dimensions overflow the pixel index space.
    #[error("image too large: dimensions [{width},{height}] require {required} pixels")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Pixel count the dimensions would need.
        required: u64,
    },

    /// PNG encoding or file I/O failed.
    #[error("failed to save PNG: {0}")]
    Save(#[from] ::image::ImageError),
}

/// Row-major grid of linear RGB colors.
#[derive(Debug, Clone)]
pub struct Image {
    pixels: Vec<Vec3A>,
    width: u32,
    height: u32,
}

impl Image {
    /// Create a black image.
    ///
    /// Fails when `width * height` exceeds the pixel index space.
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        let required = width as u64 * height as u64;
        if required > u32::MAX as u64 {
            return Err(ImageError::TooLarge {
                width,
                height,
                required,
            });
        }
        Ok(Self {
            pixels: vec![Vec3A::ZERO; required as usize],
            width,
            height,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of the pixel at (x, y).
    pub fn px(&self, x: u32, y: u32) -> Vec3A {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Mutable access to the pixel at (x, y).
    pub fn px_mut(&mut self, x: u32, y: u32) -> &mut Vec3A {
        &mut self.pixels[(y * self.width + x) as usize]
    }

    /// Mutable row slices in top-to-bottom order, for handing disjoint rows
    /// to render workers.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Vec3A> {
        self.pixels.chunks_mut(self.width.max(1) as usize)
    }

    /// Clamp every channel to at most 1.0. Values below zero pass through.
    pub fn clamp_colors(&mut self) {
        for pixel in &mut self.pixels {
            *pixel = pixel.min(Vec3A::ONE);
        }
    }

    /// Encode as 8-bit RGB PNG and write to `path`.
    pub fn save_as_png(&self, path: &str) -> Result<(), ImageError> {
        let output: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(self.width, self.height, |x, y| {
                let pixel = self.px(x, y);
                Rgb([
                    (pixel.x * 255.0) as u8,
                    (pixel.y * 255.0) as u8,
                    (pixel.z * 255.0) as u8,
                ])
            });
        output.save(path)?;
        info!("Image saved as {}", path);
        Ok(())
    }
}
