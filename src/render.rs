//! Scanline-parallel renderer.
//!
//! A fixed pool of workers splits the image by row stride: worker i owns
//! rows i, i+W, i+2W, ... as disjoint mutable slices of the shared buffer,
//! so pixel writes need no synchronization. Each row gets a fresh PRNG
//! seeded by its index, which makes the output independent of the worker
//! count and of scheduling.

use std::thread;

use glam::Vec3A;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::image::{Image, ImageError};
use crate::photon::PhotonMap;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::{cast_ray, CastPolicy};

/// Render the scene into a new image using `threads` workers.
///
/// Rendering itself cannot fail; the only error is an output resolution
/// too large for the image buffer. A panic inside a worker propagates
/// when the pool is joined, before the image could be saved.
pub fn render(
    scene: &Scene,
    photon_map: &PhotonMap,
    threads: usize,
    progress: bool,
) -> Result<Image, ImageError> {
    let threads = threads.max(1);
    let mut image = Image::new(scene.res.x, scene.res.y)?;

    info!(
        "Rendering {}x{} at {} samples per pixel with {} threads...",
        scene.res.x, scene.res.y, scene.sample_count, threads
    );

    let mut assignments: Vec<Vec<(u32, &mut [Vec3A])>> =
        (0..threads).map(|_| Vec::new()).collect();
    for (y, row) in image.rows_mut().enumerate() {
        assignments[y % threads].push((y as u32, row));
    }

    thread::scope(|scope| {
        for (worker, rows) in assignments.into_iter().enumerate() {
            let report = progress && worker == 0;
            scope.spawn(move || render_rows(scene, photon_map, rows, report));
        }
    });

    Ok(image)
}

/// Render one worker's rows in place.
fn render_rows(
    scene: &Scene,
    photon_map: &PhotonMap,
    rows: Vec<(u32, &mut [Vec3A])>,
    report: bool,
) {
    let dx = scene.screen_offset_per_px_x();
    let dy = scene.screen_offset_per_px_y();
    let sample_scale = 1.0 / scene.sample_count.max(1) as f32;

    let mut last_percent = u32::MAX;
    for (y, row) in rows {
        if report {
            let percent = 100 * y / scene.res.y;
            if percent != last_percent {
                info!("{}%", percent);
                last_percent = percent;
            }
        }

        let mut rng = ChaCha20Rng::seed_from_u64(u64::from(y));
        for (x, pixel) in row.iter_mut().enumerate() {
            let mut color = Vec3A::ZERO;
            for _ in 0..scene.sample_count {
                let jitter_x: f32 = rng.random();
                let jitter_y: f32 = rng.random();
                let point = scene.screen_top_left
                    + (x as f32 + jitter_x) * dx
                    + (y as f32 + jitter_y) * dy;
                let ray = Ray::new(point, (point - scene.observer).normalize());
                color += cast_ray(
                    &ray,
                    scene,
                    photon_map,
                    Vec3A::ZERO,
                    CastPolicy::ToObject,
                    1.0,
                    0,
                );
            }
            *pixel = color * sample_scale;
        }
    }
}
