//! The recursive shading integrator.
//!
//! `cast_ray` composes direct Phong lighting, ambient light, mirror
//! reflection, refraction through translucent dielectrics, and a photon-map
//! gather for caustics, under a fixed recursion bound. Shadow probes reuse
//! the same entry point with [`CastPolicy::ToLight`].

use glam::Vec3A;
use log::warn;

use crate::geometry::{reflected, refracted, Primitive};
use crate::photon::PhotonMap;
use crate::ray::Ray;
use crate::scene::Scene;

/// Maximum recursion depth for reflection and refraction rays.
pub const MAX_DEPTH: u32 = 10;

/// Displacement along the ray pulling hit positions off the surface they
/// hit, so follow-up rays do not re-intersect it.
pub const BACKOFF: f32 = 1e-3;

/// What a hit means to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastPolicy {
    /// Evaluate full shading at the nearest hit.
    ToObject,

    /// Shadow probe: any hit means the origin is occluded.
    ToLight,
}

/// Trace a ray through the scene and return its color contribution.
///
/// `default_color` is returned when nothing is hit: the background for
/// object rays, the light's color for shadow probes. The result is not
/// clamped; clamping is a whole-image post-pass.
pub fn cast_ray(
    ray: &Ray,
    scene: &Scene,
    photon_map: &PhotonMap,
    default_color: Vec3A,
    policy: CastPolicy,
    current_refractive_index: f32,
    depth: u32,
) -> Vec3A {
    let Some(hit) = scene.geometry.nearest_hit(ray) else {
        return default_color;
    };

    if policy == CastPolicy::ToLight {
        // anything between the surface and the light occludes it,
        // translucent or not; caustics come back in through the photon map
        return Vec3A::ZERO;
    }

    let material = scene.material_for(hit.primitive);
    let solid = material.solid_component();
    let translucence = material.translucence();

    let pos = ray.position_at(hit.t - BACKOFF);
    let base_color = material.base_color_at(pos);
    let normal = hit.normal_at(&scene.geometry, pos);

    let mut color = Vec3A::ZERO;

    if solid > 0.0 {
        let mut light_total = Vec3A::ZERO;
        for light in &scene.lights {
            let light_dir = (light.position - pos).normalize();
            let shadow_ray = Ray::new(pos, light_dir);
            let one_light_color = cast_ray(
                &shadow_ray,
                scene,
                photon_map,
                light.color,
                CastPolicy::ToLight,
                current_refractive_index,
                depth + 1,
            );

            if one_light_color != Vec3A::ZERO
                && (material.k_matte > 0.0 || material.k_specular > 0.0)
            {
                let matte = normal.dot(light_dir).max(0.0);
                let specular_dir = reflected(light_dir, normal);
                let specular = specular_dir
                    .dot(ray.direction)
                    .max(0.0)
                    .powf(material.k_specular_n);
                light_total +=
                    one_light_color * (material.k_matte * matte + material.k_specular * specular);
            }
            light_total += material.k_flat * one_light_color;

            if scene.photon_mapping && one_light_color == Vec3A::ZERO {
                light_total += gather_photons(photon_map, hit.primitive, pos, normal);
            }
        }

        color += solid * base_color * light_total;
        color += solid * base_color * material.k_ambient * scene.ambient_light;
    }

    if material.reflectivity > 0.0 && depth < MAX_DEPTH {
        let reflect_ray = Ray::new(pos, reflected(ray.direction, normal));
        let reflected_color = cast_ray(
            &reflect_ray,
            scene,
            photon_map,
            default_color,
            CastPolicy::ToObject,
            current_refractive_index,
            depth + 1,
        );
        color += material.reflectivity * material.color * reflected_color;
    }

    if translucence > 0.0 {
        if depth < MAX_DEPTH {
            let inside_pos = ray.position_at(hit.t + BACKOFF);
            let mut refraction_normal = normal;
            if refraction_normal.dot(ray.direction) > 0.0 {
                refraction_normal = -refraction_normal; // leaving the volume
            }
            // total internal reflection yields a non-finite direction; the
            // recursion then hits nothing and contributes the background
            let direction = refracted(
                ray.direction,
                refraction_normal,
                current_refractive_index,
                material.refractive_index,
            );
            let refracted_ray = Ray::new(inside_pos, direction);
            let refracted_color = cast_ray(
                &refracted_ray,
                scene,
                photon_map,
                default_color,
                CastPolicy::ToObject,
                material.refractive_index,
                depth + 1,
            );
            color += translucence * material.color * refracted_color;
        } else {
            warn!("refraction depth limit reached, dropping contribution");
        }
    }

    color
}

/// Caustic energy from the primitive's stored photons near `pos`.
fn gather_photons(
    photon_map: &PhotonMap,
    primitive: Primitive,
    pos: Vec3A,
    normal: Vec3A,
) -> Vec3A {
    let photons = match primitive {
        Primitive::Sphere(index) => photon_map.sphere_photons(index),
        Primitive::Mesh { mesh, .. } => photon_map.mesh_photons(mesh),
    };

    let mut total = Vec3A::ZERO;
    for photon in photons {
        let distance = pos.distance(photon.position);
        if distance < 1.0 {
            total += photon.energy
                * (1.0 - distance).sqrt()
                * normal.dot(-photon.direction).max(0.0);
        }
    }
    total
}
