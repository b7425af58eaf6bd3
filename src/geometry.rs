//! Scene geometry container and direction helpers for reflection and
//! refraction.

use glam::Vec3A;

use crate::mesh::{nearest_mesh_hit, Mesh};
use crate::ray::Ray;
use crate::sphere::{nearest_sphere_hit, Sphere};

/// The scene's 3D shapes.
#[derive(Debug, Default)]
pub struct Geometry {
    /// Sphere primitives.
    pub spheres: Vec<Sphere>,

    /// Indexed triangle meshes.
    pub meshes: Vec<Mesh>,
}

/// Index of a primitive in the geometry container.
///
/// Hits carry these plain indices; callers look the primitive (and its
/// material or photon list) up on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// A sphere, by index into [`Geometry::spheres`].
    Sphere(usize),

    /// A mesh face, by mesh index into [`Geometry::meshes`] and face index.
    Mesh {
        /// Index of the mesh.
        mesh: usize,
        /// Index of the hit face within the mesh.
        face: usize,
    },
}

/// Nearest intersection across the whole geometry container.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Ray parameter of the nearest hit.
    pub t: f32,

    /// The primitive that was hit.
    pub primitive: Primitive,
}

impl Hit {
    /// Surface normal of the hit primitive at `pos`.
    pub fn normal_at(&self, geometry: &Geometry, pos: Vec3A) -> Vec3A {
        match self.primitive {
            Primitive::Sphere(index) => geometry.spheres[index].normal_at(pos),
            Primitive::Mesh { mesh, face } => geometry.meshes[mesh].normal_at(face, pos),
        }
    }
}

impl Geometry {
    /// Nearest hit over spheres and meshes; ties go to the sphere.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit> {
        let sphere = nearest_sphere_hit(ray, &self.spheres).map(|hit| Hit {
            t: hit.t,
            primitive: Primitive::Sphere(hit.index),
        });
        let mesh = nearest_mesh_hit(ray, &self.meshes).map(|hit| Hit {
            t: hit.t,
            primitive: Primitive::Mesh {
                mesh: hit.mesh,
                face: hit.face,
            },
        });

        match (sphere, mesh) {
            (Some(s), Some(m)) => Some(if s.t <= m.t { s } else { m }),
            (hit, None) | (None, hit) => hit,
        }
    }
}

/// Mirror reflection of `incident` about the unit `normal`.
pub fn reflected(incident: Vec3A, normal: Vec3A) -> Vec3A {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Refraction of `incident` crossing from refractive index `n1` into `n2`,
/// by Snell's law in vector form.
///
/// `normal` must oppose `incident` (flip it first when leaving a volume).
/// Beyond the critical angle the square root goes negative and the result
/// has NaN components; callers treat such rays as missing everything.
pub fn refracted(incident: Vec3A, normal: Vec3A, n1: f32, n2: f32) -> Vec3A {
    let dot_in = incident.dot(normal);
    let eta = n1 / n2;

    eta * (incident - dot_in * normal)
        - normal * (1.0 - eta * eta * (1.0 - dot_in * dot_in)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_straight_on_z() {
        let out = reflected(Vec3A::new(0.0, 0.0, -1.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(out.distance(Vec3A::new(0.0, 0.0, 1.0)) < 1e-4);
    }

    #[test]
    fn reflect_negates_normal_component_and_keeps_length() {
        let incident = Vec3A::new(0.3, -0.8, 0.5).normalize();
        let normal = Vec3A::new(0.0, 1.0, 0.0);
        let out = reflected(incident, normal);

        assert!((out.dot(normal) + incident.dot(normal)).abs() < 1e-5);
        assert!((out.length() - incident.length()).abs() < 1e-5);
    }

    #[test]
    fn refract_equal_indices_is_identity() {
        let incident = Vec3A::new(0.0, 1.0, -1.0).normalize();
        let normal = Vec3A::new(0.0, 0.0, 1.0);
        let out = refracted(incident, normal, 1.0, 1.0);

        assert!(out.distance(incident) < 1e-4);
    }

    #[test]
    fn refract_into_denser_medium_bends_toward_inverse_normal() {
        let incident = Vec3A::new(1.0, 0.0, -1.0).normalize();
        let normal = Vec3A::new(0.0, 0.0, 1.0);
        let out = refracted(incident, normal, 1.0, 1.5);

        assert!((-normal).dot(out) > (-normal).dot(incident));
        assert!((out.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_hit_prefers_closer_primitive_kind() {
        let geometry = Geometry {
            spheres: vec![Sphere::new(glam::Vec3A::new(0.0, 0.0, 8.0), 1.0)],
            meshes: vec![Mesh::new(
                vec![
                    Vec3A::new(-2.0, -2.0, 4.0),
                    Vec3A::new(2.0, -2.0, 4.0),
                    Vec3A::new(0.0, 2.0, 4.0),
                ],
                vec![0, 1, 2],
                false,
            )],
        };

        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        let hit = geometry.nearest_hit(&ray).expect("hit");
        assert_eq!(hit.primitive, Primitive::Mesh { mesh: 0, face: 0 });
        assert!((hit.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_hit_on_empty_geometry_is_none() {
        let geometry = Geometry::default();
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        assert!(geometry.nearest_hit(&ray).is_none());
    }
}
