//! Sphere primitive and parametric ray/sphere intersection.
//!
//! Intersection results use the ray parameter t with NaN as the "no hit"
//! sentinel; negative roots are filtered so hits always lie forward of the
//! ray origin.

use glam::Vec3A;

use crate::ray::Ray;

/// Sphere defined by center and squared radius.
///
/// The radius is stored squared because intersection only ever needs r².
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Squared radius of the sphere, non-negative.
    pub radius_squared: f32,
}

impl Sphere {
    /// Create a new sphere from its center and squared radius.
    pub fn new(center: Vec3A, radius_squared: f32) -> Self {
        Self {
            center,
            radius_squared,
        }
    }

    /// Outward unit normal at a position on the surface.
    pub fn normal_at(&self, position: Vec3A) -> Vec3A {
        (position - self.center).normalize()
    }
}

/// Ray parameter of the near intersect point, or NaN when the ray misses
/// the sphere or the sphere lies entirely behind the ray origin.
///
/// Solves |o + t*d - c|² = r² for unit d. A ray starting inside the sphere
/// yields the (positive) exit point.
pub fn near_intersect_param(ray: &Ray, sphere: &Sphere) -> f32 {
    debug_assert!(
        !ray.direction.is_finite() || (ray.direction.length() - 1.0).abs() < 1e-3,
        "intersection requires a unit direction"
    );

    let m = ray.origin - sphere.center;
    let md = m.dot(ray.direction);
    // direction is unit length, so the quadratic coefficient is one; a
    // negative discriminant surfaces here as NaN and is returned as-is
    let c = (md * md - (m.dot(m) - sphere.radius_squared)).sqrt();
    if c.is_nan() {
        return c;
    }

    let t1 = -md - c;
    let t2 = -md + c;
    if t2 < 0.0 {
        f32::NAN
    } else if t1 < 0.0 {
        t2
    } else {
        t1
    }
}

/// Position of the near intersect point; all components are NaN on a miss.
pub fn near_intersect(ray: &Ray, sphere: &Sphere) -> Vec3A {
    ray.origin + near_intersect_param(ray, sphere) * ray.direction
}

/// Nearest hit among a list of spheres.
#[derive(Debug, Clone, Copy)]
pub struct SphereHit {
    /// Ray parameter of the nearest hit.
    pub t: f32,

    /// Index of the hit sphere in the queried slice.
    pub index: usize,
}

/// Intersect a ray against every sphere and keep the smallest finite t.
pub fn nearest_sphere_hit(ray: &Ray, spheres: &[Sphere]) -> Option<SphereHit> {
    let mut nearest: Option<SphereHit> = None;
    for (index, sphere) in spheres.iter().enumerate() {
        let t = near_intersect_param(ray, sphere);
        if t.is_nan() {
            continue;
        }
        if nearest.is_none_or(|hit| t < hit.t) {
            nearest = Some(SphereHit { t, index });
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(origin: Vec3A, towards: Vec3A) -> Ray {
        Ray::new(origin, towards.normalize())
    }

    #[test]
    fn ray_through_sphere() {
        let r = ray(Vec3A::new(-3.0, 0.0, 1.0), Vec3A::new(2.0, 1.0, 0.0));
        let s = Sphere::new(Vec3A::new(1.0, 1.0, 1.0), 4.0);

        let hit = near_intersect(&r, &s);
        assert!(hit.distance(Vec3A::new(-1.0, 1.0, 1.0)) < 0.25);
    }

    #[test]
    fn ray_miss_sphere() {
        let r = ray(Vec3A::new(-3.0, 1.0, 1.0), Vec3A::new(2.0, 3.0, 1.0));
        let s = Sphere::new(Vec3A::new(1.0, 1.0, 1.0), 4.0);

        let hit = near_intersect(&r, &s);
        assert!(hit.x.is_nan() && hit.y.is_nan() && hit.z.is_nan());
    }

    #[test]
    fn sphere_behind_origin_is_a_miss() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        let s = Sphere::new(Vec3A::new(0.0, 0.0, -4.0), 4.0);

        assert!(near_intersect_param(&r, &s).is_nan());
    }

    #[test]
    fn origin_inside_sphere_yields_exit_point() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        let s = Sphere::new(Vec3A::ZERO, 4.0);

        let t = near_intersect_param(&r, &s);
        assert!(t > 0.0);
        assert!((r.position_at(t) - Vec3A::new(0.0, 0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn hit_point_lies_on_surface() {
        let r = ray(Vec3A::new(-5.0, 0.3, -0.2), Vec3A::new(1.0, 0.1, 0.05));
        let s = Sphere::new(Vec3A::new(1.0, 1.0, 1.0), 4.0);

        let t = near_intersect_param(&r, &s);
        assert!(t.is_finite());
        let on_surface = (r.position_at(t) - s.center).length_squared();
        assert!((on_surface - s.radius_squared).abs() < 1e-3);
    }

    #[test]
    fn nearest_hit_reports_closest_sphere() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        let spheres = [
            Sphere::new(Vec3A::new(0.0, 0.0, 10.0), 1.0),
            Sphere::new(Vec3A::new(0.0, 0.0, 5.0), 1.0),
            Sphere::new(Vec3A::new(0.0, 10.0, 0.0), 1.0),
        ];

        let hit = nearest_sphere_hit(&r, &spheres).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_hit_on_empty_list_is_none() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, 1.0));
        assert!(nearest_sphere_hit(&r, &[]).is_none());
    }
}
