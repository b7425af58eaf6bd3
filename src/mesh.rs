//! Indexed triangle meshes and ray/triangle intersection.
//!
//! Meshes precompute face normals, vertex normals, and a bounding sphere at
//! construction. Intersection walks every face after a bounding-sphere
//! pre-filter; there is no further acceleration structure.

use glam::Vec3A;

use crate::ray::Ray;
use crate::sphere::{near_intersect_param, Sphere};

/// Unit normal of the triangle (a, b, c) from its winding.
fn triangle_normal(a: Vec3A, b: Vec3A, c: Vec3A) -> Vec3A {
    (b - a).cross(c - a).normalize()
}

/// Conservative bounding sphere from the axis-aligned extents of a point set.
///
/// The radius is the largest per-axis extent, which always encloses the
/// half-diagonal of the bounding box.
fn bounding_sphere(vertexes: &[Vec3A]) -> Sphere {
    if vertexes.is_empty() {
        return Sphere::new(Vec3A::ZERO, 0.0);
    }

    let mut min = Vec3A::splat(f32::MAX);
    let mut max = Vec3A::splat(-f32::MAX);
    for &v in vertexes {
        min = min.min(v);
        max = max.max(v);
    }

    let center = (min + max) / 2.0;
    let extent = max - min;
    let radius = extent.x.max(extent.y).max(extent.z);
    Sphere::new(center, radius * radius)
}

/// Indexed triangle mesh with precomputed shading data.
///
/// Invariants: `indexes.len()` is divisible by 3 and every index is in range
/// of `vertexes` (both enforced by the scene loader); `face_normals` holds
/// one unit normal per face and `vertex_normals` one per vertex.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions.
    pub vertexes: Vec<Vec3A>,

    /// Vertex indices, three per triangle.
    pub indexes: Vec<u32>,

    /// Per-vertex normals: the normalized sum of incident face normals.
    pub vertex_normals: Vec<Vec3A>,

    /// Per-face unit normals, negated relative to the winding cross product.
    pub face_normals: Vec<Vec3A>,

    /// Sphere enclosing all vertices, used to pre-filter intersection tests.
    pub bounding_sphere: Sphere,

    /// Whether shading normals are interpolated across faces.
    pub smooth: bool,
}

impl Mesh {
    /// Build a mesh, computing face normals, vertex normals, and the
    /// bounding sphere.
    pub fn new(vertexes: Vec<Vec3A>, indexes: Vec<u32>, smooth: bool) -> Self {
        debug_assert!(indexes.len() % 3 == 0);
        debug_assert!(vertexes.len() <= u32::MAX as usize);

        let face_count = indexes.len() / 3;
        let mut face_normals = Vec::with_capacity(face_count);
        let mut vertex_normals = vec![Vec3A::ZERO; vertexes.len()];

        for face in 0..face_count {
            let i1 = indexes[3 * face] as usize;
            let i2 = indexes[3 * face + 1] as usize;
            let i3 = indexes[3 * face + 2] as usize;

            let normal = -triangle_normal(vertexes[i1], vertexes[i2], vertexes[i3]);
            face_normals.push(normal);

            // associate this face normal with each of its vertices
            vertex_normals[i1] += normal;
            vertex_normals[i2] += normal;
            vertex_normals[i3] += normal;
        }

        for normal in &mut vertex_normals {
            *normal = normal.normalize_or_zero();
        }

        let bounding_sphere = bounding_sphere(&vertexes);

        Self {
            vertexes,
            indexes,
            vertex_normals,
            face_normals,
            bounding_sphere,
            smooth,
        }
    }

    /// Number of triangles in the mesh.
    pub fn face_count(&self) -> usize {
        self.indexes.len() / 3
    }

    fn face_vertex_indices(&self, face: usize) -> (usize, usize, usize) {
        (
            self.indexes[3 * face] as usize,
            self.indexes[3 * face + 1] as usize,
            self.indexes[3 * face + 2] as usize,
        )
    }

    /// Surface normal at a position on the given face.
    ///
    /// Flat meshes return the face normal; smooth meshes interpolate the
    /// three vertex normals with barycentric weights and renormalize.
    pub fn normal_at(&self, face: usize, pos: Vec3A) -> Vec3A {
        if !self.smooth {
            return self.face_normals[face];
        }

        let (i1, i2, i3) = self.face_vertex_indices(face);
        let v1 = self.vertexes[i1];
        let v2 = self.vertexes[i2];
        let v3 = self.vertexes[i3];
        let n1 = self.vertex_normals[i1];
        let n2 = self.vertex_normals[i2];
        let n3 = self.vertex_normals[i3];

        let area = 0.5 * (v2 - v1).cross(v3 - v1).length();
        let v1pos = pos - v1;
        let u = 0.5 * v1pos.cross(v3 - v1).length() / area;
        let v = 0.5 * v1pos.cross(v2 - v1).length() / area;
        let w = 1.0 - u - v;

        (w * n1 + u * n2 + v * n3).normalize()
    }
}

/// Ray/triangle hit: parameter and face index within one mesh.
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Ray parameter of the hit.
    pub t: f32,

    /// Index of the hit face.
    pub face: usize,
}

/// Nearest accepted triangle of the mesh, testing every face.
fn ray_triangle_intersect(ray: &Ray, mesh: &Mesh) -> Option<TriangleHit> {
    debug_assert!(
        !ray.direction.is_finite() || (ray.direction.length() - 1.0).abs() < 1e-3,
        "intersection requires a unit direction"
    );

    let mut nearest: Option<TriangleHit> = None;
    for face in 0..mesh.face_count() {
        let (i1, i2, i3) = mesh.face_vertex_indices(face);
        let v1 = mesh.vertexes[i1];
        let v2 = mesh.vertexes[i2];
        let v3 = mesh.vertexes[i3];

        let normal = mesh.face_normals[face];
        let d = ray.direction.dot(normal);
        if d == 0.0 {
            continue; // ray parallel to the face plane
        }
        let t = -(ray.origin - v1).dot(normal) / d;
        if !(t >= 0.0) {
            continue; // plane behind the origin; NaN falls through here too
        }

        let point = ray.position_at(t);
        let side_a = normal.dot((v2 - v1).cross(point - v1)) < 0.0;
        let side_b = normal.dot((v3 - v2).cross(point - v2)) < 0.0;
        let side_c = normal.dot((v1 - v3).cross(point - v3)) < 0.0;

        if side_a == side_b && side_b == side_c && nearest.is_none_or(|hit| t < hit.t) {
            nearest = Some(TriangleHit { t, face });
        }
    }
    nearest
}

/// Bounding-sphere pre-filter followed by the exact per-face test.
pub fn ray_mesh_intersect(ray: &Ray, mesh: &Mesh) -> Option<TriangleHit> {
    if near_intersect_param(ray, &mesh.bounding_sphere).is_nan() {
        return None;
    }
    ray_triangle_intersect(ray, mesh)
}

/// Nearest hit across a list of meshes.
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    /// Ray parameter of the nearest hit.
    pub t: f32,

    /// Index of the hit face within the hit mesh.
    pub face: usize,

    /// Index of the hit mesh in the queried slice.
    pub mesh: usize,
}

/// Intersect a ray against every mesh and keep the smallest t.
pub fn nearest_mesh_hit(ray: &Ray, meshes: &[Mesh]) -> Option<MeshHit> {
    let mut nearest: Option<MeshHit> = None;
    for (index, mesh) in meshes.iter().enumerate() {
        let Some(hit) = ray_mesh_intersect(ray, mesh) else {
            continue;
        };
        if nearest.is_none_or(|near| hit.t < near.t) {
            nearest = Some(MeshHit {
                t: hit.t,
                face: hit.face,
                mesh: index,
            });
        }
    }
    nearest
}
