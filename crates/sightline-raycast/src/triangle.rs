//! Triangle references used during build and the prepared-triangle arena
//! used during traversal.

use sightline_math::{Axis, Point3, Vec3};

use crate::bounds::BoundingBox;
use crate::ray::Ray;

/// Determinants smaller than this are treated as "ray parallel to triangle".
const DET_EPSILON: f32 = 1e-12;

/// A build-time triangle reference: global id plus cached geometry.
///
/// The cached vertices and bounding box exist only for the duration of a
/// build; the finished tree stores nothing but the global index.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Index into the engine's global triangle table.
    pub index: u32,
    /// Cached corner positions.
    pub vertices: [Point3; 3],
    /// Cached bounding box of the corners.
    pub bounds: BoundingBox,
}

impl Triangle {
    /// Create a reference with its bounding box cached.
    pub fn new(index: u32, vertices: [Point3; 3]) -> Self {
        let bounds = BoundingBox::from_points(&vertices);
        Self {
            index,
            vertices,
            bounds,
        }
    }

    /// The `(min, max)` extent of the triangle on `axis`.
    #[inline]
    pub fn interval(&self, axis: Axis) -> (f32, f32) {
        let i = axis.index();
        (self.bounds.min[i], self.bounds.max[i])
    }
}

/// Identifies which input mesh a global triangle id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceOrigin {
    /// Index of the mesh in the list passed to the engine.
    pub mesh: u32,
    /// Index of the triangle within that mesh.
    pub triangle: u32,
}

/// A triangle preprocessed for intersection testing.
///
/// One of these exists per global triangle for the lifetime of the engine.
/// Edge vectors are precomputed so the Moeller-Trumbore test needs no
/// per-query setup, and the face normal is kept for backface classification.
#[derive(Debug, Clone)]
pub struct PreparedTriangle {
    v0: Point3,
    edge1: Vec3,
    edge2: Vec3,
    normal: Vec3,
}

impl PreparedTriangle {
    /// Preprocess a triangle given its corners and face normal.
    pub fn new(vertices: [Point3; 3], normal: Vec3) -> Self {
        Self {
            v0: vertices[0],
            edge1: vertices[1] - vertices[0],
            edge2: vertices[2] - vertices[0],
            normal,
        }
    }

    /// The face normal captured at build time.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Moeller-Trumbore ray-triangle intersection.
    ///
    /// Returns the hit distance, or `None` for misses, hits behind the
    /// origin, and rays parallel to the triangle plane.
    ///
    /// The barycentric acceptance is half-open (`u >= 0`, `v > 0`,
    /// `u + v <= 1`): a hit landing exactly on the edge shared by the two
    /// triangles of a quad is credited to exactly one of them, so a ray
    /// through a quad's diagonal produces one hit instead of two.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let dir = ray.direction.as_ref();
        let pvec = dir.cross(&self.edge2);
        let det = self.edge1.dot(&pvec);

        if det.abs() < DET_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - self.v0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&self.edge1);
        let v = dir.dot(&qvec) * inv_det;
        if v <= 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.edge2.dot(&qvec) * inv_det;
        (t >= 0.0).then_some(t)
    }
}
