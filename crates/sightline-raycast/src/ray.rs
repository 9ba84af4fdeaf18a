//! Ray representation and hit records.

use sightline_math::{Dir3, Point3, Vec3};

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
    /// Precomputed reciprocal of direction components for fast slab tests.
    /// Components are infinite where the direction is zero.
    pub(crate) inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized; it must not be the zero vector.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        debug_assert!(direction.norm_squared() > 0.0);
        let dir = Dir3::new_normalize(direction);
        let inv = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        Self {
            origin,
            direction: dir,
            inv_direction: inv,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }
}

/// A single ray-triangle intersection.
///
/// Distances are parameters along the (unit-length) ray direction. The face
/// id indexes the engine's global triangle table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance from the ray origin to the intersection point.
    pub distance: f32,
    /// Global id of the intersected triangle.
    pub face_id: u32,
}
