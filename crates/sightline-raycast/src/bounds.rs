//! Axis-aligned bounding boxes with slab-method ray intersection.

use sightline_math::{Axis, Point3, Vec3};

use crate::ray::Ray;

/// An axis-aligned bounding box.
///
/// A box built from zero points is *empty*: its min corner sits at positive
/// infinity and its max corner at negative infinity, so every containment and
/// ray test fails on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Create a box from explicit corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// The empty box (inverted infinite corners).
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point in `points`.
    pub fn from_points(points: &[Point3]) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand(*p);
        }
        bounds
    }

    /// Grow the box to include `point`.
    pub fn expand(&mut self, point: Point3) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.expand(other.min);
        out.expand(other.max);
        out
    }

    /// True if the box contains no volume on any axis (min exceeds max).
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Side lengths of the box.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// The axis with the largest extent.
    pub fn longest_axis(&self) -> Axis {
        let size = self.extent();
        let mut best = Axis::X;
        for axis in [Axis::Y, Axis::Z] {
            if size[axis.index()] > size[best.index()] {
                best = axis;
            }
        }
        best
    }

    /// Total surface area of the box faces.
    pub fn surface_area(&self) -> f32 {
        let size = self.extent();
        2.0 * (size.x * size.y + size.y * size.z + size.z * size.x)
    }

    /// Split the box with a plane on `axis` at `value`, returning the
    /// `(front, back)` halves. Front is the half above the plane.
    ///
    /// `value` must lie strictly inside the box extent on `axis`.
    pub fn split(&self, axis: Axis, value: f32) -> (BoundingBox, BoundingBox) {
        let i = axis.index();
        debug_assert!(self.min[i] < value && value < self.max[i]);

        let mut front = *self;
        let mut back = *self;
        front.min[i] = value;
        back.max[i] = value;
        (front, back)
    }

    /// Slab-method ray intersection.
    ///
    /// Returns the parametric entry/exit interval `(t_min, t_max)` of the ray
    /// against the box, or `None` when the slabs do not overlap. The interval
    /// is not clamped: `t_min` is negative when the origin is inside the box,
    /// and both are negative when the box lies behind the ray.
    ///
    /// A zero direction component makes the ray parallel to that slab; the
    /// test then fails only if the origin lies outside the slab's extent.
    pub fn ray_hit(&self, ray: &Ray) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }

        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for i in 0..3 {
            if ray.direction[i] == 0.0 {
                if ray.origin[i] < self.min[i] || ray.origin[i] > self.max[i] {
                    return None;
                }
                continue;
            }

            let t1 = (self.min[i] - ray.origin[i]) * ray.inv_direction[i];
            let t2 = (self.max[i] - ray.origin[i]) * ray.inv_direction[i];
            let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

            t_min = t_min.max(near);
            t_max = t_max.min(far);

            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, t_max))
    }
}
