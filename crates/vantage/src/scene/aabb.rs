//! Axis-aligned bounding boxes for spatial queries.

use crate::foundation::math::{transform_position, Mat4, Vec3};
use crate::spatial::primitives::Ray;

/// Axis-Aligned Bounding Box
///
/// A zero-volume box (min == max) is a legitimate value, produced for
/// empty geometry and empty scenes; callers must not treat it as an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate zero-volume box at the origin
    pub fn degenerate() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::zeros(),
        }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Tight fit around a set of points; degenerate for an empty set
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::degenerate();
        };
        let mut aabb = Self::new(first, first);
        for p in points {
            aabb.min = aabb.min.inf(&p);
            aabb.max = aabb.max.sup(&p);
        }
        aabb
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Surface area `2*(dx*dy + dy*dz + dz*dx)`, a proxy for culling cost
    pub fn surface_area(&self) -> f32 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Check if this AABB contains a point (inclusive bounds)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB overlaps another on all three axes (inclusive)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Smallest box containing both inputs
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// The 8 corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            Vec3::new(mn.x, mn.y, mn.z),
            Vec3::new(mx.x, mn.y, mn.z),
            Vec3::new(mn.x, mx.y, mn.z),
            Vec3::new(mx.x, mx.y, mn.z),
            Vec3::new(mn.x, mn.y, mx.z),
            Vec3::new(mx.x, mn.y, mx.z),
            Vec3::new(mn.x, mx.y, mx.z),
            Vec3::new(mx.x, mx.y, mx.z),
        ]
    }

    /// Transform all 8 corners and re-fit an axis-aligned box around them.
    ///
    /// Transforming only min/max is wrong under rotation, so the full
    /// corner set is used.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        Aabb::from_points(self.corners().map(|c| transform_position(matrix, c)))
    }

    /// Test ray intersection using the slab method.
    ///
    /// Returns `(t_near, t_far)` along the ray if it intersects, `None`
    /// otherwise. `t_near` may be negative when the origin is inside the
    /// box. Axes with a near-zero direction component are unconstrained
    /// unless the origin lies outside that slab.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        const EPSILON: f32 = 1e-8;

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (slab_min, slab_max) = (self.min[axis], self.max[axis]);

            if direction.abs() < EPSILON {
                // Ray parallel to this slab: a miss only if it starts outside it
                if origin < slab_min || origin > slab_max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let t1 = (slab_min - origin) * inv;
            let t2 = (slab_max - origin) * inv;
            let (t_entry, t_exit) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

            t_near = t_near.max(t_entry);
            t_far = t_far.min(t_exit);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None; // Box entirely behind the ray origin
        }
        Some((t_near, t_far))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn from_points_is_tight() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-3.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ]);
        assert_relative_eq!(aabb.min, Vec3::new(-3.0, -2.0, -1.0));
        assert_relative_eq!(aabb.max, Vec3::new(1.0, 4.0, 0.5));
    }

    #[test]
    fn empty_points_yield_degenerate_box() {
        let aabb = Aabb::from_points(std::iter::empty());
        assert_eq!(aabb, Aabb::degenerate());
        assert_relative_eq!(aabb.surface_area(), 0.0);
    }

    #[test]
    fn overlaps_is_reflexive_and_symmetric() {
        let a = unit_box();
        let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(3.0, 3.0, 3.0));
        let c = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 6.0, 6.0));

        assert!(a.overlaps(&a));
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Touching faces count as overlap (inclusive bounds)
        let touching = Aabb::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.overlaps(&touching));
    }

    #[test]
    fn union_contains_both() {
        let a = unit_box();
        let b = Aabb::new(Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 3.0, 3.0));
        let u = a.union(&b);
        assert_relative_eq!(u.min, a.min);
        assert_relative_eq!(u.max, b.max);
    }

    #[test]
    fn surface_area_of_box() {
        let aabb = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(aabb.surface_area(), 2.0 * (2.0 + 6.0 + 3.0));
    }

    #[test]
    fn rotation_grows_transformed_box() {
        use crate::foundation::math::{Quat, Vec3};
        let rotation =
            Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_4).to_homogeneous();
        let rotated = unit_box().transformed(&rotation);
        // A 45-degree rotation pushes the X/Z extent out to sqrt(2)
        let expected = 2.0_f32.sqrt();
        assert_relative_eq!(rotated.max.x, expected, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.z, expected, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn slab_test_hits_and_misses() {
        let aabb = unit_box();
        let hit = aabb
            .intersect_ray(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0)))
            .expect("ray aimed at the box must hit");
        assert_relative_eq!(hit.0, 4.0, epsilon = 1e-5);
        assert_relative_eq!(hit.1, 6.0, epsilon = 1e-5);

        // Pointing away
        assert!(aabb
            .intersect_ray(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0)))
            .is_none());
    }

    #[test]
    fn slab_test_parallel_axis() {
        let aabb = unit_box();
        // Parallel to X slab, inside it: unconstrained on that axis
        let inside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&inside).is_some());
        // Parallel to X slab, outside it: miss
        let outside = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.intersect_ray(&outside).is_none());
    }

    #[test]
    fn slab_test_origin_inside() {
        let (t_near, t_far) = unit_box()
            .intersect_ray(&Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)))
            .expect("origin inside the box always hits");
        assert!(t_near < 0.0);
        assert_relative_eq!(t_far, 1.0, epsilon = 1e-5);
    }
}
