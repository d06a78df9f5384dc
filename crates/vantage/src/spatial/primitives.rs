//! Primitive intersection algorithms: rays and triangles.
//!
//! Pure functions with no scene dependencies; the raycast orchestrator
//! and external consumers build on these.

use crate::foundation::math::Vec3;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray, normalized by the constructor
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray; the direction is normalized so parametric
    /// distances are metric
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray-triangle intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray (strictly positive)
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns the hit distance and barycentric coordinates, or `None` when
/// the ray misses, is parallel to the triangle plane (near-zero
/// determinant), or the intersection lies behind the origin. Hits
/// require `u >= 0`, `v >= 0`, `u + v <= 1` and `t > 0`.
pub fn intersect_ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let det = edge1.dot(&h);

    // Ray parallel to triangle plane
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    if t > 0.0 {
        Some(TriangleHit { t, u, v })
    } else {
        None // On or behind the ray origin
    }
}
