//! View frustum extraction and AABB classification.

use crate::foundation::math::{Mat4, Vec3};
use crate::scene::aabb::Aabb;

/// A clip plane `a*x + b*y + c*z + d >= 0` for points inside.
///
/// Coefficients are left unnormalized: classification only needs the
/// sign, and skipping the normalization keeps extraction cheap. Callers
/// needing metric distances must normalize first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal X coefficient
    pub a: f32,
    /// Normal Y coefficient
    pub b: f32,
    /// Normal Z coefficient
    pub c: f32,
    /// Offset
    pub d: f32,
}

impl Plane {
    /// Signed (unnormalized) distance of a point from the plane
    pub fn evaluate(&self, point: Vec3) -> f32 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }
}

/// Classification of an AABB against a frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Fully inside all six planes
    Inside,
    /// Straddles at least one plane
    Intersecting,
    /// Fully outside at least one plane
    Outside,
}

/// View frustum: six planes in the order left, right, bottom, top, near, far
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// The six clip planes
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the six planes from a view-projection matrix using the
    /// Gribb-Hartmann row combinations (OpenGL clip conventions).
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row = |i: usize| Plane {
            a: vp[(i, 0)],
            b: vp[(i, 1)],
            c: vp[(i, 2)],
            d: vp[(i, 3)],
        };
        let combine = |base: Plane, sign: f32, other: Plane| Plane {
            a: base.a + sign * other.a,
            b: base.b + sign * other.b,
            c: base.c + sign * other.c,
            d: base.d + sign * other.d,
        };

        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        Self {
            planes: [
                combine(r3, 1.0, r0),  // left
                combine(r3, -1.0, r0), // right
                combine(r3, 1.0, r1),  // bottom
                combine(r3, -1.0, r1), // top
                combine(r3, 1.0, r2),  // near
                combine(r3, -1.0, r2), // far
            ],
        }
    }

    /// True when a point satisfies all six plane inequalities
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.evaluate(point) >= 0.0)
    }

    /// Classify an AABB against the frustum with the positive/negative
    /// vertex trick.
    ///
    /// For each plane the corner most aligned with the plane normal (the
    /// positive vertex) decides fully-outside; the least aligned corner
    /// (negative vertex) decides straddling. Outside short-circuits.
    pub fn test_aabb(&self, aabb: &Aabb) -> Containment {
        let mut intersecting = false;

        for plane in &self.planes {
            let positive = Vec3::new(
                if plane.a >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.b >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.c >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if plane.evaluate(positive) < 0.0 {
                return Containment::Outside;
            }

            let negative = Vec3::new(
                if plane.a >= 0.0 { aabb.min.x } else { aabb.max.x },
                if plane.b >= 0.0 { aabb.min.y } else { aabb.max.y },
                if plane.c >= 0.0 { aabb.min.z } else { aabb.max.z },
            );
            if plane.evaluate(negative) < 0.0 {
                intersecting = true;
            }
        }

        if intersecting {
            Containment::Intersecting
        } else {
            Containment::Inside
        }
    }
}
