//! Spatial queries: intersection primitives, frustum culling, raycasting.

pub mod frustum;
pub mod primitives;
pub mod raycast;

pub use frustum::{Containment, Frustum, Plane};
pub use primitives::{intersect_ray_triangle, Ray, TriangleHit};
pub use raycast::{raycast, RayHit};
