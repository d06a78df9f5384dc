//! Scene data model: meshes, the transform hierarchy, bounds and lights.

pub mod aabb;
pub mod graph;
pub mod lighting;
pub mod mesh;

pub use aabb::Aabb;
pub use graph::{MeshKey, Scene};
pub use lighting::{Light, LightKind};
pub use mesh::{LocalTransform, Mesh, Vertex};
