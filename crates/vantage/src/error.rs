//! Error types for scene mutation and rendering.
//!
//! Queries that merely find nothing (no mesh under a ray, pixel out of
//! bounds) report that through their result's `hit` flag, never through
//! these types. Errors here are reserved for mutating calls that would
//! leave the scene in an invalid configuration; a failed call leaves
//! existing state untouched.

use thiserror::Error;

/// Errors from scene-mutating operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Setting this parent would create a cycle in the transform hierarchy
    #[error("parent assignment would create a cycle in the transform hierarchy")]
    InvalidParent,

    /// Mesh geometry has no vertices
    #[error("mesh has no vertices")]
    EmptyGeometry,

    /// A triangle index points past the vertex array
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index value
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },

    /// Index count is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    /// The referenced mesh no longer exists in the scene
    #[error("mesh not found in scene")]
    MeshNotFound,
}

/// Errors surfaced by [`crate::viewport::Viewport::render`]
#[derive(Error, Debug)]
pub enum RenderError {
    /// The backend failed to produce a frame
    #[error("render backend failed: {0}")]
    Backend(String),
}
