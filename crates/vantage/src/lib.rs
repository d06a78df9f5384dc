//! # Vantage
//!
//! An embeddable 3D viewport engine: it owns a scene of meshes, lights,
//! and a camera, and answers spatial questions about it: what is under
//! a pixel, what is visible, what a ray hits.
//!
//! ## Features
//!
//! - **Transform hierarchy**: parented meshes with cycle-safe
//!   assignment and per-query world-transform resolution
//! - **Bounding volumes**: local/world AABBs and a scene-wide bound
//! - **Frustum culling**: Gribb-Hartmann plane extraction and
//!   inside/intersecting/outside AABB classification
//! - **Two picking paths**: an O(1) ID-buffer lookup reflecting the last
//!   render, and a CPU raycast reflecting current geometry
//! - **Snapshot protocol**: a zero-copy, lifetime-checked view of the
//!   resolved scene for external consumers such as offline raytracers
//!
//! Drawing itself is delegated to out-of-tree backends behind
//! [`render::RenderBackend`]; this crate only reads the object-ID and
//! depth planes they produce.
//!
//! ## Quick Start
//!
//! ```rust
//! use vantage::prelude::*;
//!
//! let mut viewport = Viewport::new(800, 600);
//! viewport.camera_mut().set_position(Vec3::new(0.0, 0.0, 10.0));
//! viewport.scene_mut().add_mesh(Mesh::unit_cube());
//!
//! let hit = viewport.raycast_pixel(400.0, 300.0);
//! assert!(hit.hit);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod error;
pub mod foundation;
pub mod picking;
pub mod render;
pub mod scene;
pub mod snapshot;
pub mod spatial;

mod viewport;

#[cfg(test)]
mod tests;

pub use error::{RenderError, SceneError};
pub use viewport::Viewport;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        error::{RenderError, SceneError},
        foundation::math::{Mat3, Mat4, Quat, Transform, Vec2, Vec3, Vec4},
        picking::PickResult,
        render::{BlendMode, Camera, FrameBuffers, Material, RenderBackend},
        scene::{Aabb, Light, LightKind, Mesh, MeshKey, Scene, Vertex},
        snapshot::{MeshView, Snapshot, Triangle},
        spatial::{Containment, Frustum, Ray, RayHit},
        Viewport,
    };
}
