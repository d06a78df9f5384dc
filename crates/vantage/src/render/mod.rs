//! Rendering-facing types: camera, materials, and the backend seam.
//!
//! Backends themselves (software rasterizer, OpenGL, Vulkan, ...) live
//! out of tree behind [`RenderBackend`]; this crate only reads the ID and
//! depth planes they write.

pub mod backend;
pub mod camera;
pub mod material;

pub use backend::{FrameBuffers, RenderBackend};
pub use camera::Camera;
pub use material::{BlendMode, Material};
