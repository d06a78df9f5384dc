//! The seam between the viewport and out-of-tree render backends.
//!
//! A backend draws the scene however it likes (CPU rasterizer, OpenGL,
//! Vulkan); the engine's only requirement is that it fills the per-pixel
//! object-ID and normalized-depth planes in [`FrameBuffers`], which the
//! ID-buffer pick path then reads. Buffer contents are valid until the
//! next render or resize.

use crate::error::RenderError;
use crate::snapshot::Snapshot;

/// Background value in the object-ID plane (no mesh drew this pixel)
pub const NO_OBJECT: u32 = 0;

/// Per-pixel planes written by the most recent render
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    width: u32,
    height: u32,
    object_ids: Vec<u32>,
    depth: Vec<f32>,
}

impl FrameBuffers {
    /// Allocate cleared buffers for the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            object_ids: vec![NO_OBJECT; len],
            depth: vec![1.0; len],
        }
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset to background ID and far depth
    pub fn clear(&mut self) {
        self.object_ids.fill(NO_OBJECT);
        self.depth.fill(1.0);
    }

    /// Reallocate for new dimensions; previous contents are discarded
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    /// Object ID under a pixel; `None` out of bounds
    pub fn object_id_at(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.object_ids[i])
    }

    /// Normalized depth under a pixel; `None` out of bounds
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Write one pixel (backends call this while drawing).
    ///
    /// Out-of-bounds writes are ignored.
    pub fn write_pixel(&mut self, x: u32, y: u32, object_id: u32, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.object_ids[i] = object_id;
            self.depth[i] = depth;
        }
    }
}

/// A render backend: consumes a scene snapshot, produces a frame.
///
/// Backends receive the same snapshot protocol external consumers use,
/// so they never see the engine's internal storage.
pub trait RenderBackend {
    /// Draw one frame, filling `target`'s ID and depth planes
    fn render(&mut self, frame: &Snapshot<'_>, target: &mut FrameBuffers) -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffers_are_background() {
        let buffers = FrameBuffers::new(4, 3);
        assert_eq!(buffers.object_id_at(0, 0), Some(NO_OBJECT));
        assert_eq!(buffers.depth_at(3, 2), Some(1.0));
        assert_eq!(buffers.object_id_at(4, 0), None);
        assert_eq!(buffers.object_id_at(0, 3), None);
    }

    #[test]
    fn writes_round_trip_and_resize_discards() {
        let mut buffers = FrameBuffers::new(4, 4);
        buffers.write_pixel(2, 1, 42, 0.25);
        assert_eq!(buffers.object_id_at(2, 1), Some(42));
        assert_eq!(buffers.depth_at(2, 1), Some(0.25));

        buffers.write_pixel(9, 9, 7, 0.0); // silently ignored
        buffers.resize(8, 8);
        assert_eq!(buffers.object_id_at(2, 1), Some(NO_OBJECT));
    }
}
