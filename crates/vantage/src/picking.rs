//! ID-buffer picking: the O(1) "what was drawn here" path.
//!
//! Reads the object-ID and depth planes produced by the most recent
//! render. Unlike [`crate::spatial::raycast`], which always sees current
//! geometry, this path is only as fresh as the last render. The two can
//! transiently disagree after a transform edit, by contract.

use crate::render::backend::{FrameBuffers, NO_OBJECT};

/// Result of an ID-buffer pick.
///
/// `object_id` and `depth` are unspecified on a miss; check `hit` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// Whether a mesh was drawn at the queried pixel
    pub hit: bool,
    /// Picking id of the mesh that last wrote the pixel
    pub object_id: u32,
    /// Normalized depth at the pixel (0 near, 1 far)
    pub depth: f32,
}

impl PickResult {
    /// The canonical miss value
    pub fn miss() -> Self {
        Self {
            hit: false,
            object_id: 0,
            depth: 1.0,
        }
    }
}

impl Default for PickResult {
    fn default() -> Self {
        Self::miss()
    }
}

/// Look up the object under a pixel in the last-rendered frame.
///
/// Out-of-bounds coordinates and background pixels both miss.
pub fn pick_by_id(buffers: &FrameBuffers, x: u32, y: u32) -> PickResult {
    let (Some(object_id), Some(depth)) = (buffers.object_id_at(x, y), buffers.depth_at(x, y))
    else {
        return PickResult::miss();
    };
    if object_id == NO_OBJECT {
        return PickResult::miss();
    }
    PickResult {
        hit: true,
        object_id,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_and_out_of_bounds_miss() {
        let buffers = FrameBuffers::new(8, 8);
        assert!(!pick_by_id(&buffers, 3, 3).hit);
        assert!(!pick_by_id(&buffers, 8, 0).hit);
        assert!(!pick_by_id(&buffers, 0, 100).hit);
    }

    #[test]
    fn drawn_pixel_reports_id_and_depth() {
        let mut buffers = FrameBuffers::new(8, 8);
        buffers.write_pixel(5, 2, 7, 0.125);
        let result = pick_by_id(&buffers, 5, 2);
        assert_eq!(
            result,
            PickResult {
                hit: true,
                object_id: 7,
                depth: 0.125
            }
        );
    }
}
