//! 3D camera: view/projection matrices and pixel-to-ray unprojection.
//!
//! Uses a right-handed Y-up world with OpenGL clip conventions
//! (NDC depth -1..1). Matrices are computed on demand from the current
//! camera state, never cached, so rays and frustums stay correct across
//! viewport resizes.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::spatial::primitives::Ray;

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position (eye) in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("camera position updated to: {position:?}");
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("camera target updated to: {target:?}");
    }

    /// Point the camera at a target with a custom up vector
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
    }

    /// Update aspect ratio for viewport changes.
    ///
    /// Logged only when the change is significant (> 0.01) to stay quiet
    /// during interactive window resizes.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-camera view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unproject a framebuffer pixel into a world-space ray.
    ///
    /// Pixel coordinates are top-left origin; fractional values are
    /// allowed and integer coordinates address the pixel center (+0.5).
    /// Near and far NDC points are pushed through the inverse
    /// view-projection; the ray starts at the near point and its
    /// direction is normalized. Returns `None` when the view-projection
    /// matrix is not invertible: degenerate projections produce no ray
    /// rather than an error.
    pub fn pixel_to_ray(&self, x: f32, y: f32, width: u32, height: u32) -> Option<Ray> {
        if width == 0 || height == 0 {
            return None;
        }
        let ndc_x = (x + 0.5) / width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (y + 0.5) / height as f32 * 2.0;

        let inverse_vp = self.view_projection_matrix().try_inverse()?;

        let near_h = inverse_vp * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_h = inverse_vp * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near_h.w.abs() < f32::EPSILON || far_h.w.abs() < f32::EPSILON {
            return None;
        }

        let near_point = near_h.xyz() / near_h.w;
        let far_point = far_h.xyz() / far_h.w;
        let direction = far_point - near_point;
        if direction.magnitude_squared() < f32::EPSILON {
            return None;
        }

        Some(Ray::new(near_point, direction))
    }
}

impl Default for Camera {
    /// Sensible starting camera: above and behind the origin, looking at it
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
