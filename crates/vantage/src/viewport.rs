//! The viewport: owner of a scene, a camera, and the last-rendered
//! ID/depth buffers; the public query surface of the engine.
//!
//! Data flows one way per frame: `render` produces the ID and depth
//! planes, then queries (pick, raycast, frustum test, snapshot
//! iteration) consume the frozen state until the next `render`,
//! `resize`, or drop. A viewport's state is exclusively owned; `&mut`
//! methods are the mutating calls, so Rust's aliasing rules are exactly
//! the engine's shared-resource policy. No internal locking exists.

use crate::error::RenderError;
use crate::picking::{self, PickResult};
use crate::render::backend::{FrameBuffers, RenderBackend};
use crate::render::camera::Camera;
use crate::scene::graph::Scene;
use crate::snapshot::Snapshot;
use crate::spatial::frustum::{Containment, Frustum};
use crate::spatial::primitives::Ray;
use crate::spatial::raycast::{self, RayHit};

/// An embeddable 3D viewport
#[derive(Debug)]
pub struct Viewport {
    scene: Scene,
    camera: Camera,
    buffers: FrameBuffers,
}

impl Viewport {
    /// Create a viewport with an empty scene and a default camera whose
    /// aspect ratio matches the framebuffer
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Camera::default();
        if height > 0 {
            camera.set_aspect_ratio(width as f32 / height as f32);
        }
        log::debug!("viewport created at {width}x{height}");
        Self {
            scene: Scene::new(),
            camera,
            buffers: FrameBuffers::new(width, height),
        }
    }

    /// The scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Framebuffer width in pixels
    pub fn width(&self) -> u32 {
        self.buffers.width()
    }

    /// Framebuffer height in pixels
    pub fn height(&self) -> u32 {
        self.buffers.height()
    }

    /// Resize the framebuffer, updating the camera aspect ratio and
    /// discarding the last-rendered buffers (picks miss until the next
    /// render)
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.set_aspect_ratio(width as f32 / height as f32);
        }
        self.buffers.resize(width, height);
        log::debug!("viewport resized to {width}x{height}");
    }

    /// Render one frame through a backend.
    ///
    /// The backend receives a freshly captured snapshot (the same
    /// protocol external consumers use) and fills the ID/depth planes
    /// this viewport's pick path reads.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        self.buffers.clear();
        let frame = Snapshot::capture(
            &self.scene,
            &self.camera,
            self.buffers.width(),
            self.buffers.height(),
        );
        backend.render(&frame, &mut self.buffers)
    }

    /// Capture a read-only snapshot of the resolved scene.
    ///
    /// Valid until the next `render`, `resize`, or drop of this
    /// viewport; the borrow checker enforces the window.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(
            &self.scene,
            &self.camera,
            self.buffers.width(),
            self.buffers.height(),
        )
    }

    /// O(1) pick from the last-rendered ID buffer.
    ///
    /// Reflects the scene as of the last render, not edits made since.
    pub fn pick_by_id(&self, x: u32, y: u32) -> PickResult {
        picking::pick_by_id(&self.buffers, x, y)
    }

    /// Cast a world-space ray against current scene geometry
    pub fn raycast(&self, ray: &Ray) -> RayHit {
        raycast::raycast(&self.scene, ray)
    }

    /// Cast a ray through a framebuffer pixel against current scene
    /// geometry.
    ///
    /// A degenerate projection produces a miss, not an error.
    pub fn raycast_pixel(&self, x: f32, y: f32) -> RayHit {
        let Some(ray) =
            self.camera
                .pixel_to_ray(x, y, self.buffers.width(), self.buffers.height())
        else {
            return RayHit::miss();
        };
        raycast::raycast(&self.scene, &ray)
    }

    /// The camera's current view frustum
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.camera.view_projection_matrix())
    }

    /// Number of meshes whose world AABB is not culled by the current
    /// frustum
    pub fn visible_mesh_count(&self) -> usize {
        let frustum = self.frustum();
        let transforms = self.scene.resolve_world_transforms();
        self.scene
            .iter()
            .filter(|(key, mesh)| {
                let world_aabb = mesh.local_aabb().transformed(&transforms[*key]);
                frustum.test_aabb(&world_aabb) != Containment::Outside
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::mesh::Mesh;
    use approx::assert_relative_eq;

    /// Test backend: raycasts every pixel through the snapshot, which is
    /// exactly what a reference rasterizer must converge to
    struct RaycastBackend;

    impl RenderBackend for RaycastBackend {
        fn render(
            &mut self,
            frame: &Snapshot<'_>,
            target: &mut FrameBuffers,
        ) -> Result<(), RenderError> {
            let camera = frame.camera().camera.clone();
            let mut triangles = Vec::with_capacity(frame.triangle_count());
            for i in 0..frame.mesh_count() {
                triangles.extend(frame.mesh_at(i).expect("index in range").triangles());
            }

            for y in 0..target.height() {
                for x in 0..target.width() {
                    let Some(ray) =
                        camera.pixel_to_ray(x as f32, y as f32, target.width(), target.height())
                    else {
                        continue;
                    };
                    let mut best_t = f32::INFINITY;
                    let mut best_id = 0;
                    for tri in &triangles {
                        if let Some(hit) = crate::spatial::primitives::intersect_ray_triangle(
                            &ray,
                            tri.positions[0],
                            tri.positions[1],
                            tri.positions[2],
                        ) {
                            if hit.t < best_t {
                                best_t = hit.t;
                                best_id = tri.object_id;
                            }
                        }
                    }
                    if best_id != 0 {
                        let depth = (best_t / camera.far).clamp(0.0, 1.0);
                        target.write_pixel(x, y, best_id, depth);
                    }
                }
            }
            Ok(())
        }
    }

    fn cube_viewport() -> Viewport {
        let mut viewport = Viewport::new(64, 64);
        viewport.camera_mut().set_position(Vec3::new(0.0, 0.0, 10.0));
        viewport.camera_mut().look_at(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        for x in [0.0_f32, 3.0, -3.0] {
            let mut cube = Mesh::unit_cube();
            cube.set_translation(Vec3::new(x, 0.0, 0.0));
            viewport.scene_mut().add_mesh(cube);
        }
        viewport
    }

    #[test]
    fn id_pick_matches_raycast_after_render() {
        let mut viewport = cube_viewport();
        viewport.render(&mut RaycastBackend).unwrap();

        let pick = viewport.pick_by_id(32, 32);
        assert!(pick.hit);
        assert_eq!(pick.object_id, 1);

        let ray_hit = viewport.raycast_pixel(32.0, 32.0);
        assert!(ray_hit.hit);
        assert_eq!(ray_hit.object_id, pick.object_id);
    }

    #[test]
    fn id_pick_is_stale_until_rerender_while_raycast_is_fresh() {
        let mut viewport = cube_viewport();
        viewport.render(&mut RaycastBackend).unwrap();
        assert_eq!(viewport.pick_by_id(32, 32).object_id, 1);

        // Move the center cube away without re-rendering
        let center_key = viewport.scene().iter().next().unwrap().0;
        viewport
            .scene_mut()
            .mesh_mut(center_key)
            .unwrap()
            .set_translation(Vec3::new(0.0, 50.0, 0.0));

        // ID buffer still answers from the last render; raycast sees the edit
        assert_eq!(viewport.pick_by_id(32, 32).object_id, 1);
        assert!(!viewport.raycast_pixel(32.0, 32.0).hit);

        // After re-rendering the paths agree again
        viewport.render(&mut RaycastBackend).unwrap();
        assert!(!viewport.pick_by_id(32, 32).hit);
    }

    #[test]
    fn resize_discards_buffers_and_updates_aspect() {
        let mut viewport = cube_viewport();
        viewport.render(&mut RaycastBackend).unwrap();
        assert!(viewport.pick_by_id(32, 32).hit);

        viewport.resize(128, 32);
        assert!(!viewport.pick_by_id(32, 16).hit, "cleared on resize");
        assert_relative_eq!(viewport.camera().aspect, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn visible_mesh_count_culls_offscreen_meshes() {
        let mut viewport = cube_viewport();
        assert_eq!(viewport.visible_mesh_count(), 3);

        let mut far_cube = Mesh::unit_cube();
        far_cube.set_translation(Vec3::new(0.0, 0.0, 100.0)); // behind the camera
        viewport.scene_mut().add_mesh(far_cube);
        assert_eq!(viewport.visible_mesh_count(), 3);
    }

    #[test]
    fn scene_raycast_scenario() {
        let viewport = cube_viewport();
        let hit = viewport.raycast(&Ray::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, -1.0),
        ));
        assert!(hit.hit);
        assert_eq!(hit.object_id, 1);
        assert_relative_eq!(hit.distance, 9.5, epsilon = 1e-4);
    }
}
