//! Snapshot/iterator protocol: the integration surface for external
//! consumers (offline raytracers, editor tools, render backends).
//!
//! A [`Snapshot`] is a read-only view of the resolved scene: camera
//! state, lights, and a lazy sequence of mesh views with zero-copy
//! geometry references. It borrows the viewport's scene, so the borrow
//! checker enforces the validity window the contract states: a snapshot
//! cannot outlive the next `render`, `resize`, or drop of its viewport
//! (all of which require `&mut`). Consumers in turn must not stash raw
//! slices beyond the snapshot itself.

use crate::foundation::math::{normal_matrix, transform_position, Mat3, Mat4, Vec3};
use crate::render::camera::Camera;
use crate::render::material::{BlendMode, Material};
use crate::scene::graph::Scene;
use crate::scene::lighting::Light;
use crate::scene::mesh::{Mesh, Vertex};

/// Camera state frozen at snapshot time
#[derive(Debug, Clone)]
pub struct CameraState {
    /// Camera parameters (eye, target, up, fov, near, far, aspect)
    pub camera: Camera,
    /// View matrix at capture time
    pub view: Mat4,
    /// Projection matrix at capture time
    pub projection: Mat4,
}

#[derive(Debug)]
struct MeshRecord<'a> {
    mesh: &'a Mesh,
    world: Mat4,
    normal: Mat3,
}

/// Read-only view of the resolved scene, valid until the next mutating
/// call on the owning viewport
#[derive(Debug)]
pub struct Snapshot<'a> {
    camera: CameraState,
    lights: &'a [Light],
    ambient_color: Vec3,
    ambient_intensity: f32,
    width: u32,
    height: u32,
    records: Vec<MeshRecord<'a>>,
    cursor: usize,
}

impl<'a> Snapshot<'a> {
    /// Capture the current scene and camera state.
    ///
    /// World transforms are resolved once here; the normal matrix is
    /// computed once per mesh, not per triangle.
    pub(crate) fn capture(scene: &'a Scene, camera: &Camera, width: u32, height: u32) -> Self {
        let transforms = scene.resolve_world_transforms();
        let records = scene
            .iter()
            .map(|(key, mesh)| {
                let world = transforms[key];
                MeshRecord {
                    mesh,
                    world,
                    normal: normal_matrix(&world),
                }
            })
            .collect();

        Self {
            camera: CameraState {
                camera: camera.clone(),
                view: camera.view_matrix(),
                projection: camera.projection_matrix(),
            },
            lights: scene.lights(),
            ambient_color: scene.ambient_color,
            ambient_intensity: scene.ambient_intensity,
            width,
            height,
            records,
            cursor: 0,
        }
    }

    /// Camera state at capture time
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Lights active at capture time
    pub fn lights(&self) -> &'a [Light] {
        self.lights
    }

    /// Ambient light term at capture time: color premultiplied by
    /// intensity
    pub fn ambient(&self) -> Vec3 {
        self.ambient_color * self.ambient_intensity
    }

    /// Framebuffer width at capture time
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Framebuffer height at capture time
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of meshes in the snapshot
    pub fn mesh_count(&self) -> usize {
        self.records.len()
    }

    /// Total triangle count, for pre-allocating downstream structures
    pub fn triangle_count(&self) -> usize {
        self.records.iter().map(|r| r.mesh.triangle_count()).sum()
    }

    /// Advance the mesh cursor and return the next view.
    ///
    /// The sequence is finite, follows the same enumeration order as
    /// picking and culling, and does not restart on its own; call
    /// [`reset`](Self::reset) to rewind.
    pub fn next_mesh(&mut self) -> Option<MeshView<'a>> {
        let view = self.mesh_at(self.cursor)?;
        self.cursor += 1;
        Some(view)
    }

    /// Random access to the mesh at an enumeration-order index
    pub fn mesh_at(&self, index: usize) -> Option<MeshView<'a>> {
        let record = self.records.get(index)?;
        Some(MeshView {
            vertices: record.mesh.vertices(),
            indices: record.mesh.indices(),
            world: record.world,
            normal_matrix: record.normal,
            material: &record.mesh.material,
            blend_mode: record.mesh.blend_mode,
            opacity: record.mesh.opacity,
            object_id: record.mesh.object_id(),
        })
    }

    /// Rewind the mesh cursor to the start
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// One mesh as seen through a snapshot: zero-copy geometry plus resolved
/// transform state
#[derive(Debug, Clone)]
pub struct MeshView<'a> {
    /// Vertex array (borrowed from the scene)
    pub vertices: &'a [Vertex],
    /// Index array, three entries per triangle (borrowed from the scene)
    pub indices: &'a [u32],
    /// Resolved world transform
    pub world: Mat4,
    /// Inverse-transpose of the world transform's upper 3x3
    pub normal_matrix: Mat3,
    /// Surface material
    pub material: &'a Material,
    /// Blend mode
    pub blend_mode: BlendMode,
    /// Mesh opacity
    pub opacity: f32,
    /// Picking id
    pub object_id: u32,
}

impl<'a> MeshView<'a> {
    /// Number of triangles in this mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the mesh's triangles in world space
    pub fn triangles(&self) -> TriangleIter<'a> {
        TriangleIter {
            vertices: self.vertices,
            indices: self.indices,
            world: self.world,
            normal_matrix: self.normal_matrix,
            object_id: self.object_id,
            cursor: 0,
        }
    }
}

/// One triangle with positions pre-transformed to world space and
/// normals corrected by the mesh's normal matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// World-space vertex positions
    pub positions: [Vec3; 3],
    /// World-space unit vertex normals
    pub normals: [Vec3; 3],
    /// Vertex colors (RGBA)
    pub colors: [[f32; 4]; 3],
    /// Texture coordinates
    pub tex_coords: [[f32; 2]; 3],
    /// Picking id of the owning mesh
    pub object_id: u32,
    /// Triangle index within the owning mesh
    pub index: u32,
}

/// Second-level iterator over one mesh's triangles
#[derive(Debug, Clone)]
pub struct TriangleIter<'a> {
    vertices: &'a [Vertex],
    indices: &'a [u32],
    world: Mat4,
    normal_matrix: Mat3,
    object_id: u32,
    cursor: usize,
}

impl Iterator for TriangleIter<'_> {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        let base = self.cursor * 3;
        let triplet = self.indices.get(base..base + 3)?;
        let index = self.cursor as u32;
        self.cursor += 1;

        let mut positions = [Vec3::zeros(); 3];
        let mut normals = [Vec3::zeros(); 3];
        let mut colors = [[0.0; 4]; 3];
        let mut tex_coords = [[0.0; 2]; 3];
        for (slot, &i) in triplet.iter().enumerate() {
            let vertex = &self.vertices[i as usize];
            positions[slot] = transform_position(&self.world, Vec3::from(vertex.position));
            let n = self.normal_matrix * Vec3::from(vertex.normal);
            normals[slot] = if n.magnitude_squared() > f32::EPSILON {
                n.normalize()
            } else {
                n
            };
            colors[slot] = vertex.color;
            tex_coords[slot] = vertex.tex_coord;
        }

        Some(Triangle {
            positions,
            normals,
            colors,
            tex_coords,
            object_id: self.object_id,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.indices.len() / 3).saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TriangleIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    fn two_mesh_scene() -> Scene {
        let mut scene = Scene::new();
        let mut cube = Mesh::unit_cube();
        cube.set_translation(Vec3::new(2.0, 0.0, 0.0));
        scene.add_mesh(cube);
        scene.add_mesh(Mesh::plane(3.0));
        scene.add_light(Light::directional(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            1.0,
        ));
        scene
    }

    #[test]
    fn counts_match_scene_contents() {
        let scene = two_mesh_scene();
        let camera = Camera::default();
        let snapshot = Snapshot::capture(&scene, &camera, 640, 480);
        assert_eq!(snapshot.mesh_count(), 2);
        assert_eq!(snapshot.triangle_count(), 12 + 2);
        assert_eq!(snapshot.lights().len(), 1);
        assert_eq!(snapshot.width(), 640);
    }

    #[test]
    fn iteration_is_finite_and_needs_reset() {
        let scene = two_mesh_scene();
        let camera = Camera::default();
        let mut snapshot = Snapshot::capture(&scene, &camera, 640, 480);

        let mut seen = 0;
        while snapshot.next_mesh().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 2);
        assert!(snapshot.next_mesh().is_none(), "exhausted without reset");

        snapshot.reset();
        assert!(snapshot.next_mesh().is_some());
    }

    #[test]
    fn triangle_iteration_exhausts_to_triangle_count() {
        let scene = two_mesh_scene();
        let camera = Camera::default();
        let mut snapshot = Snapshot::capture(&scene, &camera, 640, 480);

        let expected = snapshot.triangle_count();
        let mut total = 0;
        while let Some(view) = snapshot.next_mesh() {
            total += view.triangles().count();
        }
        assert_eq!(total, expected);
    }

    #[test]
    fn triangles_are_world_space() {
        let scene = two_mesh_scene();
        let camera = Camera::default();
        let mut snapshot = Snapshot::capture(&scene, &camera, 640, 480);

        // First mesh is the cube translated to x=2
        let cube = snapshot.next_mesh().unwrap();
        for triangle in cube.triangles() {
            for p in triangle.positions {
                assert!(p.x >= 1.5 - 1e-5 && p.x <= 2.5 + 1e-5, "position {p:?}");
            }
        }
    }

    #[test]
    fn normals_use_inverse_transpose() {
        let mut scene = Scene::new();
        let mut plane = Mesh::plane(1.0);
        // Squash Y: a naive transform would tilt normals, the normal
        // matrix must keep the +Y face normal pointing straight up
        plane.set_transform(Transform::from_parts(
            Vec3::zeros(),
            crate::foundation::math::Quat::identity(),
            Vec3::new(1.0, 0.25, 1.0),
        ));
        scene.add_mesh(plane);

        let camera = Camera::default();
        let mut snapshot = Snapshot::capture(&scene, &camera, 64, 64);
        let view = snapshot.next_mesh().unwrap();
        let triangle = view.triangles().next().unwrap();
        for n in triangle.normals {
            assert_relative_eq!(n, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
        }
    }

    #[test]
    fn enumeration_order_matches_scene_iteration() {
        let scene = two_mesh_scene();
        let camera = Camera::default();
        let mut snapshot = Snapshot::capture(&scene, &camera, 64, 64);
        let scene_ids: Vec<u32> = scene.iter().map(|(_, m)| m.object_id()).collect();
        let mut snapshot_ids = Vec::new();
        while let Some(view) = snapshot.next_mesh() {
            snapshot_ids.push(view.object_id);
        }
        assert_eq!(scene_ids, snapshot_ids);
    }
}
