//! End-to-end viewport query scenarios
//!
//! Each test drives a whole pipeline through the public API: project a
//! point, cast the ray back, edit the hierarchy, compare culling with
//! raycast visibility, and rebuild a hit from snapshot triangles.

use crate::foundation::math::{Vec3, Vec4};
use crate::render::backend::NO_OBJECT;
use crate::render::material::{BlendMode, Material};
use crate::scene::mesh::Mesh;
use crate::spatial::frustum::Containment;
use crate::spatial::primitives::{intersect_ray_triangle, Ray};
use crate::viewport::Viewport;
use approx::assert_relative_eq;

/// Project a world point to the pixel whose ray passes back through it
fn project_to_pixel(viewport: &Viewport, point: Vec3) -> (f32, f32) {
    let clip = viewport.camera().view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let width = viewport.width() as f32;
    let height = viewport.height() as f32;
    let px = (ndc_x + 1.0) * 0.5 * width - 0.5;
    let py = (1.0 - ndc_y) * 0.5 * height - 0.5;
    (px, py)
}

fn three_cube_viewport() -> Viewport {
    let mut viewport = Viewport::new(640, 480);
    viewport.camera_mut().set_position(Vec3::new(0.0, 0.0, 10.0));
    viewport.camera_mut().look_at(Vec3::zeros(), Vec3::y());
    for x in [0.0_f32, -3.0, 3.0] {
        let mut cube = Mesh::unit_cube();
        cube.set_translation(Vec3::new(x, 0.0, 0.0));
        viewport.scene_mut().add_mesh(cube);
    }
    viewport
}

#[test]
fn test_projected_pixel_round_trip_identifies_each_mesh() {
    let viewport = three_cube_viewport();

    // Casting back through each cube's projected center must find that
    // cube, for the on-axis cube and the two off-axis ones alike
    for (x, expected_id) in [(0.0_f32, 1_u32), (-3.0, 2), (3.0, 3)] {
        let (px, py) = project_to_pixel(&viewport, Vec3::new(x, 0.0, 0.0));
        let hit = viewport.raycast_pixel(px, py);
        assert!(hit.hit, "expected a hit through pixel ({px}, {py})");
        assert_eq!(hit.object_id, expected_id);
    }
}

#[test]
fn test_parent_edit_observed_through_next_raycast() {
    let mut viewport = Viewport::new(640, 480);
    viewport.camera_mut().set_position(Vec3::new(0.0, 0.0, 10.0));
    viewport.camera_mut().look_at(Vec3::zeros(), Vec3::y());

    let parent = viewport.scene_mut().add_mesh(Mesh::unit_cube());
    let mut child = Mesh::unit_cube();
    child.set_translation(Vec3::new(0.0, 2.0, 0.0));
    let child = viewport.scene_mut().add_mesh(child);
    viewport.scene_mut().set_parent(child, parent).unwrap();

    let child_ray = |x: f32| Ray::new(Vec3::new(x, 2.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

    let hit = viewport.raycast(&child_ray(0.0));
    assert_eq!(hit.object_id, 2);

    // Moving the parent carries the child; no render is needed for the
    // raycast path to see it
    viewport
        .scene_mut()
        .mesh_mut(parent)
        .unwrap()
        .set_translation(Vec3::new(1.0, 0.0, 0.0));

    let stale = viewport.raycast(&child_ray(0.0));
    assert!(!stale.hit, "child should no longer sit on the old ray");

    let moved = viewport.raycast(&child_ray(1.0));
    assert_eq!(moved.object_id, 2);
    assert_relative_eq!(moved.position.x, 1.0, epsilon = 1e-4);
    assert_relative_eq!(moved.position.z, 0.5, epsilon = 1e-4);
}

#[test]
fn test_culling_agrees_with_center_pixel_raycast() {
    let mut viewport = Viewport::new(64, 64);
    viewport.camera_mut().set_position(Vec3::new(0.0, 0.0, 10.0));
    viewport.camera_mut().look_at(Vec3::zeros(), Vec3::y());

    viewport.scene_mut().add_mesh(Mesh::unit_cube());
    let mut behind = Mesh::unit_cube();
    behind.set_translation(Vec3::new(0.0, 0.0, 20.0));
    let behind = viewport.scene_mut().add_mesh(behind);

    assert_eq!(viewport.visible_mesh_count(), 1);

    let frustum = viewport.frustum();
    let behind_aabb = viewport.scene().world_aabb(behind).unwrap();
    assert_eq!(frustum.test_aabb(&behind_aabb), Containment::Outside);

    // The culled mesh is behind the camera; the center ray finds only
    // the mesh in front
    let hit = viewport.raycast_pixel(31.5, 31.5);
    assert_eq!(hit.object_id, 1);
}

#[test]
fn test_snapshot_triangle_reproduces_raycast_hit() {
    let viewport = three_cube_viewport();

    let ray = Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
    let hit = viewport.raycast(&ray);
    assert!(hit.hit);
    assert_eq!(hit.object_id, 3);

    // Find the hit mesh in the snapshot and re-intersect the reported
    // triangle in world space; both paths must agree on the distance
    let frame = viewport.snapshot();
    let view = (0..frame.mesh_count())
        .filter_map(|i| frame.mesh_at(i))
        .find(|view| view.object_id == hit.object_id)
        .expect("hit mesh present in snapshot");
    let triangle = view
        .triangles()
        .nth(hit.triangle_index as usize)
        .expect("triangle index in range");

    let again = intersect_ray_triangle(
        &ray,
        triangle.positions[0],
        triangle.positions[1],
        triangle.positions[2],
    )
    .expect("snapshot triangle must re-intersect");
    assert_relative_eq!(again.t, hit.distance, epsilon = 1e-4);
    assert_relative_eq!(again.u, hit.barycentric.0, epsilon = 1e-4);
    assert_relative_eq!(again.v, hit.barycentric.1, epsilon = 1e-4);
}

#[test]
fn test_material_and_opacity_flow_through_snapshot() {
    let mut viewport = Viewport::new(32, 32);
    let mut mesh = Mesh::unit_cube().with_material(Material::new().with_color(1.0, 0.2, 0.2));
    mesh.blend_mode = BlendMode::Alpha;
    mesh.set_opacity(0.5);
    viewport.scene_mut().add_mesh(mesh);

    let frame = viewport.snapshot();
    let view = frame.mesh_at(0).unwrap();
    assert_eq!(view.blend_mode, BlendMode::Alpha);
    assert_relative_eq!(view.opacity, 0.5);
    assert_relative_eq!(view.material.base_color[0], 1.0);
}

#[test]
fn test_pick_misses_before_first_render() {
    let viewport = three_cube_viewport();
    let pick = viewport.pick_by_id(320, 240);
    assert!(!pick.hit);
    assert_eq!(pick.object_id, NO_OBJECT);
}
