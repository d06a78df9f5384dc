//! Two-phase CPU raycast over the scene.
//!
//! Broad phase rejects meshes whose world AABB the ray misses (a pure
//! optimization; results are identical with it disabled), then the narrow
//! phase runs Möller-Trumbore against every triangle of each survivor in
//! world space. The globally closest positive hit wins; ties go to the
//! first mesh/triangle encountered in enumeration order, which makes
//! repeated casts against an unchanged scene deterministic.

use crate::foundation::math::{normal_matrix, transform_position, Vec3};
use crate::scene::graph::Scene;
use crate::spatial::primitives::{intersect_ray_triangle, Ray};

/// Result of a scene raycast.
///
/// All fields other than `hit` are unspecified on a miss; callers must
/// check `hit` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Whether anything was hit
    pub hit: bool,
    /// Picking id of the hit mesh
    pub object_id: u32,
    /// Metric distance from the ray origin
    pub distance: f32,
    /// Hit position in world space
    pub position: Vec3,
    /// Interpolated surface normal in world space (unit length)
    pub normal: Vec3,
    /// Barycentric coordinates `(u, v)` within the hit triangle
    pub barycentric: (f32, f32),
    /// Index of the hit triangle within its mesh
    pub triangle_index: u32,
}

impl RayHit {
    /// The canonical miss value
    pub fn miss() -> Self {
        Self {
            hit: false,
            object_id: 0,
            distance: f32::INFINITY,
            position: Vec3::zeros(),
            normal: Vec3::zeros(),
            barycentric: (0.0, 0.0),
            triangle_index: 0,
        }
    }
}

impl Default for RayHit {
    fn default() -> Self {
        Self::miss()
    }
}

/// Cast a world-space ray against every active mesh, returning the
/// closest hit.
///
/// Transforms are resolved from current scene state on every call, so
/// the result reflects edits made since the last render (unlike the
/// ID-buffer pick path).
pub fn raycast(scene: &Scene, ray: &Ray) -> RayHit {
    let transforms = scene.resolve_world_transforms();
    let mut best = RayHit::miss();
    let mut tested_meshes = 0usize;

    for (key, mesh) in scene.iter() {
        let world = transforms[key];
        let world_aabb = mesh.local_aabb().transformed(&world);

        // Broad phase
        if world_aabb.intersect_ray(ray).is_none() {
            continue;
        }
        tested_meshes += 1;

        // Narrow phase: triangles in world space
        let normal_mat = normal_matrix(&world); // once per mesh
        let vertices = mesh.vertices();
        for (triangle_index, triplet) in mesh.indices().chunks_exact(3).enumerate() {
            let [i0, i1, i2] = [triplet[0] as usize, triplet[1] as usize, triplet[2] as usize];
            let p0 = transform_position(&world, Vec3::from(vertices[i0].position));
            let p1 = transform_position(&world, Vec3::from(vertices[i1].position));
            let p2 = transform_position(&world, Vec3::from(vertices[i2].position));

            let Some(tri_hit) = intersect_ray_triangle(ray, p0, p1, p2) else {
                continue;
            };
            if best.hit && tri_hit.t >= best.distance {
                continue;
            }

            // Barycentric blend of vertex normals; w belongs to vertex 0
            let w = 1.0 - tri_hit.u - tri_hit.v;
            let blended = Vec3::from(vertices[i0].normal) * w
                + Vec3::from(vertices[i1].normal) * tri_hit.u
                + Vec3::from(vertices[i2].normal) * tri_hit.v;
            let mut normal = normal_mat * blended;
            if normal.magnitude_squared() < f32::EPSILON {
                // Degenerate vertex normals: fall back to the face normal
                normal = (p1 - p0).cross(&(p2 - p0));
            }

            best = RayHit {
                hit: true,
                object_id: mesh.object_id(),
                distance: tri_hit.t,
                position: ray.point_at(tri_hit.t),
                normal: normal.normalize(),
                barycentric: (tri_hit.u, tri_hit.v),
                triangle_index: triangle_index as u32,
            };
        }
    }

    if best.hit {
        log::trace!(
            "raycast: hit object {} at distance {:.3} ({} meshes narrow-phased)",
            best.object_id,
            best.distance,
            tested_meshes
        );
    } else {
        log::trace!("raycast: no hit ({tested_meshes} meshes narrow-phased)");
    }
    best
}
