//! A CPU raytracer built entirely on the snapshot protocol.
//!
//! The backend never touches the scene directly: it reads camera,
//! lights, and world-space triangles from the snapshot, shades with a
//! simple Lambert model, and fills the viewport's object-ID and depth
//! planes so pixel picks resolve against what it drew.

use vantage::prelude::*;
use vantage::render::backend::NO_OBJECT;
use vantage::spatial::primitives::intersect_ray_triangle;

/// Flattened world-space triangle plus its mesh-level shading inputs
struct WorldTriangle {
    triangle: Triangle,
    base_color: [f32; 3],
    opacity: f32,
}

/// Snapshot-driven raytracing backend
pub struct Raytracer {
    width: u32,
    height: u32,
    /// RGB8 plane, row-major from the top-left
    color: Vec<u8>,
}

impl Raytracer {
    /// Create a backend with an empty color plane
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            color: Vec::new(),
        }
    }

    /// The last-rendered RGB8 plane
    pub fn color_plane(&self) -> &[u8] {
        &self.color
    }

    /// Last-rendered width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Last-rendered height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    fn shade(frame: &Snapshot<'_>, tri: &WorldTriangle, hit_point: Vec3, normal: Vec3) -> [f32; 3] {
        let mut lit = frame.ambient();
        for light in frame.lights() {
            let (to_light, attenuation) = match light.kind {
                LightKind::Directional => (-light.direction, 1.0),
                LightKind::Point => {
                    let offset = light.position - hit_point;
                    let distance = offset.norm();
                    if distance <= f32::EPSILON || (light.range > 0.0 && distance > light.range) {
                        continue;
                    }
                    let falloff = if light.range > 0.0 {
                        (1.0 - distance / light.range).max(0.0)
                    } else {
                        1.0
                    };
                    (offset / distance, falloff)
                }
            };
            let diffuse = normal.dot(&to_light).max(0.0);
            lit += light.color * (light.intensity * diffuse * attenuation);
        }
        [
            (tri.base_color[0] * lit.x).min(1.0),
            (tri.base_color[1] * lit.y).min(1.0),
            (tri.base_color[2] * lit.z).min(1.0),
        ]
    }
}

impl Default for Raytracer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for Raytracer {
    fn render(&mut self, frame: &Snapshot<'_>, target: &mut FrameBuffers) -> Result<(), RenderError> {
        self.width = frame.width();
        self.height = frame.height();
        self.color.clear();
        self.color
            .resize(self.width as usize * self.height as usize * 3, 0);

        let mut triangles = Vec::with_capacity(frame.triangle_count());
        for i in 0..frame.mesh_count() {
            let view = frame
                .mesh_at(i)
                .ok_or_else(|| RenderError::Backend("mesh index out of range".to_string()))?;
            for triangle in view.triangles() {
                triangles.push(WorldTriangle {
                    triangle,
                    base_color: view.material.base_color,
                    opacity: view.opacity,
                });
            }
        }
        log::debug!(
            "raytracing {} triangles at {}x{}",
            triangles.len(),
            self.width,
            self.height
        );

        let camera = &frame.camera().camera;
        let far = camera.far;
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(ray) = camera.pixel_to_ray(x as f32, y as f32, self.width, self.height)
                else {
                    continue;
                };

                let mut nearest: Option<(f32, usize, f32, f32)> = None;
                for (index, world) in triangles.iter().enumerate() {
                    let [a, b, c] = world.triangle.positions;
                    if let Some(hit) = intersect_ray_triangle(&ray, a, b, c) {
                        if nearest.map_or(true, |(t, ..)| hit.t < t) {
                            nearest = Some((hit.t, index, hit.u, hit.v));
                        }
                    }
                }

                let Some((t, index, u, v)) = nearest else {
                    continue;
                };
                let world = &triangles[index];
                let w = 1.0 - u - v;
                let normals = &world.triangle.normals;
                let normal = (normals[0] * w + normals[1] * u + normals[2] * v).normalize();
                let point = ray.point_at(t);

                let rgb = Self::shade(frame, world, point, normal);
                let offset = (y as usize * self.width as usize + x as usize) * 3;
                for (channel, value) in rgb.iter().enumerate() {
                    let shaded = value * world.opacity + 0.02 * (1.0 - world.opacity);
                    self.color[offset + channel] = (shaded * 255.0) as u8;
                }

                target.write_pixel(x, y, world.triangle.object_id, (t / far).min(1.0));
            }
        }
        Ok(())
    }
}
