//! Mesh representation for 3D models
//!
//! Pure geometry data structures with no backend dependencies. Vertex and
//! index data are immutable after construction, so derived values (the
//! local bounding box) are computed once and cached.

use crate::error::SceneError;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::render::material::{BlendMode, Material};
use crate::scene::aabb::Aabb;
use crate::scene::graph::MeshKey;
use bytemuck::{Pod, Zeroable};

/// 3D vertex data structure
///
/// The `#[repr(C)]` layout keeps the struct uploadable to GPU buffers by
/// out-of-tree backends without repacking.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Normal vector in model space
    pub normal: [f32; 3],

    /// Vertex color (RGBA)
    pub color: [f32; 4],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new white vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            color: [1.0, 1.0, 1.0, 1.0],
            tex_coord,
        }
    }

    /// Set the vertex color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

/// Local transform of a mesh: composed TRS or an explicit matrix
#[derive(Debug, Clone, PartialEq)]
pub enum LocalTransform {
    /// Translation / rotation / scale components
    Trs(Transform),
    /// Explicit 4x4 matrix
    Matrix(Mat4),
}

impl LocalTransform {
    /// The local transform as a matrix
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            Self::Trs(transform) => transform.to_matrix(),
            Self::Matrix(matrix) => *matrix,
        }
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::Trs(Transform::default())
    }
}

/// A triangle mesh in the scene
///
/// Owns its geometry, local transform, material state and an optional
/// parent link into the scene's transform hierarchy. The `object_id` is
/// assigned by [`crate::scene::Scene::add_mesh`] and is the value render
/// backends write into the ID buffer for picking.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    local: LocalTransform,
    local_aabb: Aabb,
    pub(crate) parent: Option<MeshKey>,
    pub(crate) object_id: u32,
    /// Surface material
    pub material: Material,
    /// How the mesh blends over what's behind it
    pub blend_mode: BlendMode,
    /// Overall opacity in `[0, 1]`
    pub opacity: f32,
}

impl Mesh {
    /// Create a mesh from vertex and index arrays.
    ///
    /// Rejects empty geometry, a partial final triangle, and indices past
    /// the vertex array; nothing is constructed on failure.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, SceneError> {
        if vertices.is_empty() {
            return Err(SceneError::EmptyGeometry);
        }
        if indices.len() % 3 != 0 {
            return Err(SceneError::PartialTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(SceneError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let local_aabb = Aabb::from_points(vertices.iter().map(|v| Vec3::from(v.position)));

        Ok(Self {
            vertices,
            indices,
            local: LocalTransform::default(),
            local_aabb,
            parent: None,
            object_id: 0,
            material: Material::default(),
            blend_mode: BlendMode::Opaque,
            opacity: 1.0,
        })
    }

    /// Vertex array (zero-copy view)
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index array, three entries per triangle (zero-copy view)
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Tight axis-aligned bounds of the untransformed vertex positions
    pub fn local_aabb(&self) -> Aabb {
        self.local_aabb
    }

    /// Stable picking identifier, 0 until the mesh is added to a scene
    pub fn object_id(&self) -> u32 {
        self.object_id
    }

    /// Parent mesh in the transform hierarchy, if any
    pub fn parent(&self) -> Option<MeshKey> {
        self.parent
    }

    /// Current local transform
    pub fn local_transform(&self) -> &LocalTransform {
        &self.local
    }

    /// Local transform as a matrix
    pub fn local_matrix(&self) -> Mat4 {
        self.local.to_matrix()
    }

    /// Replace the local transform with TRS components
    pub fn set_transform(&mut self, transform: Transform) {
        self.local = LocalTransform::Trs(transform);
    }

    /// Replace the local transform with an explicit matrix
    pub fn set_matrix(&mut self, matrix: Mat4) {
        self.local = LocalTransform::Matrix(matrix);
    }

    /// Move the mesh, keeping rotation and scale
    pub fn set_translation(&mut self, position: Vec3) {
        match &mut self.local {
            LocalTransform::Trs(transform) => transform.position = position,
            LocalTransform::Matrix(matrix) => {
                matrix.m14 = position.x;
                matrix.m24 = position.y;
                matrix.m34 = position.z;
            }
        }
    }

    /// Set overall opacity, clamped to `[0, 1]`
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Builder-style material assignment
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Axis-aligned cuboid centered at the origin with the given half extents
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);

        // 4 vertices per face so each face carries its own flat normal
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            (
                [0.0, 0.0, 1.0],
                [[-hx, -hy, hz], [hx, -hy, hz], [hx, hy, hz], [-hx, hy, hz]],
            ),
            (
                [0.0, 0.0, -1.0],
                [[hx, -hy, -hz], [-hx, -hy, -hz], [-hx, hy, -hz], [hx, hy, -hz]],
            ),
            (
                [1.0, 0.0, 0.0],
                [[hx, -hy, hz], [hx, -hy, -hz], [hx, hy, -hz], [hx, hy, hz]],
            ),
            (
                [-1.0, 0.0, 0.0],
                [[-hx, -hy, -hz], [-hx, -hy, hz], [-hx, hy, hz], [-hx, hy, -hz]],
            ),
            (
                [0.0, 1.0, 0.0],
                [[-hx, hy, hz], [hx, hy, hz], [hx, hy, -hz], [-hx, hy, -hz]],
            ),
            (
                [0.0, -1.0, 0.0],
                [[-hx, -hy, -hz], [hx, -hy, -hz], [hx, -hy, hz], [-hx, -hy, hz]],
            ),
        ];

        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in &faces {
            let base = vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(uvs) {
                vertices.push(Vertex::new(*corner, *normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices).expect("cuboid geometry is always valid")
    }

    /// Unit cube spanning -0.5..0.5 on every axis
    pub fn unit_cube() -> Self {
        Self::cuboid(Vec3::new(0.5, 0.5, 0.5))
    }

    /// Flat quad in the XZ plane facing +Y, `half_size` on a side from center
    pub fn plane(half_size: f32) -> Self {
        let s = half_size;
        let normal = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex::new([-s, 0.0, s], normal, [0.0, 0.0]),
            Vertex::new([s, 0.0, s], normal, [1.0, 0.0]),
            Vertex::new([s, 0.0, -s], normal, [1.0, 1.0]),
            Vertex::new([-s, 0.0, -s], normal, [0.0, 1.0]),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Self::new(vertices, indices).expect("plane geometry is always valid")
    }
}
