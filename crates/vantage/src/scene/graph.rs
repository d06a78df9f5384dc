//! Scene storage and the hierarchical transform resolver.
//!
//! Meshes live in a slotmap arena and reference their parent by key, so
//! ownership can never express a cycle and a removed parent simply leaves
//! a dangling (versioned) key behind. Cyclic parenting is rejected at
//! assignment time; resolution never has to detect it.

use crate::error::SceneError;
use crate::foundation::math::{Mat4, Vec3};
use crate::scene::aabb::Aabb;
use crate::scene::lighting::Light;
use crate::scene::mesh::Mesh;
use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Stable handle to a mesh in a [`Scene`]
    pub struct MeshKey;
}

/// A scene of meshes and lights with a hierarchical transform graph
///
/// Enumeration order (used identically by culling, raycasting and the
/// snapshot protocol) is insertion order, stable across parent changes
/// and unrelated removals.
#[derive(Debug)]
pub struct Scene {
    meshes: SlotMap<MeshKey, Mesh>,
    order: Vec<MeshKey>,
    next_object_id: u32,
    lights: Vec<Light>,
    /// Ambient light color
    pub ambient_color: Vec3,
    /// Ambient light intensity
    pub ambient_intensity: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            meshes: SlotMap::with_key(),
            order: Vec::new(),
            next_object_id: 1, // 0 is the ID-buffer background value
            lights: Vec::new(),
            ambient_color: Vec3::new(1.0, 1.0, 1.0),
            ambient_intensity: 0.1,
        }
    }

    /// Add a mesh, assigning it the next stable object id.
    ///
    /// Geometry was validated when the [`Mesh`] was constructed.
    pub fn add_mesh(&mut self, mut mesh: Mesh) -> MeshKey {
        mesh.object_id = self.next_object_id;
        self.next_object_id += 1;
        let key = self.meshes.insert(mesh);
        self.order.push(key);
        log::debug!(
            "scene: added mesh {key:?} (object_id {}, {} meshes total)",
            self.meshes[key].object_id,
            self.meshes.len()
        );
        key
    }

    /// Remove a mesh. Children keep their (now dangling) parent key and
    /// resolve as roots from here on.
    pub fn remove_mesh(&mut self, key: MeshKey) -> Option<Mesh> {
        let removed = self.meshes.remove(key)?;
        self.order.retain(|k| *k != key);
        log::debug!("scene: removed mesh {key:?} (object_id {})", removed.object_id);
        Some(removed)
    }

    /// Look up a mesh
    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    /// Look up a mesh mutably
    pub fn mesh_mut(&mut self, key: MeshKey) -> Option<&mut Mesh> {
        self.meshes.get_mut(key)
    }

    /// Number of active meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total triangle count over all active meshes
    pub fn triangle_count(&self) -> usize {
        self.iter().map(|(_, mesh)| mesh.triangle_count()).sum()
    }

    /// Iterate meshes in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (MeshKey, &Mesh)> {
        self.order.iter().filter_map(|&key| Some((key, self.meshes.get(key)?)))
    }

    /// Parent `child` under `parent` in the transform hierarchy.
    ///
    /// Fails with [`SceneError::InvalidParent`] if the assignment would
    /// create a cycle (including self-parenting); the hierarchy is left
    /// unchanged on failure.
    pub fn set_parent(&mut self, child: MeshKey, parent: MeshKey) -> Result<(), SceneError> {
        if !self.meshes.contains_key(child) || !self.meshes.contains_key(parent) {
            return Err(SceneError::MeshNotFound);
        }

        // Walk up from the candidate parent; revisiting the child means a cycle
        let mut ancestor = Some(parent);
        while let Some(key) = ancestor {
            if key == child {
                log::debug!("scene: rejected parenting {child:?} under {parent:?} (cycle)");
                return Err(SceneError::InvalidParent);
            }
            ancestor = self.meshes.get(key).and_then(Mesh::parent);
        }

        self.meshes[child].parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from its parent; it resolves as a root afterwards
    pub fn clear_parent(&mut self, child: MeshKey) -> Result<(), SceneError> {
        let mesh = self.meshes.get_mut(child).ok_or(SceneError::MeshNotFound)?;
        mesh.parent = None;
        Ok(())
    }

    /// True when the mesh has no live parent (a dangling parent key counts as none)
    fn is_root(&self, mesh: &Mesh) -> bool {
        match mesh.parent {
            None => true,
            Some(parent) => !self.meshes.contains_key(parent),
        }
    }

    /// Resolve the world transform of every active mesh.
    ///
    /// Pass 1 resolves roots (local == world); pass 2 sweeps repeatedly,
    /// resolving any mesh whose parent is already resolved. The sweeps
    /// terminate because parenting is acyclic by construction.
    pub fn resolve_world_transforms(&self) -> SecondaryMap<MeshKey, Mat4> {
        let mut world = SecondaryMap::with_capacity(self.meshes.len());

        for (key, mesh) in &self.meshes {
            if self.is_root(mesh) {
                world.insert(key, mesh.local_matrix());
            }
        }

        let mut remaining = self.meshes.len() - world.len();
        while remaining > 0 {
            let mut progressed = false;
            for (key, mesh) in &self.meshes {
                if world.contains_key(key) {
                    continue;
                }
                let Some(parent) = mesh.parent else { continue };
                if let Some(parent_world) = world.get(parent).copied() {
                    world.insert(key, parent_world * mesh.local_matrix());
                    remaining -= 1;
                    progressed = true;
                }
            }
            debug_assert!(progressed, "unresolvable mesh hierarchy (cycle?)");
            if !progressed {
                break;
            }
        }

        log::trace!("scene: resolved {} world transforms", world.len());
        world
    }

    /// World transform of a single mesh, walking its ancestor chain
    pub fn world_transform(&self, key: MeshKey) -> Option<Mat4> {
        let mesh = self.meshes.get(key)?;
        let mut matrix = mesh.local_matrix();
        let mut ancestor = mesh.parent;
        while let Some(parent_key) = ancestor {
            let Some(parent) = self.meshes.get(parent_key) else {
                break; // Removed parent: treat the chain end as a root
            };
            matrix = parent.local_matrix() * matrix;
            ancestor = parent.parent;
        }
        Some(matrix)
    }

    /// World-space bounds of a single mesh
    pub fn world_aabb(&self, key: MeshKey) -> Option<Aabb> {
        let mesh = self.meshes.get(key)?;
        let world = self.world_transform(key)?;
        Some(mesh.local_aabb().transformed(&world))
    }

    /// Union of all world AABBs; degenerate for an empty scene
    pub fn scene_aabb(&self) -> Aabb {
        let transforms = self.resolve_world_transforms();
        let mut bounds: Option<Aabb> = None;
        for (key, mesh) in self.iter() {
            let world = transforms[key];
            let aabb = mesh.local_aabb().transformed(&world);
            bounds = Some(match bounds {
                Some(current) => current.union(&aabb),
                None => aabb,
            });
        }
        bounds.unwrap_or_else(Aabb::degenerate)
    }

    /// Add a light to the scene
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Active lights
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}
