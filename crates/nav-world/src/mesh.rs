//! Nav-mesh descriptors and size-class mesh selection.
//!
//! A level usually carries several meshes: a coarse one for large
//! characters, finer ones for regular and small characters, sometimes a
//! detailed mesh covering a single building.  An agent navigates on the
//! **smallest-volume** mesh that contains it and was built for its size
//! class.

use nav_core::{Aabb, MeshId, NavSize, Point3};

/// Bounds and supported size classes of one nav mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct NavMeshInfo {
    pub id:     MeshId,
    pub bounds: Aabb,
    /// Indexed by `NavSize as usize`.
    sizes:      [bool; 3],
}

impl NavMeshInfo {
    /// A mesh usable by every size class.
    pub fn new(id: MeshId, bounds: Aabb) -> Self {
        Self { id, bounds, sizes: [true; 3] }
    }

    /// Restrict the mesh to the given size classes.
    pub fn for_sizes(mut self, sizes: &[NavSize]) -> Self {
        self.sizes = [false; 3];
        for &size in sizes {
            self.sizes[size as usize] = true;
        }
        self
    }

    #[inline]
    pub fn supports(&self, size: NavSize) -> bool {
        self.sizes[size as usize]
    }
}

/// The set of nav meshes in a level.
#[derive(Clone, Debug, Default)]
pub struct MeshCatalog {
    meshes: Vec<NavMeshInfo>,
}

impl MeshCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh, replacing any previous mesh with the same id.
    pub fn add(&mut self, info: NavMeshInfo) {
        self.meshes.retain(|m| m.id != info.id);
        self.meshes.push(info);
    }

    pub fn with(mut self, info: NavMeshInfo) -> Self {
        self.add(info);
        self
    }

    pub fn get(&self, id: MeshId) -> Option<&NavMeshInfo> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// The smallest mesh containing `position` that supports `size`.
    ///
    /// Equal volumes resolve to the lower `MeshId` so the choice never
    /// depends on registration order.
    pub fn find(&self, position: &Point3, size: NavSize) -> Option<MeshId> {
        self.meshes
            .iter()
            .filter(|m| m.supports(size) && m.bounds.contains(position))
            .min_by(|a, b| {
                a.bounds
                    .volume()
                    .total_cmp(&b.bounds.volume())
                    .then(a.id.cmp(&b.id))
            })
            .map(|m| m.id)
    }

    /// `true` if mesh `id` exists and contains `position`.
    pub fn contains(&self, id: MeshId, position: &Point3) -> bool {
        self.get(id).is_some_and(|m| m.bounds.contains(position))
    }
}
