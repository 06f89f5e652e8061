use glam::Mat4;

use crate::geometry::MeshLineGeometry;
use crate::material::MeshLineMaterial;
use crate::pick::{mesh_line_raycast, Intersection, Raycast, Raycaster};

/// Per-instance hit test. Receives the line, the raycaster and the output list.
pub type PickFn = fn(&MeshLine, &Raycaster, &mut Vec<Intersection>);

/// A drawable, pickable line: ribbon geometry, its material and world placement.
#[derive(Debug, Clone)]
pub struct MeshLine {
    pub geometry: MeshLineGeometry,
    pub material: MeshLineMaterial,
    pub matrix_world: Mat4,
    /// `None` makes the line invisible to raycasts.
    pub pick: Option<PickFn>,
}

impl Default for MeshLine {
    fn default() -> Self {
        Self::new(MeshLineGeometry::default(), MeshLineMaterial::default())
    }
}

impl MeshLine {
    pub fn new(geometry: MeshLineGeometry, material: MeshLineMaterial) -> Self {
        Self {
            geometry,
            material,
            matrix_world: Mat4::IDENTITY,
            pick: Some(mesh_line_raycast),
        }
    }

    #[inline]
    pub fn set_matrix_world(&mut self, matrix_world: Mat4) {
        self.matrix_world = matrix_world;
    }
}

impl Raycast for MeshLine {
    fn raycast(&self, raycaster: &Raycaster, intersects: &mut Vec<Intersection>) {
        if let Some(pick) = self.pick {
            pick(self, raycaster, intersects);
        }
    }
}
