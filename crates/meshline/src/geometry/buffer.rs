use std::collections::BTreeMap;

use super::attribute::{BufferAttribute, IndexBuffer};
use super::bounds::{Aabb, Sphere};

/// Channel names shared by the ribbon builder, the shader and the renderer.
pub mod channel {
    pub const POSITION: &str = "position";
    pub const PREVIOUS: &str = "previous";
    pub const NEXT: &str = "next";
    pub const SIDE: &str = "side";
    pub const WIDTH: &str = "width";
    pub const UV: &str = "uv";
    pub const COUNTERS: &str = "counters";
}

/// Indexed triangle geometry with named attribute channels and bounding volumes.
///
/// This is the host-facing contract: renderers bind channels by name, pickers read
/// `position` + index + bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferGeometry {
    attributes: BTreeMap<String, BufferAttribute>,
    index: Option<IndexBuffer>,
    bounding_box: Option<Aabb>,
    bounding_sphere: Option<Sphere>,
}

impl BufferGeometry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a channel.
    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: BufferAttribute) {
        self.attributes.insert(name.into(), attribute);
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&BufferAttribute> {
        self.attributes.get(name)
    }

    #[inline]
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut BufferAttribute> {
        self.attributes.get_mut(name)
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    #[inline]
    pub fn set_index(&mut self, index: IndexBuffer) {
        self.index = Some(index);
    }

    #[inline]
    pub fn index(&self) -> Option<&IndexBuffer> {
        self.index.as_ref()
    }

    #[inline]
    pub fn index_mut(&mut self) -> Option<&mut IndexBuffer> {
        self.index.as_mut()
    }

    #[inline]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bounding_box
    }

    #[inline]
    pub fn bounding_sphere(&self) -> Option<Sphere> {
        self.bounding_sphere
    }

    /// Recomputes the bounding box from the `position` channel.
    ///
    /// Clears it when there is no position data.
    pub fn compute_bounding_box(&mut self) {
        self.bounding_box = self
            .attributes
            .get(channel::POSITION)
            .and_then(|p| Aabb::from_positions(&p.array));
    }

    /// Recomputes the bounding sphere from the `position` channel.
    pub fn compute_bounding_sphere(&mut self) {
        self.bounding_sphere = self
            .attributes
            .get(channel::POSITION)
            .and_then(|p| Sphere::from_positions(&p.array));
    }

    /// Number of vertices in the `position` channel (0 when absent).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.attributes.get(channel::POSITION).map_or(0, BufferAttribute::count)
    }
}
