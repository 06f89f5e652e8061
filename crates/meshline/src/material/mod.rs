//! Line material: the uniform set of the extrusion shader and CPU renditions of
//! its vertex and fragment stages.
//!
//! `shaders/meshline.wgsl` is the GPU side; `extrude` and `fragment` follow it
//! step for step and are what the tests exercise.

pub mod extrude;
pub mod fragment;
mod line_material;
mod uniform;

pub use extrude::{direction, extrude_geometry, extrude_vertex, VertexInput};
pub use fragment::{dash_mask, shade_fragment, FragmentInput};
pub use line_material::{MaterialOptions, MeshLineMaterial};
pub use uniform::LineUniform;

pub(crate) use uniform::line_ubo_min_binding_size;

/// WGSL source for the line pipeline.
pub const MESHLINE_WGSL: &str = include_str!("shaders/meshline.wgsl");
