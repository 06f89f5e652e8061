//! Mesh lines: wide, variable-width polylines drawn as triangle ribbons.
//!
//! A path of points is expanded into a quad strip whose vertices carry their
//! neighbours, side, width and arclength counter. The extrusion shader uses those
//! to push each vertex out perpendicular to the screen-space tangent, which gives
//! constant pixel width, mitered joins, dashing, gradients and textures.
//!
//! - `geometry`: path input and ribbon construction (`MeshLineGeometry`)
//! - `material`: uniform set plus CPU versions of the shader stages
//! - `pick`: ray picking against ribbons
//! - `render` / `device`: wgpu pipeline and an offscreen GPU context

pub mod device;
pub mod geometry;
pub mod logging;
pub mod material;
pub mod mesh;
pub mod paint;
pub mod pick;
pub mod render;

pub use geometry::{MeshLineGeometry, PointsInput, WidthFn};
pub use material::{MaterialOptions, MeshLineMaterial};
pub use mesh::{MeshLine, PickFn};
pub use pick::{Intersection, Raycast, Raycaster};
