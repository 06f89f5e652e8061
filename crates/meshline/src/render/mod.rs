//! GPU rendering of mesh lines.
//!
//! The renderer owns its GPU resources (pipeline, channel buffers, textures) and
//! creates them lazily on first use.
//!
//! Convention:
//! - geometry is in the line's local space; `MeshLine::matrix_world` and the
//!   `Camera` take it to clip space in the vertex shader.
//! - depth range is `[0, 1]` (wgpu / `glam` `*_rh` projections).

mod channels;
mod ctx;
mod line;

pub use ctx::{Camera, RenderCtx, RenderTarget};
pub use line::MeshLineRenderer;
