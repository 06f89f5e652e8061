//! Ribbon geometry.
//!
//! Responsibilities:
//! - the host-facing `BufferGeometry` container (named channels, index, bounds)
//! - reading the accepted point containers
//! - deriving the quad-strip channels from a path (`MeshLineGeometry`)
//!
//! No GPU calls happen here; renderers consume the channels by name.

mod attribute;
mod bounds;
mod buffer;
pub mod copy;
mod error;
mod mesh_line;
mod points;

pub use attribute::{BufferAttribute, IndexBuffer};
pub use bounds::{Aabb, Sphere};
pub use buffer::{channel, BufferGeometry};
pub use error::{AdvanceError, InvalidInputError, InvalidInputKind};
pub use mesh_line::{MeshLineGeometry, WidthFn};
pub use points::PointsInput;
