//! Ray picking for mesh lines.
//!
//! Scope:
//! - world rays, distance window and line tolerance (`Raycaster`)
//! - ray/segment and ray/sphere math (`Ray`)
//! - the mesh line probe used by `MeshLine`'s default pick function

mod probe;
mod ray;
mod raycaster;

pub use probe::mesh_line_raycast;
pub use ray::{Ray, SegmentApproach};
pub use raycaster::{Intersection, Raycast, Raycaster};
