//! Paint sources consumed by the line material.
//!
//! Scope:
//! - color representation (linear RGB; opacity lives on the material)
//! - textures for `map` / `alphaMap`

pub mod color;
pub mod texture;

pub use color::Color;
pub use texture::{Texture, TextureId};
