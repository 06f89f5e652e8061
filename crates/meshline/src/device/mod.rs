//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - owning an offscreen color target
//! - providing encoders/views for rendering

mod headless;
mod init;

pub use headless::{HeadlessFrame, HeadlessGpu};
pub use init::GpuInit;
