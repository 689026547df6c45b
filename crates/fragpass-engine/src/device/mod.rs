//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring window surfaces
//! - mapping surface errors to frame-loop actions

mod error;
mod frame;
mod gpu;
mod init;
pub(crate) mod surface;

pub use error::SurfaceErrorAction;
pub use frame::TargetFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
