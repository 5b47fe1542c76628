//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue at a supported capability tier
//! - creating & configuring the Surface (swapchain) and its depth-stencil target
//! - acquiring back buffers for rendering

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::GpuDevice;
#[cfg(test)]
pub(crate) use context::noop_device;
pub use error::{DeviceCreationError, SurfaceCreationError, SurfaceErrorAction};
pub use frame::AcquiredFrame;
pub use init::{select_tier, CapabilityTier, DeviceInit, DriverType};
pub use surface::{RenderSurface, SurfaceSpec, DEPTH_FORMAT};
