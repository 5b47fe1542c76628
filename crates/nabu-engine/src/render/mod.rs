//! GPU rendering subsystem.
//!
//! The renderer drives a [`RenderBackend`] through the per-frame sequence.
//! [`GpuBackend`] owns every wgpu resource created at setup and releases
//! them in dependency order.

mod backend;
mod gpu_backend;
mod renderer;
mod teardown;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::{FrameError, RenderBackend};
pub use gpu_backend::{GpuBackend, GpuResources};
pub use renderer::Renderer;
pub use teardown::TeardownReport;
