use thiserror::Error;

use super::{CapabilityTier, DriverType};

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// No driver type produced a usable device.
#[derive(Debug, Error)]
pub enum DeviceCreationError {
    #[error("no adapter available for driver types {0:?}")]
    NoAdapter(Vec<DriverType>),

    #[error("adapter `{adapter}` supports none of the capability tiers {requested:?}")]
    NoSupportedTier {
        adapter: String,
        requested: Vec<CapabilityTier>,
    },

    #[error("failed to create wgpu device/queue")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create a surface for adapter selection")]
    Surface(#[from] wgpu::CreateSurfaceError),
}

/// The presentable surface or its depth target could not be created.
#[derive(Debug, Error)]
pub enum SurfaceCreationError {
    #[error("surface size must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },

    #[error("failed to create wgpu surface")]
    Create(#[from] wgpu::CreateSurfaceError),

    #[error("selected adapter cannot present to this window")]
    Unsupported,

    #[error("no supported surface formats")]
    NoFormats,
}
