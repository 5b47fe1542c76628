use thiserror::Error;

use super::TeardownReport;
use crate::scene::SceneConstants;

/// A frame could not be rendered. Any of these stops the render loop.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface failure")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("no back buffer acquired for this frame")]
    NotAcquired,

    #[error("render targets are not bound")]
    TargetsNotBound,

    #[error("render resources were already released")]
    Released,
}

/// Per-frame GPU operations the renderer drives.
///
/// A frame is `acquire`, then any of `clear_depth`, `clear_color`,
/// `bind_targets`, `draw_indexed`, then `present`. Constants may be written
/// at any time before `acquire`.
pub trait RenderBackend: Send {
    fn write_constants(&mut self, constants: &SceneConstants) -> Result<(), FrameError>;

    /// Acquires the next back buffer. `Ok(false)` means the frame is skipped.
    fn acquire(&mut self) -> Result<bool, FrameError>;

    fn clear_depth(&mut self, depth: f32) -> Result<(), FrameError>;

    fn clear_color(&mut self, color: wgpu::Color) -> Result<(), FrameError>;

    /// Binds the back buffer and the depth-stencil target as output targets.
    fn bind_targets(&mut self) -> Result<(), FrameError>;

    fn draw_indexed(&mut self, index_count: u32) -> Result<(), FrameError>;

    /// Submits the frame and queues it for display.
    fn present(&mut self) -> Result<(), FrameError>;

    /// Applies a new drawable size. Zero sizes are recorded but not applied.
    fn resize(&mut self, width: u32, height: u32);

    /// Index count of the bound mesh.
    fn index_count(&self) -> u32;

    /// Releases every GPU resource in dependency order. Idempotent.
    fn release(&mut self) -> TeardownReport;
}
