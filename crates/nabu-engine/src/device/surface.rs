use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use super::{AcquiredFrame, GpuDevice, SurfaceCreationError, SurfaceErrorAction};
use crate::render::TeardownReport;

/// Depth-stencil format: 24-bit depth, 8-bit stencil.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Swapchain request.
#[derive(Debug, Clone)]
pub struct SurfaceSpec {
    /// Number of buffers in flight; used as the desired maximum frame latency.
    pub buffer_count: u32,

    /// Requested color format. Falls back to the first supported format.
    pub format: wgpu::TextureFormat,

    /// Requested alpha mode. Falls back to the first supported mode.
    pub alpha_mode: wgpu::CompositeAlphaMode,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            buffer_count: 2,
            format: wgpu::TextureFormat::Bgra8Unorm,
            alpha_mode: wgpu::CompositeAlphaMode::PreMultiplied,
        }
    }
}

struct DepthTarget {
    view: wgpu::TextureView,
    texture: wgpu::Texture,
}

impl DepthTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("nabu depth-stencil"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view, texture }
    }

    fn release(self) {
        let Self { view, texture } = self;
        drop(view);
        texture.destroy();
    }
}

/// Presentable surface bound to a window, plus its depth-stencil target.
///
/// The surface holds its own handle to the window, so the window stays alive
/// until [`release`](Self::release) runs during teardown.
pub struct RenderSurface {
    depth: DepthTarget,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels. May be zero while minimized.
    size: PhysicalSize<u32>,
}

impl RenderSurface {
    /// Creates and configures a vsync-locked swapchain for `window`.
    pub fn new<W>(
        gpu: &GpuDevice,
        window: W,
        width: u32,
        height: u32,
        spec: &SurfaceSpec,
    ) -> Result<Self, SurfaceCreationError>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        if width == 0 || height == 0 {
            return Err(SurfaceCreationError::ZeroSize { width, height });
        }

        let surface = gpu.instance().create_surface(window)?;
        Self::from_surface(gpu, surface, width, height, spec)
    }

    /// Configures a surface created alongside the device, see
    /// [`GpuDevice::for_window`].
    pub fn from_surface(
        gpu: &GpuDevice,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        spec: &SurfaceSpec,
    ) -> Result<Self, SurfaceCreationError> {
        if width == 0 || height == 0 {
            return Err(SurfaceCreationError::ZeroSize { width, height });
        }

        if !gpu.adapter().is_surface_supported(&surface) {
            return Err(SurfaceCreationError::Unsupported);
        }

        let caps = surface.get_capabilities(gpu.adapter());
        let format =
            choose_surface_format(&caps, spec.format).ok_or(SurfaceCreationError::NoFormats)?;
        let alpha_mode = choose_alpha_mode(&caps, Some(spec.alpha_mode));

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            // FIFO is the vsync-locked mode (sync interval 1).
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: spec.buffer_count.max(1),
        };

        surface.configure(gpu.device(), &config);
        let depth = DepthTarget::new(gpu.device(), width, height);

        log::info!("surface configured: {width}x{height} {format:?}, alpha {alpha_mode:?}");

        Ok(Self {
            depth,
            surface,
            config,
            size: PhysicalSize::new(width, height),
        })
    }

    /// Returns the active surface format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Whether the surface currently has a non-zero drawable area.
    pub fn is_drawable(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }

    /// Reconfigures the swapchain and recreates the depth target after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that case,
    /// only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !self.is_drawable() {
            return;
        }
        if new_size.width == self.config.width && new_size.height == self.config.height {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);

        let old = std::mem::replace(
            &mut self.depth,
            DepthTarget::new(device, new_size.width, new_size.height),
        );
        old.release();

        log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
    }

    /// Acquires the next back buffer and its render-target view.
    pub fn acquire(&self) -> Result<AcquiredFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(AcquiredFrame {
            view,
            surface_texture,
        })
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_error(
        &self,
        device: &wgpu::Device,
        err: &wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        let action = classify_surface_error(err);
        if action == SurfaceErrorAction::Reconfigured && self.is_drawable() {
            self.surface.configure(device, &self.config);
        }
        action
    }

    /// Releases the depth view, the depth texture, then the swapchain.
    pub(crate) fn release(self, report: &mut TeardownReport) {
        let Self { depth, surface, .. } = self;
        depth.release();
        report.record("depth-stencil target");
        drop(surface);
        report.record("swapchain");
    }
}

pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::TextureFormat,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.contains(&requested) {
        return Some(requested);
    }

    let fallback = caps.formats.first().copied()?;
    log::warn!("surface format {requested:?} unsupported, using {fallback:?}");
    Some(fallback)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: Vec<wgpu::TextureFormat>,
        alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats,
            present_modes: vec![wgpu::PresentMode::Fifo],
            alpha_modes,
            usages: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn requested_format_is_kept_when_supported() {
        let c = caps(
            vec![
                wgpu::TextureFormat::Rgba8Unorm,
                wgpu::TextureFormat::Bgra8Unorm,
            ],
            vec![],
        );
        assert_eq!(
            choose_surface_format(&c, wgpu::TextureFormat::Bgra8Unorm),
            Some(wgpu::TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn unsupported_format_falls_back_to_first() {
        let c = caps(vec![wgpu::TextureFormat::Rgba8UnormSrgb], vec![]);
        assert_eq!(
            choose_surface_format(&c, wgpu::TextureFormat::Bgra8Unorm),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn no_formats_means_no_surface() {
        let c = caps(vec![], vec![]);
        assert_eq!(choose_surface_format(&c, wgpu::TextureFormat::Bgra8Unorm), None);
    }

    // ── alpha ─────────────────────────────────────────────────────────────

    #[test]
    fn premultiplied_alpha_when_available() {
        let c = caps(
            vec![],
            vec![
                wgpu::CompositeAlphaMode::Opaque,
                wgpu::CompositeAlphaMode::PreMultiplied,
            ],
        );
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn alpha_falls_back_to_first_then_auto() {
        let c = caps(vec![], vec![wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );

        let empty = caps(vec![], vec![]);
        assert_eq!(
            choose_alpha_mode(&empty, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Auto
        );
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn surface_errors_are_classified() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
    }
}
