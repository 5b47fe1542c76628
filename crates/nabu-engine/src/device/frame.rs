/// Represents a single acquired back buffer.
///
/// This object is short-lived and must be presented promptly. Holding the
/// surface texture prevents acquisition of subsequent frames.
pub struct AcquiredFrame {
    /// Render-target view of the back buffer. Declared first so it is dropped
    /// before the texture it views.
    pub view: wgpu::TextureView,
    pub surface_texture: wgpu::SurfaceTexture,
}

impl AcquiredFrame {
    /// Queues the back buffer for display. Submit the frame's commands first.
    pub fn present(self) {
        let Self {
            view,
            surface_texture,
        } = self;
        drop(view);
        surface_texture.present();
    }
}
