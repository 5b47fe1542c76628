use std::sync::Arc;

use super::{FrameError, RenderBackend, TeardownReport};
use crate::scene::{SceneConstants, SceneInputs, SceneState};
use crate::time::FrameTarget;

/// Drives one backend through update and draw for the single mesh scene.
pub struct Renderer<B> {
    backend: B,
    scene: SceneState,
    inputs: Arc<SceneInputs>,
    clear_color: wgpu::Color,
}

impl<B: RenderBackend> Renderer<B> {
    pub fn new(
        backend: B,
        scene: SceneState,
        inputs: Arc<SceneInputs>,
        clear_color: wgpu::Color,
    ) -> Self {
        Self {
            backend,
            scene,
            inputs,
            clear_color,
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn inputs(&self) -> &Arc<SceneInputs> {
        &self.inputs
    }

    /// Applies a pending resize, advances the scene and uploads the constants.
    pub fn update(&mut self, dt: f32) -> Result<SceneConstants, FrameError> {
        if let Some((width, height)) = self.inputs.take_resize() {
            self.backend.resize(width, height);
            if width > 0 && height > 0 {
                self.scene.resize(width, height);
            }
        }

        let light = self.inputs.light();
        let constants = self.scene.update(light);
        self.backend.write_constants(&constants)?;

        log::trace!(
            "update: dt {dt:.4}s, angle {:.3}, light {light}",
            self.scene.angle()
        );
        Ok(constants)
    }

    /// Renders and presents one frame. Returns `false` when the frame was skipped.
    pub fn draw(&mut self) -> Result<bool, FrameError> {
        if !self.backend.acquire()? {
            return Ok(false);
        }

        self.backend.clear_depth(1.0)?;
        self.backend.clear_color(self.clear_color)?;
        self.backend.bind_targets()?;
        let count = self.backend.index_count();
        self.backend.draw_indexed(count)?;
        self.backend.present()?;
        Ok(true)
    }

    pub fn release(&mut self) -> TeardownReport {
        self.backend.release()
    }
}

impl<B: RenderBackend + 'static> FrameTarget for Renderer<B> {
    fn update(&mut self, dt: f32) -> anyhow::Result<()> {
        Renderer::update(self, dt)?;
        Ok(())
    }

    fn draw(&mut self) -> anyhow::Result<bool> {
        Ok(Renderer::draw(self)?)
    }
}
