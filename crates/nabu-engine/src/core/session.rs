use std::sync::Arc;

use super::shutdown::{shutdown, ShutdownReport};
use crate::render::{RenderBackend, Renderer};
use crate::scene::SceneInputs;
use crate::time::{FrameScheduler, SchedulerConfig, SchedulerState};

/// A running viewer: the render thread plus the inputs the host writes to.
pub struct ViewerSession<B: RenderBackend + 'static> {
    scheduler: FrameScheduler<Renderer<B>>,
    inputs: Arc<SceneInputs>,
}

impl<B: RenderBackend + 'static> ViewerSession<B> {
    pub fn start(renderer: Renderer<B>, config: SchedulerConfig) -> anyhow::Result<Self> {
        let inputs = Arc::clone(renderer.inputs());
        let scheduler = FrameScheduler::start(renderer, config)?;
        Ok(Self { scheduler, inputs })
    }

    pub fn inputs(&self) -> &Arc<SceneInputs> {
        &self.inputs
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// The render loop ended on its own (frame error or frame limit).
    pub fn has_stopped(&self) -> bool {
        self.scheduler.state() == SchedulerState::Stopped
    }

    pub fn shutdown(self) -> ShutdownReport {
        shutdown(self.scheduler)
    }
}
