use crate::render::{RenderBackend, Renderer, TeardownReport};
use crate::time::FrameScheduler;

/// Result of draining the render thread and releasing the GPU.
#[derive(Debug)]
pub struct ShutdownReport {
    /// Presented frames.
    pub frames: u64,

    /// Ticks that skipped presenting, e.g. while the surface was reconfigured.
    pub skipped: u64,

    /// The error that stopped rendering before shutdown was requested.
    pub frame_error: Option<anyhow::Error>,
    pub teardown: TeardownReport,
}

/// Stops the scheduler, waits out the in-flight frame, then releases every
/// GPU resource. Nothing is released before the render thread has been joined.
pub fn shutdown<B>(scheduler: FrameScheduler<Renderer<B>>) -> ShutdownReport
where
    B: RenderBackend + 'static,
{
    let outcome = scheduler.stop();

    let teardown = match outcome.target {
        Some(mut renderer) => renderer.release(),
        None => {
            let mut report = TeardownReport::new();
            report.fail("render thread", "renderer lost with the render thread");
            report
        }
    };

    if teardown.is_clean() {
        log::info!("shutdown complete after {} frames", outcome.frames);
    } else {
        log::warn!(
            "shutdown finished with {} teardown failures",
            teardown.failures().len()
        );
    }

    ShutdownReport {
        frames: outcome.frames,
        skipped: outcome.skipped,
        frame_error: outcome.frame_error,
        teardown,
    }
}
