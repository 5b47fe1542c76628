use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;

use super::{FrameClock, FrameGate, SchedulerState};

/// Work performed once per tick on the render thread.
pub trait FrameTarget: Send + 'static {
    fn update(&mut self, dt: f32) -> anyhow::Result<()>;

    /// Returns `false` when nothing was presented this tick.
    fn draw(&mut self) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Nominal ticks per second.
    pub frame_rate: u32,

    /// Stop on its own after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            max_frames: None,
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

/// What the render thread hands back when it is stopped.
#[derive(Debug)]
pub struct StopOutcome<T> {
    /// `None` only if the render thread panicked.
    pub target: Option<T>,

    /// Frames that completed update and draw and were presented.
    pub frames: u64,

    /// Ticks whose draw was skipped by the target.
    pub skipped: u64,

    /// The error that ended the loop early, if any.
    pub frame_error: Option<anyhow::Error>,
}

struct LoopExit<T> {
    target: T,
    frames: u64,
    skipped: u64,
    error: Option<anyhow::Error>,
}

/// Fixed-rate ticker owning a [`FrameTarget`] on a dedicated thread.
pub struct FrameScheduler<T: FrameTarget> {
    gate: Arc<FrameGate>,
    thread: Option<JoinHandle<LoopExit<T>>>,
}

impl<T: FrameTarget> FrameScheduler<T> {
    /// Spawns the `nabu-render` thread and starts ticking.
    pub fn start(target: T, config: SchedulerConfig) -> anyhow::Result<Self> {
        let gate = Arc::new(FrameGate::new());
        gate.start();

        let thread = {
            let gate = Arc::clone(&gate);
            std::thread::Builder::new()
                .name("nabu-render".into())
                .spawn(move || render_loop(target, &gate, &config))
                .context("failed to spawn render thread")?
        };

        log::info!("frame scheduler started");
        Ok(Self {
            gate,
            thread: Some(thread),
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.gate.state()
    }

    /// Stops ticking, waits out the in-flight frame and joins the render thread.
    pub fn stop(mut self) -> StopOutcome<T> {
        self.shut_down()
    }

    fn shut_down(&mut self) -> StopOutcome<T> {
        self.gate.stop();

        let Some(thread) = self.thread.take() else {
            return StopOutcome {
                target: None,
                frames: 0,
                skipped: 0,
                frame_error: None,
            };
        };

        match thread.join() {
            Ok(exit) => {
                log::info!("frame scheduler stopped after {} frames", exit.frames);
                StopOutcome {
                    target: Some(exit.target),
                    frames: exit.frames,
                    skipped: exit.skipped,
                    frame_error: exit.error,
                }
            }
            Err(_) => StopOutcome {
                target: None,
                frames: 0,
                skipped: 0,
                frame_error: Some(anyhow::anyhow!("render thread panicked")),
            },
        }
    }
}

impl<T: FrameTarget> Drop for FrameScheduler<T> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.shut_down();
        }
    }
}

fn render_loop<T: FrameTarget>(
    mut target: T,
    gate: &FrameGate,
    config: &SchedulerConfig,
) -> LoopExit<T> {
    let interval = config.interval();
    let mut clock = FrameClock::new(interval);
    let mut frames = 0u64;
    let mut skipped = 0u64;
    let mut next = Instant::now();

    while gate.wait_until(next) {
        // Late ticks restart the cadence instead of firing a burst.
        next += interval;
        let now = Instant::now();
        if next <= now {
            log::trace!("render loop behind schedule; missed ticks dropped");
            next = now + interval;
        }

        let Some(frame) = gate.try_begin_frame() else {
            continue;
        };

        let dt = clock.tick().dt;
        let result = target.update(dt).and_then(|()| target.draw());
        drop(frame);

        match result {
            Ok(true) => frames += 1,
            Ok(false) => {
                skipped += 1;
                log::debug!("tick skipped without a present ({skipped} so far)");
                continue;
            }
            Err(err) => {
                log::error!("frame {} failed: {err:#}", frames + 1);
                gate.halt();
                return LoopExit {
                    target,
                    frames,
                    skipped,
                    error: Some(err),
                };
            }
        }


        if config.max_frames.is_some_and(|max| frames >= max) {
            log::debug!("frame limit of {frames} reached");
            gate.halt();
            break;
        }
    }

    LoopExit {
        target,
        frames,
        skipped,
        error: None,
    }
}
