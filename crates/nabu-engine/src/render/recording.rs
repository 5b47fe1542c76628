//! In-memory [`RenderBackend`] that records the calls it receives.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{FrameError, RenderBackend, TeardownReport};
use crate::scene::SceneConstants;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    WriteConstants(SceneConstants),
    Acquire,
    ClearDepth(f32),
    ClearColor(wgpu::Color),
    BindTargets,
    DrawIndexed(u32),
    Present,
    Resize(u32, u32),
    Release,
}

/// Shared view of the calls, readable after the backend moved to another thread.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn last_constants(&self) -> Option<SceneConstants> {
        self.0.lock().iter().rev().find_map(|c| match c {
            Call::WriteConstants(constants) => Some(*constants),
            _ => None,
        })
    }

    fn push(&self, call: Call) {
        self.0.lock().push(call);
    }
}

pub struct RecordingBackend {
    log: CallLog,
    index_count: u32,
    acquired: bool,
    released: bool,

    /// Number of upcoming acquires that report a skipped frame.
    pub skip_frames: usize,

    /// Present number (1-based) that fails with a lost-surface error.
    pub fail_on_present: Option<usize>,
    presents: usize,
}

impl RecordingBackend {
    pub fn new(index_count: u32) -> (Self, CallLog) {
        let log = CallLog::default();
        let backend = Self {
            log: log.clone(),
            index_count,
            acquired: false,
            released: false,
            skip_frames: 0,
            fail_on_present: None,
            presents: 0,
        };
        (backend, log)
    }

    fn live(&self) -> Result<(), FrameError> {
        if self.released {
            Err(FrameError::Released)
        } else {
            Ok(())
        }
    }

    fn in_frame(&self) -> Result<(), FrameError> {
        self.live()?;
        if self.acquired {
            Ok(())
        } else {
            Err(FrameError::NotAcquired)
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn write_constants(&mut self, constants: &SceneConstants) -> Result<(), FrameError> {
        self.live()?;
        self.log.push(Call::WriteConstants(*constants));
        Ok(())
    }

    fn acquire(&mut self) -> Result<bool, FrameError> {
        self.live()?;
        self.log.push(Call::Acquire);
        if self.skip_frames > 0 {
            self.skip_frames -= 1;
            return Ok(false);
        }
        self.acquired = true;
        Ok(true)
    }

    fn clear_depth(&mut self, depth: f32) -> Result<(), FrameError> {
        self.in_frame()?;
        self.log.push(Call::ClearDepth(depth));
        Ok(())
    }

    fn clear_color(&mut self, color: wgpu::Color) -> Result<(), FrameError> {
        self.in_frame()?;
        self.log.push(Call::ClearColor(color));
        Ok(())
    }

    fn bind_targets(&mut self) -> Result<(), FrameError> {
        self.in_frame()?;
        self.log.push(Call::BindTargets);
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32) -> Result<(), FrameError> {
        self.in_frame()?;
        self.log.push(Call::DrawIndexed(index_count));
        Ok(())
    }

    fn present(&mut self) -> Result<(), FrameError> {
        self.in_frame()?;
        self.acquired = false;
        self.presents += 1;
        if self.fail_on_present == Some(self.presents) {
            return Err(FrameError::Surface(wgpu::SurfaceError::Lost));
        }
        self.log.push(Call::Present);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.push(Call::Resize(width, height));
    }

    fn index_count(&self) -> u32 {
        self.index_count
    }

    fn release(&mut self) -> TeardownReport {
        let mut report = TeardownReport::new();
        if !self.released {
            self.released = true;
            self.log.push(Call::Release);
            report.record("recording backend");
        }
        report
    }
}
