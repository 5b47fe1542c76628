use std::time::Instant;

use parking_lot::{Condvar, Mutex};

/// Lifecycle of the frame scheduler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug)]
struct GateInner {
    state: SchedulerState,
    in_flight: bool,
    discarded: u64,
}

/// Admission control for frames: at most one in flight, none after stop.
///
/// The render thread asks for a [`FrameGuard`] per tick; the host thread
/// calls [`stop`](Self::stop), which returns only once no frame is running.
#[derive(Debug)]
pub struct FrameGate {
    inner: Mutex<GateInner>,
    changed: Condvar,
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGate {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(GateInner {
                state: SchedulerState::Idle,
                in_flight: false,
                discarded: 0,
            }),
            changed: Condvar::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.inner.lock().state
    }

    /// Idle → Running. Returns `false` from any other state.
    pub fn start(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != SchedulerState::Idle {
            return false;
        }
        inner.state = SchedulerState::Running;
        true
    }

    /// Admits one frame. Ticks that arrive while stopping, or while another
    /// frame is still in flight, are discarded.
    pub fn try_begin_frame(&self) -> Option<FrameGuard<'_>> {
        let mut inner = self.inner.lock();
        if inner.state != SchedulerState::Running || inner.in_flight {
            inner.discarded += 1;
            return None;
        }
        inner.in_flight = true;
        Some(FrameGuard { gate: self })
    }

    /// Number of ticks turned away by [`try_begin_frame`](Self::try_begin_frame).
    pub fn discarded(&self) -> u64 {
        self.inner.lock().discarded
    }

    /// Suppresses new frames and blocks until the in-flight one has finished.
    ///
    /// Idle goes straight to Stopped. Calling this again is a no-op.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        match inner.state {
            SchedulerState::Stopped => return,
            SchedulerState::Idle => {
                inner.state = SchedulerState::Stopped;
                self.changed.notify_all();
                return;
            }
            SchedulerState::Running => {
                inner.state = SchedulerState::Stopping;
                self.changed.notify_all();
            }
            SchedulerState::Stopping => {}
        }

        while inner.in_flight {
            self.changed.wait(&mut inner);
        }
        inner.state = SchedulerState::Stopped;
        self.changed.notify_all();
    }

    /// Moves to Stopped from the render thread after a fatal frame error.
    /// Must not be called while holding a [`FrameGuard`].
    pub fn halt(&self) {
        let mut inner = self.inner.lock();
        inner.state = SchedulerState::Stopped;
        self.changed.notify_all();
    }

    /// Sleeps until `deadline` or until the state changes away from Running.
    /// Returns `true` while the gate is still Running.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut inner = self.inner.lock();
        while inner.state == SchedulerState::Running {
            if self.changed.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        inner.state == SchedulerState::Running
    }

    fn end_frame(&self) {
        let mut inner = self.inner.lock();
        inner.in_flight = false;
        self.changed.notify_all();
    }
}

/// Marks one frame as in flight for as long as it lives.
#[must_use = "the frame ends when the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard<'a> {
    gate: &'a FrameGate,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.gate.end_frame();
    }
}
