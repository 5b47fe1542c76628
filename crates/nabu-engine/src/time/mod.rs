//! Frame scheduling.
//!
//! - `FrameGate`: the Idle → Running → Stopping → Stopped state machine with
//!   the single in-flight frame rule
//! - `FrameScheduler`: the fixed-rate render thread driving a `FrameTarget`
//! - `FrameClock`: clamped delta time for `FrameTarget::update`

mod frame_clock;
mod gate;
mod scheduler;

pub use frame_clock::{FrameClock, FrameTime};
pub use gate::{FrameGate, FrameGuard, SchedulerState};
pub use scheduler::{FrameScheduler, FrameTarget, SchedulerConfig, StopOutcome};
