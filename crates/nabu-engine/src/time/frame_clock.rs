use std::time::{Duration, Instant};

/// Timing of one rendered frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    pub now: Instant,

    /// Zero-based index of this tick.
    pub frame_index: u64,
}

/// Delta-time source for the render loop.
///
/// Debugger pauses and minimized windows produce huge gaps between ticks; the
/// clamp keeps `dt` inside `[dt_min, dt_max]`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    nominal: Duration,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock for a loop ticking every `nominal`. The first tick reports `nominal`.
    pub fn new(nominal: Duration) -> Self {
        Self::with_clamps(nominal, Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(nominal: Duration, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            nominal,
            dt_min,
            dt_max,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map_or(self.nominal, |last| now.saturating_duration_since(last))
            .clamp(self.dt_min, self.dt_max);
        self.last = Some(now);

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }

    pub fn frames(&self) -> u64 {
        self.frame_index
    }
}
