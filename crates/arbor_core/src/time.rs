//! Deterministic time system
//!
//! Fixed-step simulation clock. Every Tick hook receives a [`FrameTime`]
//! snapshot instead of reading a process-wide delta.

use std::time::Duration;

/// Default simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;
pub const TICK_DURATION: Duration = Duration::from_micros(16_666); // ~16.666ms

/// Timing information for the tick currently being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    tick: u64,
    delta: Duration,
    elapsed: Duration,
}

impl FrameTime {
    pub fn new(tick: u64, delta: Duration, elapsed: Duration) -> Self {
        Self {
            tick,
            delta,
            elapsed,
        }
    }

    /// 1-based index of this tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Fixed step in seconds, the form most gameplay code wants.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Simulated time including this tick.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Default for FrameTime {
    fn default() -> Self {
        Self::new(0, TICK_DURATION, Duration::ZERO)
    }
}

/// Simulation time tracker
pub struct SimulationTime {
    step: Duration,
    tick_count: u64,
    accumulated_time: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self {
            step: TICK_DURATION,
            tick_count: 0,
            accumulated_time: Duration::ZERO,
        }
    }

    /// Clock stepping at `hz` ticks per second. A rate of zero falls back
    /// to [`TICK_RATE_HZ`].
    pub fn with_rate(hz: u32) -> Self {
        let hz = if hz == 0 { TICK_RATE_HZ } else { hz };
        Self {
            step: Duration::from_secs(1) / hz,
            ..Self::new()
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_tick(&mut self) -> FrameTime {
        self.tick_count += 1;
        self.accumulated_time += self.step;
        self.frame()
    }

    /// Snapshot of the most recently advanced tick.
    pub fn frame(&self) -> FrameTime {
        FrameTime::new(self.tick_count, self.step, self.accumulated_time)
    }

    pub fn total_time(&self) -> Duration {
        self.accumulated_time
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}
