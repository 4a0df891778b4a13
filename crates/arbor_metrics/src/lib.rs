//! Arbor Metrics - timing instrumentation for the tick loop
//!
//! Measures per-tick wall-clock cost and accumulated time per lifecycle
//! phase (Begin, Tick, End).
//!
//! # Feature Flags
//!
//! - `metrics` - Enable collection (default: disabled)
//!
//! Without the feature every type below is an empty stub with the same
//! API, so callers never need their own `cfg` gates.
//!
//! ```ignore
//! use arbor_metrics::{PhaseProfiler, TickTimer};
//!
//! let mut timer = TickTimer::new(step, 120);
//! timer.begin();
//! profiler.time_phase("tick", || scene.tick(&frame));
//! timer.end();
//! ```

use std::time::Duration;

#[cfg(feature = "metrics")]
mod phase_profiler;
#[cfg(feature = "metrics")]
mod sample_window;
#[cfg(feature = "metrics")]
mod tick_timer;

#[cfg(feature = "metrics")]
pub use phase_profiler::PhaseProfiler;
#[cfg(feature = "metrics")]
pub use sample_window::SampleWindow;
#[cfg(feature = "metrics")]
pub use tick_timer::TickTimer;

/// Whether this build collects anything.
pub const ENABLED: bool = cfg!(feature = "metrics");

/// Total time spent in one phase and how often it ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTiming {
    pub total: Duration,
    pub calls: u64,
}

/// Time `$body` under `$name` on a [`PhaseProfiler`].
#[macro_export]
macro_rules! time_phase {
    ($profiler:expr, $name:expr, $body:block) => {
        $profiler.time_phase($name, || $body)
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct TickTimer;

#[cfg(not(feature = "metrics"))]
impl TickTimer {
    pub fn new(_budget: Duration, _window: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) -> Duration { Duration::ZERO }
    pub fn record(&mut self, _elapsed: Duration) {}
    pub fn ticks(&self) -> u64 { 0 }
    pub fn overruns(&self) -> u64 { 0 }
    pub fn average_ms(&self) -> f64 { 0.0 }
    pub fn range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
#[derive(Default)]
pub struct PhaseProfiler;

#[cfg(not(feature = "metrics"))]
impl PhaseProfiler {
    pub fn new() -> Self { Self }
    pub fn time_phase<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn timing(&self, _name: &str) -> PhaseTiming { PhaseTiming::default() }
    pub fn reset(&mut self) {}
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PhaseTiming)> + '_ { std::iter::empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_phase_macro_returns_body_value() {
        let mut profiler = PhaseProfiler::new();
        let value = time_phase!(profiler, "tick", { 2 + 3 });
        assert_eq!(value, 5);
        assert_eq!(profiler.timing("tick").calls, u64::from(ENABLED));
    }

    #[test]
    fn timer_api_is_available_in_every_build() {
        let mut timer = TickTimer::new(Duration::from_millis(16), 8);
        timer.begin();
        timer.end();
        assert_eq!(timer.ticks(), u64::from(ENABLED));
    }
}
