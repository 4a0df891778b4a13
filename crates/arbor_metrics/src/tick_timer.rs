//! Wall-clock timing of simulation ticks

use super::sample_window::SampleWindow;
use std::time::{Duration, Instant};

/// Measures how long each tick takes and counts ticks that exceed the
/// fixed step they are meant to fit into.
pub struct TickTimer {
    budget: Duration,
    started: Option<Instant>,
    samples: SampleWindow<Duration>,
    ticks: u64,
    overruns: u64,
}

impl TickTimer {
    pub fn new(budget: Duration, window: usize) -> Self {
        Self {
            budget,
            started: None,
            samples: SampleWindow::new(window),
            ticks: 0,
            overruns: 0,
        }
    }

    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the tick opened by [`TickTimer::begin`] and return its duration.
    pub fn end(&mut self) -> Duration {
        let Some(started) = self.started.take() else {
            return Duration::ZERO;
        };
        let elapsed = started.elapsed();
        self.record(elapsed);
        elapsed
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.samples.push(elapsed);
        self.ticks += 1;
        if elapsed > self.budget {
            self.overruns += 1;
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    pub fn average_ms(&self) -> f64 {
        self.samples.average().as_secs_f64() * 1000.0
    }

    pub fn range_ms(&self) -> (f64, f64) {
        let (min, max) = self.samples.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }
}
