//! Accumulated timings per named lifecycle phase

use crate::PhaseTiming;
use std::time::Instant;

/// Phases are few and named by static strings, so a vector keeps them in
/// first-seen order without hashing.
pub struct PhaseProfiler {
    phases: Vec<(&'static str, PhaseTiming)>,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self { phases: Vec::new() }
    }

    pub fn time_phase<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = match self.phases.iter().position(|(phase, _)| *phase == name) {
            Some(index) => &mut self.phases[index].1,
            None => {
                self.phases.push((name, PhaseTiming::default()));
                let last = self.phases.len() - 1;
                &mut self.phases[last].1
            }
        };
        timing.total += elapsed;
        timing.calls += 1;
        result
    }

    pub fn timing(&self, name: &str) -> PhaseTiming {
        self.phases
            .iter()
            .find(|(phase, _)| *phase == name)
            .map(|(_, timing)| *timing)
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.phases.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PhaseTiming)> + '_ {
        self.phases.iter().copied()
    }
}

impl Default for PhaseProfiler {
    fn default() -> Self {
        Self::new()
    }
}
