use std::ops::AddAssign;

/// Outcome of one Tick pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Tick hooks that ran.
    pub ticked: usize,
    /// Tickables without a Tick hook; each one was reported.
    pub missing_tick: usize,
}

impl AddAssign for TickReport {
    fn add_assign(&mut self, rhs: Self) {
        self.ticked += rhs.ticked;
        self.missing_tick += rhs.missing_tick;
    }
}

/// Running totals kept by a scene.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleReport {
    pub frames: u64,
    pub missing_tick: u64,
}

impl LifecycleReport {
    pub(crate) fn record(&mut self, tick: TickReport) {
        self.frames += 1;
        self.missing_tick += tick.missing_tick as u64;
    }
}
