//! Fixed-step loop driver

use crate::ShutdownToken;
use arbor_core::{Scene, SimulationTime, TickReport};
use arbor_metrics::{time_phase, PhaseProfiler, TickTimer};
use arbor_services::{RuntimeSettings, SettingsError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid runtime settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("failed to spawn loop thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("loop thread panicked")]
    WorkerPanicked,
}

/// What a finished run did.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    /// Tick calls that hit an object without a Tick hook.
    pub missing_tick: u64,
    /// Mean wall time of the most recent ticks (zero without metrics).
    pub average_tick_ms: f64,
}

/// Drives a [`Scene`] through Begin, fixed-step Ticks and End.
#[derive(Debug)]
pub struct Engine {
    settings: RuntimeSettings,
    shutdown: ShutdownToken,
}

impl Engine {
    pub fn new(settings: RuntimeSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self {
            settings,
            shutdown: ShutdownToken::new(),
        })
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    /// Token that stops [`Engine::run`] at the next iteration boundary.
    pub fn shutdown_token(&self) -> ShutdownToken {
        self.shutdown.clone()
    }

    /// Begin once, tick until shutdown or `max_ticks`, then End once.
    pub fn run(&self, scene: &mut Scene) -> RunSummary {
        let mut time = SimulationTime::with_rate(self.settings.tick_rate_hz);
        let mut timer =
            TickTimer::new(self.settings.tick_duration(), self.settings.metrics_window);
        let mut profiler = PhaseProfiler::new();
        let mut totals = TickReport::default();

        tracing::info!(
            tick_rate_hz = self.settings.tick_rate_hz,
            max_ticks = ?self.settings.max_ticks,
            trees = scene.forest().len(),
            "starting loop"
        );
        time_phase!(profiler, "begin", { scene.begin() });

        loop {
            if self.shutdown.is_requested() {
                tracing::info!(tick = time.tick_count(), "shutdown requested");
                break;
            }
            if self
                .settings
                .max_ticks
                .is_some_and(|max| time.tick_count() >= max)
            {
                break;
            }

            let started = Instant::now();
            timer.begin();
            let frame = time.advance_tick();
            let report = time_phase!(profiler, "tick", { scene.tick(&frame) });
            timer.end();
            totals += report;

            if frame.tick() % self.settings.metrics_window as u64 == 0 {
                let (min_ms, max_ms) = timer.range_ms();
                tracing::debug!(
                    tick = frame.tick(),
                    avg_ms = timer.average_ms(),
                    min_ms,
                    max_ms,
                    overruns = timer.overruns(),
                    "tick timing"
                );
            }

            if self.settings.pace_to_wall_clock {
                let remaining = time.step().saturating_sub(started.elapsed());
                if !remaining.is_zero() {
                    thread::sleep(remaining);
                }
            }
        }

        time_phase!(profiler, "end", { scene.end() });

        for (phase, timing) in profiler.iter() {
            tracing::debug!(
                phase,
                calls = timing.calls,
                total_ms = timing.total.as_secs_f64() * 1000.0,
                "phase timing"
            );
        }

        let summary = RunSummary {
            ticks: time.tick_count(),
            missing_tick: totals.missing_tick as u64,
            average_tick_ms: timer.average_ms(),
        };
        tracing::info!(
            ticks = summary.ticks,
            missing_tick = summary.missing_tick,
            "loop finished"
        );
        summary
    }

    /// Move the scene onto a dedicated loop thread.
    pub fn spawn(self, scene: Scene) -> Result<EngineThread, EngineError> {
        let shutdown = self.shutdown_token();
        let handle = thread::Builder::new()
            .name("arbor-loop".to_string())
            .spawn(move || {
                let mut scene = scene;
                let summary = self.run(&mut scene);
                (scene, summary)
            })
            .map_err(EngineError::Spawn)?;

        Ok(EngineThread { shutdown, handle })
    }
}

/// A loop running on its own thread.
pub struct EngineThread {
    shutdown: ShutdownToken,
    handle: JoinHandle<(Scene, RunSummary)>,
}

impl EngineThread {
    pub fn shutdown_token(&self) -> ShutdownToken {
        self.shutdown.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request shutdown and wait for End to complete.
    pub fn shutdown(self) -> Result<(Scene, RunSummary), EngineError> {
        self.shutdown.request();
        self.join()
    }

    /// Wait for the loop to stop on its own.
    pub fn join(self) -> Result<(Scene, RunSummary), EngineError> {
        self.handle.join().map_err(|_| EngineError::WorkerPanicked)
    }
}
