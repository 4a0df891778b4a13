//! Arbor Runtime
//!
//! Loop driver for a [`arbor_core::Scene`]: Begin once, fixed-step Ticks
//! until shutdown or a tick limit, End once. The loop can run inline or on
//! a dedicated worker thread.

mod engine;
mod shutdown;

pub use engine::{Engine, EngineError, EngineThread, RunSummary};
pub use shutdown::ShutdownToken;
