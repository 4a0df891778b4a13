//! Arbor Core
//!
//! Object-lifecycle runtime for simulations:
//! - Type-erased components with optional Begin/End and Tick hooks
//! - Per-entity dependency trees rebuilt from construction order
//! - Scene orchestration with a dedicated manager slot
//! - Deterministic fixed-step time

pub mod object;
pub mod scene;
pub mod time;

pub use object::{Component, Construct, HookError, PlainObject, Slot, SlotKind, Tick, Tickable};
pub use scene::{
    ConstructionError, Constructor, Forest, Handle, LifecycleReport, Scene, ScenePhase, TickGroup,
    TickReport, Tree,
};
pub use time::{FrameTime, SimulationTime};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
