//! Scene composition.
//!
//! A [`Scene`] owns a [`Forest`]: one [`Tree`] per entity, in creation
//! order. Each tree is rebuilt from the order and nesting depth in which
//! the entity's components finished constructing, and drives lifecycle
//! calls innermost-first.

mod construction_error;
mod forest;
mod handle;
mod report;
#[allow(clippy::module_inception)]
mod scene;
mod tree;

pub use construction_error::ConstructionError;
pub use forest::{Constructor, Forest};
pub use handle::{Handle, SlotId, TickGroup};
pub use report::{LifecycleReport, TickReport};
pub use scene::{Scene, ScenePhase};
pub use tree::{Node, NodeId, Tree};
