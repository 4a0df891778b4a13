//! Type-erased scene objects.
//!
//! A component of any concrete type is moved into one of two wrappers:
//! [`PlainObject`] for passive state holders (optional Begin/End) and
//! [`Tickable`] for types with a Tick hook. [`Slot`] selects between them
//! once, when the value is wrapped.

mod component;
mod error;
mod model;
mod plain;
mod slot;
mod tickable;

pub use component::{Component, Construct, Tick, TICK_SIGNATURE};
pub use error::HookError;
pub use plain::PlainObject;
pub use slot::{Slot, SlotKind};
pub use tickable::Tickable;
