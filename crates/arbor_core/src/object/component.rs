// component.rs - Lifecycle capabilities of scene objects
//
// Begin and End are optional: the default bodies are no-ops. Tick is a
// separate capability: `TICKS` decides the storage bucket of a type,
// `as_tick` dispatches to the hook.

use crate::scene::Constructor;
use crate::time::FrameTime;
use std::any::Any;

/// Signature a tickable type must provide.
pub const TICK_SIGNATURE: &str = "fn tick(&mut self, time: &FrameTime)";

/// Any value that can live in a scene.
///
/// Values are owned by their wrapper and copied only through `Clone`, so
/// a wrapped copy never aliases the value it was made from.
pub trait Component: Any + Clone + Send {
    /// Called once before the first tick.
    fn begin(&mut self) {}

    /// Called once after the last tick.
    fn end(&mut self) {}

    /// Whether values of this type are stored as tickables.
    const TICKS: bool = false;

    /// Exposes the Tick capability. Types with `TICKS = true` return
    /// `Some(self)`.
    fn as_tick(&mut self) -> Option<&mut dyn Tick> {
        None
    }
}

/// Per-frame update hook.
pub trait Tick {
    fn tick(&mut self, time: &FrameTime);
}

/// Construction entry point used by the forest.
///
/// Nested components are created through the [`Constructor`], which records
/// the nesting depth of every component as it finishes.
pub trait Construct: Component + Sized {
    fn construct(ctx: &mut Constructor<'_>) -> Self;
}

/// Helper macro to implement [`Component`].
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// struct Hull { integrity: f32 }
/// define_component!(Hull);
///
/// #[derive(Clone)]
/// struct Thruster { thrust: f32 }
/// impl Tick for Thruster { fn tick(&mut self, time: &FrameTime) { /* ... */ } }
/// define_component!(Thruster, tick);
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty) => {
        impl $crate::object::Component for $ty {}
    };
    ($ty:ty, tick) => {
        impl $crate::object::Component for $ty {
            const TICKS: bool = true;

            fn as_tick(&mut self) -> Option<&mut dyn $crate::object::Tick> {
                Some(self)
            }
        }
    };
}

/// Implement [`Construct`] through `Default` for leaf components that
/// create nothing nested.
#[macro_export]
macro_rules! construct_default {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::object::Construct for $ty {
                fn construct(_ctx: &mut $crate::scene::Constructor<'_>) -> Self {
                    <$ty as ::core::default::Default>::default()
                }
            }
        )+
    };
}
