use crate::object::model::Erased;
use crate::object::{Component, HookError};
use crate::time::FrameTime;
use std::fmt;

/// Type-erased component with the Begin, Tick and End hooks.
///
/// Tick is the defining capability of this wrapper. A type that ends up
/// here without one is a misconfiguration: every `tick` call reports it
/// and leaves the value untouched.
#[derive(Clone)]
pub struct Tickable {
    inner: Erased,
}

impl Tickable {
    /// Move `value` into heap storage behind the lifecycle interface.
    pub fn new<T: Component>(value: T) -> Self {
        Self {
            inner: Erased::new(value),
        }
    }

    pub fn begin(&mut self) {
        self.inner.model().begin();
    }

    /// Run the wrapped Tick hook.
    ///
    /// A missing hook is logged here, once per call, and returned so the
    /// caller can account for it. It is never fatal.
    pub fn tick(&mut self, time: &FrameTime) -> Result<(), HookError> {
        let result = self.inner.model().tick(time);
        if let Err(err) = &result {
            tracing::error!(component = self.inner.type_name(), "{err}");
        }
        result
    }

    pub fn end(&mut self) {
        self.inner.model().end();
    }

    /// Name of the wrapped concrete type.
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    pub fn is<T: Component>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Checked re-acquisition: `None` unless the wrapped type is exactly `T`.
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }

    /// Unchecked re-acquisition for hot call sites that already know the type.
    ///
    /// # Safety
    /// The wrapped value must be a `T`. Anything else is undefined behavior.
    pub unsafe fn downcast_unchecked<T: Component>(&self) -> &T {
        unsafe { self.inner.downcast_unchecked() }
    }

    /// # Safety
    /// The wrapped value must be a `T`.
    pub unsafe fn downcast_unchecked_mut<T: Component>(&mut self) -> &mut T {
        unsafe { self.inner.downcast_unchecked_mut() }
    }
}

impl fmt::Debug for Tickable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tickable").field(&self.type_name()).finish()
    }
}
