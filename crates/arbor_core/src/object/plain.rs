use crate::object::model::Erased;
use crate::object::Component;
use std::fmt;

/// Type-erased component without the Tick capability.
///
/// Only the optional Begin and End hooks are dispatched; types that do not
/// override them cost a no-op call.
#[derive(Clone)]
pub struct PlainObject {
    inner: Erased,
}

impl PlainObject {
    /// Move `value` into heap storage behind the lifecycle interface.
    pub fn new<T: Component>(value: T) -> Self {
        Self {
            inner: Erased::new(value),
        }
    }

    pub fn begin(&mut self) {
        self.inner.model().begin();
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

    /// Unchecked re-acquisition for call sites that already know the type.
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

impl fmt::Debug for PlainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PlainObject").field(&self.type_name()).finish()
    }
}
