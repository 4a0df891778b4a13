// model.rs - Erased storage shared by both wrappers
//
// `Holder<T>` is monomorphized per component type, so whether a hook
// exists is settled when the wrapper is created, never by inspecting the
// value at call time.

use crate::object::{Component, HookError, TICK_SIGNATURE};
use crate::time::FrameTime;
use std::any::{self, Any};

pub(crate) trait Model: Send {
    fn begin(&mut self);
    fn tick(&mut self, time: &FrameTime) -> Result<(), HookError>;
    fn end(&mut self);
    fn clone_model(&self) -> Box<dyn Model>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

struct Holder<T>(T);

impl<T: Component> Model for Holder<T> {
    #[inline]
    fn begin(&mut self) {
        self.0.begin();
    }

    #[inline]
    fn tick(&mut self, time: &FrameTime) -> Result<(), HookError> {
        match self.0.as_tick() {
            Some(hook) => {
                hook.tick(time);
                Ok(())
            }
            None => Err(HookError::MissingTick {
                component: any::type_name::<T>(),
                signature: TICK_SIGNATURE,
            }),
        }
    }

    #[inline]
    fn end(&mut self) {
        self.0.end();
    }

    fn clone_model(&self) -> Box<dyn Model> {
        Box::new(Holder(self.0.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        &mut self.0
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// Heap-owned component behind the lifecycle vtable.
pub(crate) struct Erased {
    model: Box<dyn Model>,
}

impl Erased {
    pub(crate) fn new<T: Component>(value: T) -> Self {
        Self {
            model: Box::new(Holder(value)),
        }
    }

    #[inline]
    pub(crate) fn model(&mut self) -> &mut dyn Model {
        self.model.as_mut()
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.model.type_name()
    }

    pub(crate) fn is<T: Component>(&self) -> bool {
        self.model.as_any().is::<T>()
    }

    pub(crate) fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.model.as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.model.as_any_mut().downcast_mut::<T>()
    }

    /// # Safety
    /// The stored value must be a `T`.
    pub(crate) unsafe fn downcast_unchecked<T: Component>(&self) -> &T {
        debug_assert!(self.is::<T>(), "unchecked downcast to the wrong type");
        // SAFETY: caller guarantees the erased value is a `T`; `as_any`
        // returns a reference to exactly that value.
        unsafe { &*(self.model.as_any() as *const dyn Any as *const T) }
    }

    /// # Safety
    /// The stored value must be a `T`.
    pub(crate) unsafe fn downcast_unchecked_mut<T: Component>(&mut self) -> &mut T {
        debug_assert!(self.is::<T>(), "unchecked downcast to the wrong type");
        // SAFETY: see `downcast_unchecked`.
        unsafe { &mut *(self.model.as_any_mut() as *mut dyn Any as *mut T) }
    }
}

impl Clone for Erased {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone_model(),
        }
    }
}
