use crate::object::{Component, PlainObject, Tickable};

/// Storage bucket a wrapped value belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Plain,
    Tick,
}

/// Exactly one wrapped component, in the wrapper chosen for its type.
#[derive(Debug, Clone)]
pub enum Slot {
    Plain(PlainObject),
    Tick(Tickable),
}

impl Slot {
    /// Wrap `value`, selecting the Tick wrapper iff `T::TICKS`.
    ///
    /// A tickable type whose `as_tick` returns `None` still lands in the
    /// Tick wrapper and is reported on every tick.
    pub fn new<T: Component>(value: T) -> Self {
        if T::TICKS {
            Slot::Tick(Tickable::new(value))
        } else {
            Slot::Plain(PlainObject::new(value))
        }
    }

    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::Plain(_) => SlotKind::Plain,
            Slot::Tick(_) => SlotKind::Tick,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::Plain(object) => object.type_name(),
            Slot::Tick(object) => object.type_name(),
        }
    }

    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        match self {
            Slot::Plain(object) => object.downcast_ref(),
            Slot::Tick(object) => object.downcast_ref(),
        }
    }
}
