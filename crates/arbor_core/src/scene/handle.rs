use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Position of a tree in its forest. Fixed when the entity is constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickGroup(u32);

impl TickGroup {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the raw index backing this group.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TickGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a constructed value within its tree.
///
/// Ids follow construction-completion order; the entity root finishes last
/// and therefore carries the highest id of its tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u32);

impl SlotId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed reference to a value owned by a tree.
///
/// Handles stay valid for the lifetime of the forest: trees are never
/// restructured after they are built, so a handle always resolves to the
/// same value.
pub struct Handle<T> {
    group: TickGroup,
    slot: SlotId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(group: TickGroup, slot: SlotId) -> Self {
        Self {
            group,
            slot,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn group(&self) -> TickGroup {
        self.group
    }

    #[inline]
    pub fn slot(&self) -> SlotId {
        self.slot
    }
}

// Manual impls: the derives would require `T` itself to be Copy/Eq/etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.slot == other.slot
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.slot.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("group", &self.group)
            .field("slot", &self.slot)
            .finish()
    }
}
