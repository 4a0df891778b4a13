// forest.rs - Entity trees in tick-group order
//
// Entities never name their outer object when creating components. The
// forest observes construction instead: every nested `component` call
// bumps a depth counter, constructs the value (which may nest further),
// records (value, depth) once it is finished and drops the depth again.
// After the entity itself finishes, the recorded buffer is turned into the
// entity's tree and cleared.

use crate::object::{Component, Construct, Slot};
use crate::scene::tree::{Pending, Tree};
use crate::scene::{ConstructionError, Handle, SlotId, TickGroup, TickReport};
use crate::time::FrameTime;
use std::any;

/// Transient construction state. Empty, at depth zero, between entities.
#[derive(Debug, Default)]
struct ConstructionBuffer {
    pending: Vec<Pending>,
    depth: u32,
}

impl ConstructionBuffer {
    fn is_clear(&self) -> bool {
        self.pending.is_empty() && self.depth == 0
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.depth = 0;
    }

    fn record<T>(&mut self, group: TickGroup, slot: Slot) -> Handle<T> {
        let id = SlotId::new(self.pending.len() as u32);
        self.pending.push(Pending {
            slot,
            depth: self.depth,
            id,
        });
        Handle::new(group, id)
    }
}

/// Context handed to [`Construct::construct`].
///
/// It only allows nested component construction, so a new entity cannot be
/// started while another one is still being built.
pub struct Constructor<'a> {
    group: TickGroup,
    buffer: &'a mut ConstructionBuffer,
}

impl Constructor<'_> {
    /// Construct a nested component of type `U`.
    ///
    /// The handle resolves once the surrounding entity has been built.
    pub fn component<U: Construct>(&mut self) -> Handle<U> {
        self.buffer.depth += 1;
        let value = U::construct(self);
        let handle = self.buffer.record(self.group, Slot::new(value));
        self.buffer.depth -= 1;
        handle
    }

    /// Register an already built value as a leaf component.
    pub fn adopt<U: Component>(&mut self, value: U) -> Handle<U> {
        self.buffer.depth += 1;
        let handle = self.buffer.record(self.group, Slot::new(value));
        self.buffer.depth -= 1;
        handle
    }

    /// Tick group of the entity under construction.
    pub fn tick_group(&self) -> TickGroup {
        self.group
    }

    /// Depth of the component currently being constructed (0 = entity).
    pub fn depth(&self) -> u32 {
        self.buffer.depth
    }
}

/// Trees of all constructed entities, sorted by tick group.
#[derive(Debug, Default)]
pub struct Forest {
    trees: Vec<Tree>,
    buffer: ConstructionBuffer,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct entity `T` and every component it creates, as a new tree.
    ///
    /// The tree takes the next tick group. On error the entity and its
    /// components are dropped and no tree is added.
    pub fn construct_entity<T: Construct>(&mut self) -> Result<Handle<T>, ConstructionError> {
        if !self.buffer.is_clear() {
            // a previous construction unwound before it could clean up
            tracing::warn!(
                pending = self.buffer.pending.len(),
                depth = self.buffer.depth,
                "discarding construction state of an interrupted entity"
            );
            self.buffer.clear();
        }

        let group = TickGroup::new(self.trees.len() as u32);
        let mut tree = Tree::new(group);

        let entity = T::construct(&mut Constructor {
            group,
            buffer: &mut self.buffer,
        });

        let root = SlotId::new(self.buffer.pending.len() as u32);
        tree.add_root(Slot::new(entity), root);
        let grown = tree.grow(&mut self.buffer.pending);
        self.buffer.clear();

        if let Err(err) = grown {
            tracing::error!(group = %group, entity = any::type_name::<T>(), %err, "discarding entity");
            return Err(err);
        }

        tracing::debug!(
            group = %group,
            entity = any::type_name::<T>(),
            nodes = tree.len(),
            "entity constructed"
        );
        self.trees.push(tree);
        Ok(Handle::new(group, root))
    }

    pub fn begin(&mut self) {
        for tree in &mut self.trees {
            tree.begin();
        }
    }

    pub fn tick(&mut self, time: &FrameTime) -> TickReport {
        let mut report = TickReport::default();
        for tree in &mut self.trees {
            report += tree.tick(time);
        }
        report
    }

    pub fn end(&mut self) {
        for tree in &mut self.trees {
            tree.end();
        }
    }

    pub fn get<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        self.tree(handle.group())?.get(handle.slot())
    }

    pub fn get_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.trees
            .get_mut(handle.group().index() as usize)?
            .get_mut(handle.slot())
    }

    pub fn tree(&self, group: TickGroup) -> Option<&Tree> {
        self.trees.get(group.index() as usize)
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Number of trees (one per entity).
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
