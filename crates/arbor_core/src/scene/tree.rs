// tree.rs - Dependency tree of one entity
//
// Values live in two dense buckets (plain, tickable). Nodes are an index
// arena describing who constructed whom; a node addresses its value by
// (bucket, index). Buckets are filled while the hierarchy is rebuilt and
// reversed once afterwards, so forward iteration visits values in the
// order they finished constructing: innermost first, entity root last.

use crate::object::{Component, PlainObject, Slot, SlotKind, Tickable};
use crate::scene::{ConstructionError, SlotId, TickGroup, TickReport};
use crate::time::FrameTime;
use std::fmt;

/// A finished component waiting for its place in the tree.
pub(crate) struct Pending {
    pub(crate) slot: Slot,
    pub(crate) depth: u32,
    pub(crate) id: SlotId,
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("type", &self.slot.type_name())
            .field("depth", &self.depth)
            .field("id", &self.id)
            .finish()
    }
}

/// Index of a node within its tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// One constructed component inside a tree.
#[derive(Debug, Clone)]
pub struct Node {
    group: TickGroup,
    slot: SlotId,
    kind: SlotKind,
    index: usize,
    depth: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Tree that owns this node.
    pub fn group(&self) -> TickGroup {
        self.group
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Bucket holding the value.
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Position of the value inside its bucket.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Nesting depth; 0 for the entity root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in construction order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Copy, Clone)]
struct Location {
    kind: SlotKind,
    index: usize,
}

/// An entity and every component constructed on its behalf.
pub struct Tree {
    group: TickGroup,
    nodes: Vec<Node>,
    plain: Vec<PlainObject>,
    tickables: Vec<Tickable>,
    locator: Vec<Option<Location>>,
}

impl Tree {
    pub(crate) fn new(group: TickGroup) -> Self {
        Self {
            group,
            nodes: Vec::new(),
            plain: Vec::new(),
            tickables: Vec::new(),
            locator: Vec::new(),
        }
    }

    pub(crate) fn add_root(&mut self, entity: Slot, id: SlotId) -> NodeId {
        debug_assert!(self.nodes.is_empty(), "tree already has a root");
        self.push_node(entity, id, 0, None)
    }

    fn push_node(&mut self, slot: Slot, id: SlotId, depth: u32, parent: Option<NodeId>) -> NodeId {
        let (kind, index) = match slot {
            Slot::Plain(object) => {
                self.plain.push(object);
                (SlotKind::Plain, self.plain.len() - 1)
            }
            Slot::Tick(object) => {
                self.tickables.push(object);
                (SlotKind::Tick, self.tickables.len() - 1)
            }
        };

        let node_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            group: self.group,
            slot: id,
            kind,
            index,
            depth,
            parent,
            children: Vec::new(),
        });

        if let Some(parent) = parent {
            self.nodes[parent.0 as usize].children.push(node_id);
        }

        node_id
    }

    /// Rebuild the hierarchy below the root from components recorded in
    /// completion order.
    ///
    /// Nested construction finishes innermost-first and consecutive entries
    /// differ in depth by at most one. Reading `pending` from the back, the
    /// newest entry is therefore either a child of the innermost open parent
    /// or a sign that this parent has no children left. Runs in O(N).
    pub(crate) fn grow(&mut self, pending: &mut Vec<Pending>) -> Result<(), ConstructionError> {
        let mut parents: Vec<NodeId> = if self.nodes.is_empty() {
            Vec::new()
        } else {
            vec![NodeId::ROOT]
        };

        while let Some(depth) = pending.last().map(|entry| entry.depth) {
            let Some(&parent) = parents.last() else {
                return Err(ConstructionError::StackUnderflow {
                    buffer: pending.len(),
                    stack: parents.len(),
                });
            };

            let parent_depth = self.nodes[parent.0 as usize].depth;
            if depth <= parent_depth {
                // every child of `parent` is placed
                parents.pop();
                continue;
            }
            if depth != parent_depth + 1 {
                return Err(ConstructionError::DepthGap {
                    depth,
                    parent_depth,
                });
            }

            if let Some(entry) = pending.pop() {
                let node = self.push_node(entry.slot, entry.id, depth, Some(parent));
                parents.push(node);
            }
        }

        self.seal();
        Ok(())
    }

    /// Reverse buckets and child lists once, then index slots.
    fn seal(&mut self) {
        self.plain.reverse();
        self.tickables.reverse();

        let plain_len = self.plain.len();
        let tick_len = self.tickables.len();
        let mut locator = vec![None; self.nodes.len()];

        for node in &mut self.nodes {
            node.index = match node.kind {
                SlotKind::Plain => plain_len - 1 - node.index,
                SlotKind::Tick => tick_len - 1 - node.index,
            };
            node.children.reverse();

            let slot = node.slot.index() as usize;
            if slot >= locator.len() {
                locator.resize(slot + 1, None);
            }
            locator[slot] = Some(Location {
                kind: node.kind,
                index: node.index,
            });
        }

        self.locator = locator;
    }

    /// Begin every value: plain bucket first, then tickables.
    pub fn begin(&mut self) {
        for object in &mut self.plain {
            object.begin();
        }
        for object in &mut self.tickables {
            object.begin();
        }
    }

    /// Tick every tickable in registration order.
    pub fn tick(&mut self, time: &FrameTime) -> TickReport {
        let mut report = TickReport::default();
        for object in &mut self.tickables {
            match object.tick(time) {
                Ok(()) => report.ticked += 1,
                Err(_) => report.missing_tick += 1,
            }
        }
        report
    }

    /// End every value, in the same order as [`Tree::begin`].
    pub fn end(&mut self) {
        for object in &mut self.plain {
            object.end();
        }
        for object in &mut self.tickables {
            object.end();
        }
    }

    pub fn group(&self) -> TickGroup {
        self.group
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Node ids in pre-order, children in construction order.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push(NodeId::ROOT);
        }
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    pub fn type_name(&self, id: NodeId) -> Option<&'static str> {
        let node = self.node(id)?;
        match node.kind {
            SlotKind::Plain => self.plain.get(node.index).map(PlainObject::type_name),
            SlotKind::Tick => self.tickables.get(node.index).map(Tickable::type_name),
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn plain_len(&self) -> usize {
        self.plain.len()
    }

    pub fn tick_len(&self) -> usize {
        self.tickables.len()
    }

    fn locate(&self, slot: SlotId) -> Option<Location> {
        self.locator.get(slot.index() as usize).copied().flatten()
    }

    /// Checked lookup of the value constructed as `slot`.
    pub fn get<T: Component>(&self, slot: SlotId) -> Option<&T> {
        let location = self.locate(slot)?;
        match location.kind {
            SlotKind::Plain => self.plain.get(location.index)?.downcast_ref(),
            SlotKind::Tick => self.tickables.get(location.index)?.downcast_ref(),
        }
    }

    pub fn get_mut<T: Component>(&mut self, slot: SlotId) -> Option<&mut T> {
        let location = self.locate(slot)?;
        match location.kind {
            SlotKind::Plain => self.plain.get_mut(location.index)?.downcast_mut(),
            SlotKind::Tick => self.tickables.get_mut(location.index)?.downcast_mut(),
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("group", &self.group)
            .field("nodes", &self.nodes.len())
            .field("plain", &self.plain.len())
            .field("tickables", &self.tickables.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Tick;
    use std::cell::RefCell;

    thread_local! {
        static LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn take_log() -> Vec<String> {
        LOG.with(|log| log.take())
    }

    #[derive(Clone)]
    struct Part(&'static str);

    impl Component for Part {
        fn begin(&mut self) {
            LOG.with(|log| log.borrow_mut().push(format!("{}-begin", self.0)));
        }

        fn end(&mut self) {
            LOG.with(|log| log.borrow_mut().push(format!("{}-end", self.0)));
        }
    }

    #[derive(Clone)]
    struct Motor(&'static str);

    impl Tick for Motor {
        fn tick(&mut self, _time: &FrameTime) {
            LOG.with(|log| log.borrow_mut().push(format!("{}-tick", self.0)));
        }
    }

    impl Component for Motor {
        const TICKS: bool = true;

        fn begin(&mut self) {
            LOG.with(|log| log.borrow_mut().push(format!("{}-begin", self.0)));
        }

        fn as_tick(&mut self) -> Option<&mut dyn Tick> {
            Some(self)
        }
    }

    fn pending(slot: Slot, depth: u32, id: u32) -> Pending {
        Pending {
            slot,
            depth,
            id: SlotId::new(id),
        }
    }

    /// Agent { C1 { C2 }, C5 { C6 } } as recorded during construction.
    fn agent_tree(root: Slot) -> Tree {
        let mut buffer = vec![
            pending(Slot::new(Part("C2")), 2, 0),
            pending(Slot::new(Part("C1")), 1, 1),
            pending(Slot::new(Part("C6")), 2, 2),
            pending(Slot::new(Part("C5")), 1, 3),
        ];
        let mut tree = Tree::new(TickGroup::new(0));
        tree.add_root(root, SlotId::new(4));
        tree.grow(&mut buffer).unwrap();
        assert!(buffer.is_empty());
        tree
    }

    fn name_of(tree: &Tree, id: NodeId) -> &'static str {
        let node = tree.node(id).unwrap();
        tree.get::<Part>(node.slot())
            .map(|part| part.0)
            .or_else(|| tree.get::<Motor>(node.slot()).map(|motor| motor.0))
            .unwrap()
    }

    #[test]
    fn rebuilds_hierarchy_from_depth_signal() {
        let tree = agent_tree(Slot::new(Part("Agent")));

        let root = tree.root();
        let names: Vec<_> = tree.children(root).iter().map(|&id| name_of(&tree, id)).collect();
        assert_eq!(names, ["C1", "C5"]);

        let c1 = tree.children(root)[0];
        let c2 = tree.children(c1)[0];
        assert_eq!(name_of(&tree, c2), "C2");
        assert_eq!(tree.node(c2).unwrap().depth(), 2);
        assert_eq!(tree.node(c2).unwrap().parent(), Some(c1));

        let preorder: Vec<_> = tree.depth_first().into_iter().map(|id| name_of(&tree, id)).collect();
        assert_eq!(preorder, ["Agent", "C1", "C2", "C5", "C6"]);
    }

    #[test]
    fn begin_runs_innermost_first() {
        let mut tree = agent_tree(Slot::new(Part("Agent")));
        take_log();
        tree.begin();
        assert_eq!(
            take_log(),
            ["C2-begin", "C1-begin", "C6-begin", "C5-begin", "Agent-begin"]
        );

        tree.end();
        assert_eq!(take_log(), ["C2-end", "C1-end", "C6-end", "C5-end", "Agent-end"]);
    }

    #[test]
    fn plain_values_begin_before_tickables() {
        let mut tree = agent_tree(Slot::new(Motor("Agent")));
        assert_eq!(tree.plain_len(), 4);
        assert_eq!(tree.tick_len(), 1);

        take_log();
        tree.begin();
        let report = tree.tick(&FrameTime::default());

        assert_eq!(report.ticked, 1);
        assert_eq!(report.missing_tick, 0);
        assert_eq!(
            take_log(),
            ["C2-begin", "C1-begin", "C6-begin", "C5-begin", "Agent-begin", "Agent-tick"]
        );
    }

    #[test]
    fn node_locations_resolve_after_reversal() {
        let tree = agent_tree(Slot::new(Part("Agent")));
        for (position, node) in tree.nodes().iter().enumerate() {
            assert_eq!(node.kind(), SlotKind::Plain);
            assert!(node.index() < tree.plain_len());
            assert_eq!(node.group(), TickGroup::new(0));
            assert!(tree.type_name(NodeId(position as u32)).unwrap().ends_with("Part"));
        }
        // completion order equals bucket order
        let by_slot: Vec<_> = (0..5).map(|id| tree.get::<Part>(SlotId::new(id)).unwrap().0).collect();
        assert_eq!(by_slot, ["C2", "C1", "C6", "C5", "Agent"]);
        assert!(tree.get::<Motor>(SlotId::new(0)).is_none());
        assert!(tree.get::<Part>(SlotId::new(9)).is_none());
    }

    #[test]
    fn root_only_tree() {
        let mut tree = Tree::new(TickGroup::new(3));
        tree.add_root(Slot::new(Part("Lonely")), SlotId::new(0));
        tree.grow(&mut Vec::new()).unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.get::<Part>(SlotId::new(0)).unwrap().0, "Lonely");
    }

    #[test]
    fn siblings_at_same_depth_keep_arrival_order() {
        let mut buffer = vec![
            pending(Slot::new(Part("A")), 1, 0),
            pending(Slot::new(Part("B")), 1, 1),
            pending(Slot::new(Part("C")), 1, 2),
        ];
        let mut tree = Tree::new(TickGroup::new(0));
        tree.add_root(Slot::new(Part("Root")), SlotId::new(3));
        tree.grow(&mut buffer).unwrap();

        let names: Vec<_> = tree.children(tree.root()).iter().map(|&id| name_of(&tree, id)).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn corrupt_signal_underflows_stack() {
        let mut buffer = vec![
            pending(Slot::new(Part("Stray")), 0, 0),
            pending(Slot::new(Part("Child")), 1, 1),
        ];
        let mut tree = Tree::new(TickGroup::new(0));
        tree.add_root(Slot::new(Part("Root")), SlotId::new(2));

        let err = tree.grow(&mut buffer).unwrap_err();
        assert_eq!(err, ConstructionError::StackUnderflow { buffer: 1, stack: 0 });
        assert!(err.to_string().contains("buffer size: 1"));
    }

    #[test]
    fn depth_jump_is_rejected() {
        let mut buffer = vec![pending(Slot::new(Part("Deep")), 2, 0)];
        let mut tree = Tree::new(TickGroup::new(0));
        tree.add_root(Slot::new(Part("Root")), SlotId::new(1));

        assert_eq!(
            tree.grow(&mut buffer).unwrap_err(),
            ConstructionError::DepthGap {
                depth: 2,
                parent_depth: 0
            }
        );
    }
}
