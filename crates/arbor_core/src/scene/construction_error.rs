use thiserror::Error;

/// Errors that abort building an entity's dependency tree.
///
/// Both variants mean the recorded nesting signal is corrupt. The entity is
/// discarded rather than stored with a misordered hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error(
        "failed building the construction dependency tree (buffer size: {buffer}, stack size: {stack})"
    )]
    StackUnderflow { buffer: usize, stack: usize },

    #[error("component at depth {depth} cannot be a child of a node at depth {parent_depth}")]
    DepthGap { depth: u32, parent_depth: u32 },
}
