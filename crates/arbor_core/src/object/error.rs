use thiserror::Error;

/// Defects raised while dispatching lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    #[error(
        "object `{component}` is stored as tickable but does not implement `Tick`; required: `{signature}`"
    )]
    MissingTick {
        component: &'static str,
        signature: &'static str,
    },
}
