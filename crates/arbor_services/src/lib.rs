//! Arbor Services Layer
//!
//! Runtime configuration loaded from JSON.

pub mod settings;

pub use settings::{RuntimeSettings, SettingsError};
