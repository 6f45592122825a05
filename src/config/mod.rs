//! Configuration module for snql.
//!
//! Handles settings file discovery and the legacy adapter's tunables.

mod settings;

pub use settings::{LegacySettings, ScopeField, Settings, SettingsError};
