//! Scout Core Library
//!
//! Discovers MCP servers listed in a remote registry document and manages
//! the local settings file that records installed servers.

pub mod commands;
pub mod config;
pub mod error;
pub mod install;
pub mod registry;
pub mod settings;

/// Re-exports of commonly used types
pub mod prelude {
    // Operations
    pub use crate::commands::{Operation, ScoutService};

    // Configuration
    pub use crate::config::{AlwaysAllowRule, ConfigStore, InstalledServerConfig, RegistryConfig};
    pub use crate::settings::Settings;

    // Registry
    pub use crate::registry::{Category, CategoryFilter, Entry, RegistryParser};

    // Errors
    pub use crate::error::{Result, ScoutError};
}
