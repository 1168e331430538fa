//! Installed-server configuration
//!
//! The settings file records which servers are installed, how to launch
//! them, and which of their tools are always allowed.

pub mod schema;
pub mod store;

pub use schema::{
    AlwaysAllowRule, InstalledServerConfig, RegistryConfig, Removed, ServerKind, Updated,
};
pub use store::ConfigStore;
