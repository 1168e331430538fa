//! High-level operations for scout.
//!
//! This module provides the operations served over MCP and from the `call`
//! subcommand. Frontends build one [`ScoutService`] and route requests to it.

pub mod args;
pub mod service;

pub use args::{
    GetDetailsArgs, InstallArgs, ListArgs, SearchArgs, UninstallArgs, UpdateConfigArgs,
};
pub use service::{Operation, ScoutService, failure_payload};
