//! Turning GitHub repositories into installed server entries.

pub mod plan;

pub use plan::{InstallHint, InstallPlan, Launcher};
