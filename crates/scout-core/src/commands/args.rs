//! Arguments accepted by each operation.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Text to look for in server names and descriptions (case-insensitive)
    pub query: String,
    /// Maximum number of results (default 10, max 50)
    pub limit: Option<usize>,
    /// Category to search in: all, official or community (default all)
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListArgs {
    /// Page size (default 20, max 100)
    pub limit: Option<usize>,
    /// Index of the first server to return (default 0)
    pub offset: Option<i64>,
    /// Category to list: all, official or community (default all)
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InstallArgs {
    /// Name of the server to install
    pub server_name: String,
    /// GitHub repository URL of the server
    pub github_url: String,
    /// Key to store the server under in the config (defaults to server_name)
    pub config_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UninstallArgs {
    /// Name of the installed server to remove
    pub server_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateConfigArgs {
    /// Name of the installed server to update
    pub server_name: String,
    /// Replacement command arguments
    pub new_args: Option<Vec<String>>,
    /// Replacement set of always-allowed tools
    pub new_tools: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetDetailsArgs {
    /// GitHub repository URL of the server
    pub github_url: String,
}
