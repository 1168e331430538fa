//! Installed server configuration schema
//!
//! Mirrors the JSON settings file MCP clients read:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "demo": { "type": "local", "command": "npx", "args": ["-y", "demo@latest"], "tools": [] }
//!   },
//!   "alwaysAllow": [{ "server": "demo", "tool": "query" }]
//! }
//! ```
//!
//! Keys this schema does not know about are kept as-is so that saving never
//! drops settings written by other tools.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{Result, ScoutError};
use crate::install::InstallPlan;
use crate::registry::github::GitHubRepo;

/// How an installed server is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    /// Spawned locally and spoken to over stdio
    #[default]
    #[serde(alias = "stdio")]
    Local,
    /// Reached over the network
    Remote,
    /// Any other transport (`sse`, `http`, ...), kept as written
    #[serde(untagged)]
    Other(String),
}

/// One entry under `mcpServers`. The server name is the map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledServerConfig {
    #[serde(rename = "type", default)]
    pub kind: ServerKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub tools: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstalledServerConfig {
    pub fn from_plan(plan: InstallPlan) -> Self {
        Self {
            kind: ServerKind::Local,
            command: plan.command,
            args: plan.args,
            tools: BTreeSet::new(),
            env: (!plan.env.is_empty()).then_some(plan.env),
            extra: Map::new(),
        }
    }
}

/// Permission grant letting one server's tool run without confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlwaysAllowRule {
    pub server: String,
    pub tool: String,
}

/// The persisted settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(rename = "mcpServers", default)]
    pub servers: BTreeMap<String, InstalledServerConfig>,

    #[serde(rename = "alwaysAllow", default)]
    pub always_allow: Vec<AlwaysAllowRule>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of removing a server.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub config: InstalledServerConfig,
    pub pruned_rules: usize,
}

/// Old and new state of an updated server.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated {
    pub old: InstalledServerConfig,
    pub new: InstalledServerConfig,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installed server names in key order.
    pub fn server_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    /// Install the server hosted at `github_url`.
    ///
    /// The entry is stored under `config_name` when given, else `server_name`.
    /// An existing entry with the same key is replaced, and its alwaysAllow
    /// rules go with it since the new entry starts with no tools.
    pub fn install(
        &mut self,
        server_name: &str,
        github_url: &str,
        config_name: Option<&str>,
    ) -> Result<(String, InstalledServerConfig)> {
        let repo = GitHubRepo::parse(github_url)?;
        let plan = InstallPlan::for_repo(&repo, server_name);
        let key = config_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(server_name)
            .to_string();

        let entry = InstalledServerConfig::from_plan(plan);
        let replaced = self.servers.insert(key.clone(), entry.clone()).is_some();
        if replaced {
            self.always_allow.retain(|rule| rule.server != key);
        }
        info!(server = %key, repo = %repo.slug(), replaced, "installed server");

        Ok((key, entry))
    }

    /// Remove a server and every alwaysAllow rule that names it.
    pub fn uninstall(&mut self, name: &str) -> Result<Removed> {
        let config = self
            .servers
            .remove(name)
            .ok_or_else(|| self.not_found(name))?;

        let before = self.always_allow.len();
        self.always_allow.retain(|rule| rule.server != name);
        let pruned_rules = before - self.always_allow.len();
        info!(server = %name, pruned_rules, "uninstalled server");

        Ok(Removed {
            config,
            pruned_rules,
        })
    }

    /// Replace a server's args and/or tools.
    ///
    /// Replacing the tools also rewrites the server's alwaysAllow rules to one
    /// rule per tool.
    pub fn update(
        &mut self,
        name: &str,
        new_args: Option<Vec<String>>,
        new_tools: Option<Vec<String>>,
    ) -> Result<Updated> {
        let Some(entry) = self.servers.get_mut(name) else {
            return Err(self.not_found(name));
        };
        let old = entry.clone();

        if let Some(args) = new_args {
            entry.args = args;
        }
        if let Some(tools) = new_tools {
            entry.tools = tools.into_iter().collect();
            let rules: Vec<AlwaysAllowRule> = entry
                .tools
                .iter()
                .map(|tool| AlwaysAllowRule {
                    server: name.to_string(),
                    tool: tool.clone(),
                })
                .collect();
            self.always_allow.retain(|rule| rule.server != name);
            self.always_allow.extend(rules);
        }

        let new = entry.clone();
        info!(server = %name, "updated server config");
        Ok(Updated { old, new })
    }

    fn not_found(&self, name: &str) -> ScoutError {
        ScoutError::ServerNotFound {
            name: name.to_string(),
            available: self.server_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_install_default_plan() {
        let mut config = RegistryConfig::new();
        let (key, entry) = config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();

        assert_eq!(key, "demo");
        assert_eq!(entry.command, "npx");
        assert_eq!(entry.args, vec!["-y", "demo@latest"]);
        assert_eq!(entry.env, None);
        assert!(config.servers.contains_key("demo"));
    }

    #[test]
    fn test_install_uses_config_name() {
        let mut config = RegistryConfig::new();
        let (key, _) = config
            .install("demo", "https://github.com/acme/demo", Some("my-demo"))
            .unwrap();
        assert_eq!(key, "my-demo");
        assert_eq!(config.server_names(), vec!["my-demo"]);
    }

    #[test]
    fn test_install_overwrites_same_name() {
        let mut config = RegistryConfig::new();
        config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();
        config
            .install("demo", "https://github.com/acme/other", None)
            .unwrap();

        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.servers["demo"].args, vec!["-y", "other@latest"]);
    }

    #[test]
    fn test_reinstall_drops_rules_of_replaced_entry() {
        let mut config = RegistryConfig::new();
        config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();
        config
            .install("keep", "https://github.com/acme/keep", None)
            .unwrap();
        config
            .update("demo", None, Some(vec!["query".to_string()]))
            .unwrap();
        config
            .update("keep", None, Some(vec!["read".to_string()]))
            .unwrap();

        let (_, entry) = config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();

        assert!(entry.tools.is_empty());
        assert_eq!(
            config.always_allow,
            vec![AlwaysAllowRule {
                server: "keep".to_string(),
                tool: "read".to_string(),
            }]
        );
    }

    #[test]
    fn test_install_rejects_invalid_url() {
        let mut config = RegistryConfig::new();
        let err = config.install("demo", "https://example.com", None).unwrap_err();
        assert!(matches!(err, ScoutError::InvalidGithubUrl(_)));
        assert!(config.servers.is_empty());
    }

    #[test]
    fn test_uninstall_prunes_rules() {
        let mut config = RegistryConfig::new();
        config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();
        config
            .install("keep", "https://github.com/acme/keep", None)
            .unwrap();
        config.always_allow = vec![
            AlwaysAllowRule {
                server: "demo".to_string(),
                tool: "query".to_string(),
            },
            AlwaysAllowRule {
                server: "keep".to_string(),
                tool: "read".to_string(),
            },
        ];

        let removed = config.uninstall("demo").unwrap();

        assert_eq!(removed.pruned_rules, 1);
        assert_eq!(config.server_names(), vec!["keep"]);
        assert_eq!(config.always_allow.len(), 1);
        assert_eq!(config.always_allow[0].server, "keep");
    }

    #[test]
    fn test_uninstall_missing_lists_available() {
        let mut config = RegistryConfig::new();
        config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();

        match config.uninstall("ghost") {
            Err(ScoutError::ServerNotFound { name, available }) => {
                assert_eq!(name, "ghost");
                assert_eq!(available, vec!["demo"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_update_args_and_tools() {
        let mut config = RegistryConfig::new();
        config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();
        config.always_allow.push(AlwaysAllowRule {
            server: "demo".to_string(),
            tool: "stale".to_string(),
        });

        let updated = config
            .update(
                "demo",
                Some(vec!["--port".to_string(), "8080".to_string()]),
                Some(vec!["write".to_string(), "read".to_string()]),
            )
            .unwrap();

        assert_eq!(updated.old.args, vec!["-y", "demo@latest"]);
        assert_eq!(updated.new.args, vec!["--port", "8080"]);
        assert_eq!(
            updated.new.tools.iter().cloned().collect::<Vec<_>>(),
            vec!["read", "write"]
        );
        let tools: Vec<&str> = config
            .always_allow
            .iter()
            .map(|rule| rule.tool.as_str())
            .collect();
        assert_eq!(tools, vec!["read", "write"]);
    }

    #[test]
    fn test_update_without_changes_keeps_entry() {
        let mut config = RegistryConfig::new();
        config
            .install("demo", "https://github.com/acme/demo", None)
            .unwrap();
        let updated = config.update("demo", None, None).unwrap();
        assert_eq!(updated.old, updated.new);
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "mcpServers": {
                "demo": {
                    "type": "stdio",
                    "command": "npx",
                    "args": ["-y", "demo@latest"],
                    "disabled": true
                }
            },
            "theme": "dark"
        });

        let config: RegistryConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.servers["demo"].kind, ServerKind::Local);
        assert!(config.always_allow.is_empty());

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["mcpServers"]["demo"]["disabled"], true);
        assert_eq!(value["mcpServers"]["demo"]["type"], "local");
        assert_eq!(value["alwaysAllow"], json!([]));
    }

    #[test]
    fn test_unknown_server_kind_is_kept() {
        let raw = json!({
            "mcpServers": {
                "local": {"type": "stdio", "command": "npx", "args": []},
                "events": {"type": "sse", "url": "https://events.example.com/sse"},
                "untyped": {"command": "uvx", "args": ["demo"]}
            }
        });

        let config: RegistryConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.servers["local"].kind, ServerKind::Local);
        assert_eq!(
            config.servers["events"].kind,
            ServerKind::Other("sse".to_string())
        );
        assert_eq!(config.servers["untyped"].kind, ServerKind::Local);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["mcpServers"]["events"]["type"], "sse");
        assert_eq!(
            value["mcpServers"]["events"]["url"],
            "https://events.example.com/sse"
        );
        assert_eq!(value["mcpServers"]["local"]["type"], "local");
    }
}
