//! Operation implementations.
//!
//! Each public operation returns a JSON payload. Failures never escape as
//! errors: they become `{"success": false, "error": "..."}` so callers always
//! receive a readable result. Only [`ScoutService::dispatch`] returns an
//! error, and only for an unknown operation name.

use std::str::FromStr;

use schemars::schema_for;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::config::{ConfigStore, InstalledServerConfig};
use crate::error::{Result, ScoutError};
use crate::install::InstallHint;
use crate::registry::entry::{CategoryFilter, Entry};
use crate::registry::fetcher::{DocumentFetcher, build_http_client};
use crate::registry::github::{GitHubClient, GitHubRepo};
use crate::registry::query;
use crate::settings::Settings;

use super::args::{
    GetDetailsArgs, InstallArgs, ListArgs, SearchArgs, UninstallArgs, UpdateConfigArgs,
};

/// Operations exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    List,
    Install,
    Uninstall,
    ListInstalled,
    UpdateConfig,
    GetDetails,
    Backup,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::Search,
        Operation::List,
        Operation::Install,
        Operation::Uninstall,
        Operation::ListInstalled,
        Operation::UpdateConfig,
        Operation::GetDetails,
        Operation::Backup,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::List => "list",
            Operation::Install => "install",
            Operation::Uninstall => "uninstall",
            Operation::ListInstalled => "list_installed",
            Operation::UpdateConfig => "update_config",
            Operation::GetDetails => "get_details",
            Operation::Backup => "backup",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::Search => {
                "Search MCP servers in the registry by name or description. Options: limit (default 10, max 50), category (all, official, community)."
            }
            Operation::List => {
                "List MCP servers from the registry page by page. Options: limit (default 20, max 100), offset (default 0), category (all, official, community)."
            }
            Operation::Install => {
                "Install an MCP server from its GitHub URL into the local settings file. Optional config_name sets the key it is stored under."
            }
            Operation::Uninstall => "Remove an installed MCP server and its always-allow rules.",
            Operation::ListInstalled => "List the MCP servers installed in the local settings file.",
            Operation::UpdateConfig => {
                "Update an installed MCP server. new_args replaces its arguments, new_tools replaces its always-allowed tools."
            }
            Operation::GetDetails => {
                "Show GitHub repository details for an MCP server: stars, forks, issues, license, topics, timestamps and a README preview."
            }
            Operation::Backup => "Back up the local settings file to a timestamped copy.",
        }
    }

    /// JSON schema of the operation's arguments object.
    pub fn input_schema(&self) -> Map<String, Value> {
        let schema = match self {
            Operation::Search => schema_for!(SearchArgs),
            Operation::List => schema_for!(ListArgs),
            Operation::Install => schema_for!(InstallArgs),
            Operation::Uninstall => schema_for!(UninstallArgs),
            Operation::UpdateConfig => schema_for!(UpdateConfigArgs),
            Operation::GetDetails => schema_for!(GetDetailsArgs),
            Operation::ListInstalled | Operation::Backup => return empty_object_schema(),
        };
        match serde_json::to_value(schema) {
            Ok(Value::Object(map)) => map,
            _ => empty_object_schema(),
        }
    }
}

fn empty_object_schema() -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), json!({}));
    schema
}

impl FromStr for Operation {
    type Err = ScoutError;

    fn from_str(name: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| ScoutError::UnknownTool(name.to_string()))
    }
}

/// A registry entry together with how to install it.
#[derive(Debug, Serialize)]
struct EntryView<'a> {
    #[serde(flatten)]
    entry: &'a Entry,
    installation: InstallHint,
}

impl<'a> EntryView<'a> {
    fn new(entry: &'a Entry) -> Self {
        Self {
            entry,
            installation: InstallHint::for_link(&entry.link, &entry.name),
        }
    }
}

/// An installed server with its name inlined.
#[derive(Debug, Serialize)]
struct InstalledView<'a> {
    name: &'a str,
    #[serde(flatten)]
    config: &'a InstalledServerConfig,
}

/// Convert a failure into the reported-failure payload.
pub fn failure_payload(err: &ScoutError) -> Value {
    warn!(error = %err, "operation failed");
    let mut payload = json!({
        "success": false,
        "error": err.to_string(),
    });
    if let ScoutError::ServerNotFound { available, .. } = err {
        payload["available_servers"] = json!(available);
    }
    payload
}

fn respond(result: Result<Value>) -> Value {
    result.unwrap_or_else(|err| failure_payload(&err))
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|err| ScoutError::InvalidArguments(err.to_string()))
}

/// Implements every operation over a registry source and a config store.
#[derive(Debug)]
pub struct ScoutService {
    fetcher: DocumentFetcher,
    github: GitHubClient,
    store: ConfigStore,
}

impl ScoutService {
    pub fn new(fetcher: DocumentFetcher, github: GitHubClient, store: ConfigStore) -> Self {
        Self {
            fetcher,
            github,
            store,
        }
    }

    /// Build the service from settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = build_http_client(settings.fetch_timeout())?;
        let fetcher = DocumentFetcher::new(client.clone(), settings.registry_url.clone());
        let github = GitHubClient::new(
            client,
            settings.github_api_base.clone(),
            settings.github_raw_base.clone(),
        );
        let store = ConfigStore::new(settings.resolved_config_path()?);
        Ok(Self::new(fetcher, github, store))
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Run an operation by name with JSON arguments.
    ///
    /// Unknown names are the only error; everything else, including
    /// malformed arguments, is reported in the payload.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value> {
        let operation: Operation = name.parse()?;
        debug!(operation = operation.name(), "dispatching");

        let payload = match operation {
            Operation::Search => match parse_args(args) {
                Ok(args) => self.search(args).await,
                Err(err) => failure_payload(&err),
            },
            Operation::List => match parse_args(args) {
                Ok(args) => self.list(args).await,
                Err(err) => failure_payload(&err),
            },
            Operation::Install => respond(parse_args(args).map(|args| self.install(args))),
            Operation::Uninstall => respond(parse_args(args).map(|args| self.uninstall(args))),
            Operation::ListInstalled => self.list_installed(),
            Operation::UpdateConfig => {
                respond(parse_args(args).map(|args| self.update_config(args)))
            }
            Operation::GetDetails => match parse_args(args) {
                Ok(args) => self.get_details(args).await,
                Err(err) => failure_payload(&err),
            },
            Operation::Backup => self.backup(),
        };
        Ok(payload)
    }

    /// Search registry entries by name or description.
    pub async fn search(&self, args: SearchArgs) -> Value {
        respond(self.try_search(args).await)
    }

    async fn try_search(&self, args: SearchArgs) -> Result<Value> {
        let category = CategoryFilter::from(args.category.as_deref());
        let entries = self.fetcher.fetch_entries().await?;
        let in_category = query::filter_by_category(&entries, &category);
        let results = query::search(in_category, &args.query, args.limit);

        Ok(json!({
            "success": true,
            "query": args.query,
            "category": category.as_str(),
            "total_found": results.len(),
            "results": results.into_iter().map(EntryView::new).collect::<Vec<_>>(),
        }))
    }

    /// List registry entries a page at a time.
    pub async fn list(&self, args: ListArgs) -> Value {
        respond(self.try_list(args).await)
    }

    async fn try_list(&self, args: ListArgs) -> Result<Value> {
        let category = CategoryFilter::from(args.category.as_deref());
        let entries = self.fetcher.fetch_entries().await?;
        let in_category = query::filter_by_category(&entries, &category);
        let page = query::paginate(&in_category, args.offset, args.limit);

        Ok(json!({
            "success": true,
            "category": category.as_str(),
            "total": page.total,
            "offset": page.offset,
            "limit": page.limit,
            "has_more": page.has_more,
            "servers": page.items.iter().map(|entry| EntryView::new(entry)).collect::<Vec<_>>(),
        }))
    }

    /// Add a server to the config.
    pub fn install(&self, args: InstallArgs) -> Value {
        respond(self.try_install(args))
    }

    fn try_install(&self, args: InstallArgs) -> Result<Value> {
        let (key, entry) = self.store.transact(|config| {
            config.install(
                &args.server_name,
                &args.github_url,
                args.config_name.as_deref(),
            )
        })?;

        Ok(json!({
            "success": true,
            "message": format!("Installed '{}' from {}", key, args.github_url),
            "server_name": key,
            "config": entry,
            "config_path": self.store.config_path().display().to_string(),
        }))
    }

    /// Remove a server from the config.
    pub fn uninstall(&self, args: UninstallArgs) -> Value {
        respond(self.try_uninstall(args))
    }

    fn try_uninstall(&self, args: UninstallArgs) -> Result<Value> {
        let removed = self
            .store
            .transact_existing(|config| config.uninstall(&args.server_name))?;

        Ok(json!({
            "success": true,
            "message": format!("Uninstalled '{}'", args.server_name),
            "server_name": args.server_name,
            "removed_config": removed.config,
            "pruned_rules": removed.pruned_rules,
        }))
    }

    /// Report every installed server.
    pub fn list_installed(&self) -> Value {
        respond(self.try_list_installed())
    }

    fn try_list_installed(&self) -> Result<Value> {
        let config = self.store.load_existing()?;
        let servers: Vec<InstalledView<'_>> = config
            .servers
            .iter()
            .map(|(name, config)| InstalledView { name, config })
            .collect();

        Ok(json!({
            "success": true,
            "config_path": self.store.config_path().display().to_string(),
            "total": servers.len(),
            "servers": servers,
            "always_allow": config.always_allow,
        }))
    }

    /// Replace an installed server's args and/or tools.
    pub fn update_config(&self, args: UpdateConfigArgs) -> Value {
        respond(self.try_update_config(args))
    }

    fn try_update_config(&self, args: UpdateConfigArgs) -> Result<Value> {
        let UpdateConfigArgs {
            server_name,
            new_args,
            new_tools,
        } = args;
        let updated = self
            .store
            .transact_existing(|config| config.update(&server_name, new_args, new_tools))?;

        Ok(json!({
            "success": true,
            "server_name": server_name,
            "old_config": updated.old,
            "new_config": updated.new,
        }))
    }

    /// Repository metadata and README preview for a GitHub-hosted server.
    pub async fn get_details(&self, args: GetDetailsArgs) -> Value {
        respond(self.try_get_details(args).await)
    }

    async fn try_get_details(&self, args: GetDetailsArgs) -> Result<Value> {
        let repo = GitHubRepo::parse(&args.github_url)?;
        let repository = self.github.repository(&repo).await?;

        let readme_preview = match self.github.readme_preview(&repo).await {
            Ok(preview) => Some(preview),
            Err(err) => {
                warn!(repo = %repo.slug(), error = %err, "README unavailable");
                None
            }
        };

        Ok(json!({
            "success": true,
            "repository": repository,
            "readme_preview": readme_preview,
            "installation": InstallHint::for_link(&args.github_url, &repo.repo),
        }))
    }

    /// Copy the config file to a timestamped sibling.
    pub fn backup(&self) -> Value {
        respond(self.try_backup())
    }

    fn try_backup(&self) -> Result<Value> {
        let backup_path = self.store.backup()?;

        Ok(json!({
            "success": true,
            "message": "Config backed up",
            "config_path": self.store.config_path().display().to_string(),
            "backup_path": backup_path.display().to_string(),
        }))
    }
}
