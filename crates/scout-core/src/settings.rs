//! Tool settings loaded from scout.toml
//!
//! Every field is optional in the file:
//!
//! ```toml
//! registry_url = "https://raw.githubusercontent.com/modelcontextprotocol/servers/main/README.md"
//! config_path = "/home/me/.config/scout/mcp_settings.json"
//! fetch_timeout_secs = 30
//! github_api_base = "https://api.github.com"
//! github_raw_base = "https://raw.githubusercontent.com"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::registry::github::{DEFAULT_API_BASE, DEFAULT_RAW_BASE};

pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/modelcontextprotocol/servers/main/README.md";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const SETTINGS_FILE_NAME: &str = "scout.toml";
pub const CONFIG_FILE_NAME: &str = "mcp_settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Markdown document listing the servers
    pub registry_url: String,
    /// Installed-server settings file; defaults under the user config dir
    pub config_path: Option<PathBuf>,
    /// Timeout applied to every HTTP request
    pub fetch_timeout_secs: u64,
    pub github_api_base: String,
    pub github_raw_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            config_path: None,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            github_api_base: DEFAULT_API_BASE.to_string(),
            github_raw_base: DEFAULT_RAW_BASE.to_string(),
        }
    }
}

impl Settings {
    /// Default settings file location: `<config dir>/scout/scout.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scout").join(SETTINGS_FILE_NAME))
    }

    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, value) in [
            ("registry_url", &self.registry_url),
            ("github_api_base", &self.github_api_base),
            ("github_raw_base", &self.github_raw_base),
        ] {
            Url::parse(value).with_context(|| format!("Invalid {}: '{}'", field, value))?;
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Installed-server settings file path.
    pub fn resolved_config_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.config_path {
            return Ok(path.clone());
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dir.join("scout").join(CONFIG_FILE_NAME))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
