#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use wiremock::MockServer;

use scout_core::commands::ScoutService;
use scout_core::config::ConfigStore;
use scout_core::registry::fetcher::build_http_client;
use scout_core::registry::{DocumentFetcher, GitHubClient};

pub const REGISTRY_PATH: &str = "/registry/README.md";

pub const REGISTRY_DOC: &str = r#"# Model Context Protocol servers

## Reference Servers

- **[Filesystem](https://github.com/modelcontextprotocol/servers/tree/main/src/filesystem)** - Secure file operations

### 🎖️ Official Integrations

- <img height="12" width="12" src="https://acme.dev/logo.png" alt="Acme" /> **[Acme](https://github.com/acme/acme-mcp)** - Acme cloud API access
- **[Playwright](https://github.com/microsoft/playwright-mcp)** - Browser automation

### 🌎 Community Servers

- **[demo](https://github.com/acme/demo)** - A demo server for Postgres queries
- **[notes](https://notes.example.com/mcp)** - Hosted note taking

## 📚 Resources

- **[Awesome list](https://github.com/someone/awesome-mcp)** - More servers
"#;

/// Service wired to a mock server for every remote call and to a config
/// file at `config_path`.
pub fn service(server: &MockServer, config_path: &Path) -> ScoutService {
    let client = build_http_client(Duration::from_secs(5)).unwrap();
    let fetcher = DocumentFetcher::new(
        client.clone(),
        format!("{}{}", server.uri(), REGISTRY_PATH),
    );
    let github = GitHubClient::new(client, server.uri(), server.uri());
    ScoutService::new(fetcher, github, ConfigStore::new(config_path))
}

/// Registry document with `count` community entries named `server-NN`.
pub fn community_doc(count: usize) -> String {
    let mut doc = String::from("### Community Servers\n\n");
    for i in 0..count {
        doc.push_str(&format!(
            "- **[server-{i:02}](https://github.com/owner/server-{i:02})** - Server number {i}\n"
        ));
    }
    doc
}
