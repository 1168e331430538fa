//! Launch command derivation for GitHub-hosted servers.
//!
//! Most servers are published to npm under the repository name, so the
//! default plan runs `npx -y <repo>@latest`. A handful of well-known
//! repositories publish under a different package or ship a container and
//! get their own plan.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::github::GitHubRepo;

/// How a plan launches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Launcher {
    Npm,
    Docker,
}

/// Command, arguments and environment needed to run a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub launcher: Launcher,
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl InstallPlan {
    /// Derive the plan for a repository.
    ///
    /// `server_name` names the package inside monorepos when the URL does not
    /// point at a subdirectory.
    pub fn for_repo(repo: &GitHubRepo, server_name: &str) -> Self {
        let owner = repo.owner.to_lowercase();
        let name = repo.repo.to_lowercase();

        match (owner.as_str(), name.as_str()) {
            ("modelcontextprotocol", "servers") => {
                let package = repo.subpath_leaf().unwrap_or(server_name);
                Self::npx(vec![
                    "-y".to_string(),
                    format!("@modelcontextprotocol/server-{}", package),
                ])
            }
            ("microsoft", "playwright-mcp") => Self::npx(vec![
                "-y".to_string(),
                "@playwright/mcp@latest".to_string(),
            ]),
            ("executeautomation", "mcp-playwright") => Self::npx(vec![
                "-y".to_string(),
                "@executeautomation/playwright-mcp-server".to_string(),
            ]),
            ("github", "github-mcp-server") => Self {
                launcher: Launcher::Docker,
                command: "docker".to_string(),
                args: [
                    "run",
                    "-i",
                    "--rm",
                    "-e",
                    "GITHUB_PERSONAL_ACCESS_TOKEN",
                    "ghcr.io/github/github-mcp-server",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                env: BTreeMap::from([(
                    "GITHUB_PERSONAL_ACCESS_TOKEN".to_string(),
                    String::new(),
                )]),
            },
            _ => Self::npx(vec!["-y".to_string(), format!("{}@latest", repo.repo)]),
        }
    }

    fn npx(args: Vec<String>) -> Self {
        Self {
            launcher: Launcher::Npm,
            command: "npx".to_string(),
            args,
            env: BTreeMap::new(),
        }
    }

    /// The full command line, space separated.
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Installation hint attached to search and list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InstallHint {
    Npm { command: String, github: String },
    Docker { command: String, github: String },
    Manual { url: String },
}

impl InstallHint {
    pub fn for_link(link: &str, name: &str) -> Self {
        match GitHubRepo::parse(link) {
            Ok(repo) => {
                let plan = InstallPlan::for_repo(&repo, name);
                let command = plan.command_line();
                let github = repo.slug();
                match plan.launcher {
                    Launcher::Npm => InstallHint::Npm { command, github },
                    Launcher::Docker => InstallHint::Docker { command, github },
                }
            }
            Err(_) => InstallHint::Manual {
                url: link.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(url: &str) -> GitHubRepo {
        GitHubRepo::parse(url).unwrap()
    }

    #[test]
    fn test_default_plan_uses_repo_name() {
        let plan = InstallPlan::for_repo(&repo("https://github.com/acme/demo"), "ignored");
        assert_eq!(plan.command, "npx");
        assert_eq!(plan.args, vec!["-y", "demo@latest"]);
        assert_eq!(plan.command_line(), "npx -y demo@latest");
        assert!(plan.env.is_empty());
    }

    #[test]
    fn test_reference_monorepo_uses_subdirectory() {
        let plan = InstallPlan::for_repo(
            &repo("https://github.com/modelcontextprotocol/servers/tree/main/src/filesystem"),
            "files",
        );
        assert_eq!(plan.args, vec!["-y", "@modelcontextprotocol/server-filesystem"]);
    }

    #[test]
    fn test_reference_monorepo_falls_back_to_server_name() {
        let plan = InstallPlan::for_repo(
            &repo("https://github.com/ModelContextProtocol/servers"),
            "memory",
        );
        assert_eq!(plan.args, vec!["-y", "@modelcontextprotocol/server-memory"]);
    }

    #[test]
    fn test_docker_plan_carries_env() {
        let plan = InstallPlan::for_repo(&repo("https://github.com/github/github-mcp-server"), "gh");
        assert_eq!(plan.launcher, Launcher::Docker);
        assert_eq!(plan.command, "docker");
        assert!(plan.env.contains_key("GITHUB_PERSONAL_ACCESS_TOKEN"));
    }

    #[test]
    fn test_hint_for_github_link() {
        let hint = InstallHint::for_link("https://github.com/acme/demo", "demo");
        let value = serde_json::to_value(&hint).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "npm",
                "command": "npx -y demo@latest",
                "github": "acme/demo"
            })
        );
    }

    #[test]
    fn test_hint_for_other_link() {
        let hint = InstallHint::for_link("https://acme.dev/mcp", "acme");
        assert_eq!(
            hint,
            InstallHint::Manual {
                url: "https://acme.dev/mcp".to_string()
            }
        );
    }
}
