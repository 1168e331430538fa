//! GitHub repository references and metadata lookups
//!
//! Registry entries and install requests point at GitHub repositories. This
//! module parses those URLs into owner/repo pairs and fetches the repository
//! metadata and README shown by `get_details`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Result, ScoutError};

use super::fetcher::get_text;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

/// Maximum README preview length in characters.
pub const README_PREVIEW_CHARS: usize = 5000;
pub const TRUNCATION_MARKER: &str = "\n\n... (truncated)";

/// An owner/repo pair, plus the path inside the repository when the URL
/// points into a tree (`/tree/<ref>/<path>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
    pub subpath: Option<String>,
}

impl GitHubRepo {
    /// Parse a GitHub URL.
    ///
    /// Accepts `https://github.com/<owner>/<repo>[/tree/<ref>/<path>]` and the
    /// shorthand `github:<owner>/<repo>[@ref]`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || ScoutError::InvalidGithubUrl(input.to_string());

        if let Some(path) = trimmed.strip_prefix("github:") {
            let repo_part = path.split('@').next().unwrap_or_default();
            let parts: Vec<&str> = repo_part.split('/').collect();
            if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
                return Err(invalid());
            }
            return Ok(Self {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
                subpath: None,
            });
        }

        let url = Url::parse(trimmed).map_err(|_| invalid())?;
        if !matches!(url.host_str(), Some("github.com") | Some("www.github.com")) {
            return Err(invalid());
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        if segments.len() < 2 {
            return Err(invalid());
        }

        let repo = segments[1].trim_end_matches(".git");
        if repo.is_empty() {
            return Err(invalid());
        }

        let subpath = match segments.get(2) {
            Some(&"tree") | Some(&"blob") if segments.len() > 4 => Some(segments[4..].join("/")),
            _ => None,
        };

        Ok(Self {
            owner: segments[0].to_string(),
            repo: repo.to_string(),
            subpath,
        })
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Last component of the in-repository path, if any.
    pub fn subpath_leaf(&self) -> Option<&str> {
        self.subpath
            .as_deref()
            .and_then(|path| path.rsplit('/').find(|s| !s.is_empty()))
    }

    pub fn api_url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    pub fn readme_url(&self, raw_base: &str) -> String {
        format!(
            "{}/{}/{}/HEAD/README.md",
            raw_base.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

/// Repository metadata as returned by the GitHub REST API.
#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    license: Option<ApiLicense>,
    #[serde(default)]
    topics: Vec<String>,
    language: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    pushed_at: Option<DateTime<Utc>>,
    default_branch: Option<String>,
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiLicense {
    spdx_id: Option<String>,
    name: Option<String>,
}

/// Repository summary reported by `get_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDetails {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub license: Option<String>,
    pub topics: Vec<String>,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub default_branch: Option<String>,
    pub homepage: Option<String>,
}

impl From<ApiRepository> for RepositoryDetails {
    fn from(api: ApiRepository) -> Self {
        let license = api.license.and_then(|license| {
            license
                .spdx_id
                .filter(|id| id != "NOASSERTION")
                .or(license.name)
        });

        Self {
            name: api.name,
            full_name: api.full_name,
            description: api.description,
            url: api.html_url,
            stars: api.stargazers_count,
            forks: api.forks_count,
            open_issues: api.open_issues_count,
            license,
            topics: api.topics,
            language: api.language,
            created_at: api.created_at,
            updated_at: api.updated_at,
            pushed_at: api.pushed_at,
            default_branch: api.default_branch,
            homepage: api.homepage.filter(|h| !h.is_empty()),
        }
    }
}

/// Cut `text` to `max_chars` characters, appending the truncation marker
/// when anything was dropped.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Client for the GitHub REST API and raw README content.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
}

impl GitHubClient {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            raw_base: raw_base.into(),
        }
    }

    /// Fetch repository metadata.
    pub async fn repository(&self, repo: &GitHubRepo) -> Result<RepositoryDetails> {
        let url = repo.api_url(&self.api_base);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| ScoutError::Fetch {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(ScoutError::HttpStatus {
                status: response.status(),
                url,
            });
        }

        let api: ApiRepository = response
            .json()
            .await
            .map_err(|source| ScoutError::Fetch { url, source })?;
        debug!(repo = %api.full_name, "fetched repository metadata");

        Ok(api.into())
    }

    /// Fetch the README and cut it down to the preview length.
    pub async fn readme_preview(&self, repo: &GitHubRepo) -> Result<String> {
        let url = repo.readme_url(&self.raw_base);
        let readme = get_text(&self.client, &url).await?;
        Ok(truncate_preview(&readme, README_PREVIEW_CHARS))
    }
}
