//! Fetch the registry document over HTTP.

use std::time::Duration;

use tracing::debug;

use crate::error::{Result, ScoutError};

use super::entry::Entry;
use super::parser::RegistryParser;

pub(crate) const USER_AGENT: &str = concat!("scout/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client with a bounded request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(ScoutError::HttpClient)
}

/// GET `url` and return the body as text. Non-success statuses are errors.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScoutError::Fetch {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(ScoutError::HttpStatus {
            status: response.status(),
            url: url.to_string(),
        });
    }

    response.text().await.map_err(|source| ScoutError::Fetch {
        url: url.to_string(),
        source,
    })
}

/// Retrieves and parses the remote registry document.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
    url: String,
}

impl DocumentFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw document text.
    pub async fn fetch(&self) -> Result<String> {
        let document = get_text(&self.client, &self.url).await?;
        debug!(url = %self.url, bytes = document.len(), "fetched registry document");
        Ok(document)
    }

    /// Fetch the document and parse it into entries.
    pub async fn fetch_entries(&self) -> Result<Vec<Entry>> {
        let document = self.fetch().await?;
        Ok(RegistryParser::parse(&document))
    }
}
