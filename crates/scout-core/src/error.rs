//! Error types shared by every scout operation.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Invalid GitHub URL '{0}': expected https://github.com/<owner>/<repo>")]
    InvalidGithubUrl(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to read config file {}: {message}", .path.display())]
    ConfigRead { path: PathBuf, message: String },

    #[error("Failed to write config file {}: {message}", .path.display())]
    ConfigWrite { path: PathBuf, message: String },

    #[error("Server '{name}' not found in config")]
    ServerNotFound { name: String, available: Vec<String> },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ScoutError {
    pub(crate) fn config_read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ScoutError::ConfigRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn config_write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ScoutError::ConfigWrite {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
