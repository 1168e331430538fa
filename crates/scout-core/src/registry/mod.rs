//! Remote server registry
//!
//! Fetches the registry document, parses it into entries and queries them.

pub mod entry;
pub mod fetcher;
pub mod github;
pub mod parser;
pub mod query;

pub use entry::{Category, CategoryFilter, Entry};
pub use fetcher::DocumentFetcher;
pub use github::{GitHubClient, GitHubRepo, RepositoryDetails};
pub use parser::RegistryParser;
