//! Registry entry types produced by the parser.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Section of the registry document an entry was listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Official,
    Community,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Official => "official",
            Category::Community => "community",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter accepted by the search and list operations.
///
/// `all` keeps everything. Any other value keeps only entries whose category
/// name equals it exactly, so an unrecognized value selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
    Unmatched(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
            CategoryFilter::Unmatched(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
            CategoryFilter::Unmatched(value) => value,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        match value {
            "all" => CategoryFilter::All,
            "official" => CategoryFilter::Only(Category::Official),
            "community" => CategoryFilter::Only(Category::Community),
            other => CategoryFilter::Unmatched(other.to_string()),
        }
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(value: Option<&str>) -> Self {
        value.map(CategoryFilter::from).unwrap_or_default()
    }
}

/// One server listing parsed from the registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "url")]
    pub link: String,
    pub description: String,
    pub category: Category,
}

impl Entry {
    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
