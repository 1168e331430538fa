//! Registry document parser
//!
//! Extracts server entries from the registry README. The document lists
//! servers as markdown bullets under an "official" heading and a "community"
//! heading:
//!
//! ```text
//! ### Official Integrations
//! - <img src="logo.png" /> **[Acme](https://github.com/acme/acme-mcp)** - Acme API access
//! ### Community Servers
//! - **[demo](https://github.com/someone/demo)** - a sample server
//! ## Resources
//! ```
//!
//! The upstream format drifts over time, so every pattern lives in
//! [`patterns`] and can be adjusted and tested on its own.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::entry::{Category, Entry};

/// Description used when a bullet has no description clause.
pub const MISSING_DESCRIPTION: &str = "No description available";

/// Raw regex sources for the document structure.
pub mod patterns {
    /// Heading that opens the official section. Group 1 is the `#` run.
    pub const OFFICIAL_HEADING: &str = r"(?im)^(#{1,6})[ \t]+[^\n]*\bofficial\b[^\n]*$";

    /// Heading that opens the community section. Group 1 is the `#` run.
    pub const COMMUNITY_HEADING: &str = r"(?im)^(#{1,6})[ \t]+[^\n]*\bcommunity\b[^\n]*$";

    /// Top-level heading that closes the community section.
    pub const RESOURCES_HEADING: &str = r"(?im)^#{1,2}[ \t]+[^\n]*\bresources\b[^\n]*$";

    /// Any markdown heading. Group 1 is the `#` run.
    pub const ANY_HEADING: &str = r"(?m)^(#{1,6})[ \t]+";

    /// Inline image, either an HTML `<img>` tag or markdown `![alt](src)`.
    pub const INLINE_IMAGE: &str = r"<img[^>]*>|!\[[^\]]*\]\([^)]*\)";

    /// One entry bullet:
    /// bullet, optional emphasis, optional images, optional emphasis,
    /// `[label](url "title")`, optional closing emphasis, then an optional
    /// dash-separated description.
    pub const ENTRY_LINE: &str = concat!(
        r"^[ \t]*[-*•][ \t]+",
        r"(?:(?:\*\*|__)[ \t]*)?",
        r"(?:(?:<img[^>]*>|!\[[^\]]*\]\([^)]*\))[ \t]*)*",
        r"(?:(?:\*\*|__)[ \t]*)?",
        r"\[(?P<label>(?:!\[[^\]]*\]\([^)]*\)|[^\]])+)\]",
        r#"\((?P<url>[^)\s]+)(?:[ \t]+"[^"]*")?\)"#,
        r"(?:\*\*|__)?",
        r"(?:[ \t]*[-–—][ \t]*(?P<description>.*))?",
    );
}

static OFFICIAL_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::OFFICIAL_HEADING).expect("official heading pattern"));
static COMMUNITY_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::COMMUNITY_HEADING).expect("community heading pattern"));
static RESOURCES_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::RESOURCES_HEADING).expect("resources heading pattern"));
static ANY_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::ANY_HEADING).expect("heading pattern"));
static INLINE_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::INLINE_IMAGE).expect("inline image pattern"));
static ENTRY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::ENTRY_LINE).expect("entry line pattern"));

/// Parses registry documents into entries.
pub struct RegistryParser;

impl RegistryParser {
    /// Parse every entry in the document.
    ///
    /// Official entries come first, then community entries, each in document
    /// order. A missing section contributes nothing.
    pub fn parse(document: &str) -> Vec<Entry> {
        let mut entries = Vec::new();

        match Self::official_section(document) {
            Some(section) => entries.extend(Self::parse_section(section, Category::Official)),
            None => debug!("official section heading not found"),
        }
        let official = entries.len();

        match Self::community_section(document) {
            Some(section) => entries.extend(Self::parse_section(section, Category::Community)),
            None => debug!("community section heading not found"),
        }

        debug!(
            official,
            community = entries.len() - official,
            "parsed registry document"
        );
        entries
    }

    /// Text between the official heading and the next heading of equal or
    /// higher level.
    pub fn official_section(document: &str) -> Option<&str> {
        let heading = OFFICIAL_HEADING_RE.captures(document)?;
        let level = heading[1].len();
        let rest = &document[heading.get(0)?.end()..];

        let end = ANY_HEADING_RE
            .captures_iter(rest)
            .filter(|caps| caps[1].len() <= level)
            .find_map(|caps| caps.get(0).map(|m| m.start()))
            .unwrap_or(rest.len());

        Some(&rest[..end])
    }

    /// Text between the community heading and the next top-level "Resources"
    /// heading, or the end of the document.
    pub fn community_section(document: &str) -> Option<&str> {
        let heading = COMMUNITY_HEADING_RE.find(document)?;
        let rest = &document[heading.end()..];

        let end = RESOURCES_HEADING_RE
            .find(rest)
            .map(|m| m.start())
            .unwrap_or(rest.len());

        Some(&rest[..end])
    }

    /// Parse every matching bullet line of a section.
    pub fn parse_section(section: &str, category: Category) -> Vec<Entry> {
        section
            .lines()
            .filter_map(|line| Self::parse_line(line, category))
            .collect()
    }

    /// Parse a single bullet line. Returns `None` for anything that is not an
    /// entry bullet.
    pub fn parse_line(line: &str, category: Category) -> Option<Entry> {
        let caps = ENTRY_LINE_RE.captures(line.trim_end())?;

        let label = caps.name("label")?.as_str();
        let name = INLINE_IMAGE_RE.replace_all(label, "").trim().to_string();
        if name.is_empty() {
            return None;
        }

        let link = caps.name("url")?.as_str().trim().to_string();

        let description = caps
            .name("description")
            .map(|m| m.as_str().trim())
            .filter(|d| !d.is_empty())
            .unwrap_or(MISSING_DESCRIPTION)
            .to_string();

        Some(Entry {
            name,
            link,
            description,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "\
# Model Context Protocol servers

## Reference Servers
- **[Everything](src/everything)** - Reference / test server

### 🎖️ Official Integrations

- <img height=\"12\" width=\"12\" src=\"https://acme.dev/favicon.ico\" alt=\"Acme\" /> **[Acme](https://github.com/acme/acme-mcp)** - Query Acme data
- **[demo](https://github.com/acme/demo)** - a sample server
• **[Bullet](https://github.com/acme/bullet)** – uses a glyph bullet

### 🌎 Community Servers

- **[Playwright](https://github.com/executeautomation/mcp-playwright)** — Browser automation
- [bare](https://github.com/someone/bare)
Some paragraph text that is not an entry.
- **[Postgres](https://github.com/someone/pg-mcp)** - PostgreSQL access

## 📚 Resources

- **[Awesome list](https://github.com/someone/awesome)** - Not a server
";

    #[test]
    fn test_parse_full_document() {
        let entries = RegistryParser::parse(DOCUMENT);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["Acme", "demo", "Bullet", "Playwright", "bare", "Postgres"]
        );
        assert!(entries[..3].iter().all(|e| e.category == Category::Official));
        assert!(entries[3..].iter().all(|e| e.category == Category::Community));
    }

    #[test]
    fn test_official_section_stops_at_same_level_heading() {
        let section = RegistryParser::official_section(DOCUMENT).unwrap();
        assert!(section.contains("Acme"));
        assert!(!section.contains("Playwright"));
    }

    #[test]
    fn test_community_section_stops_at_resources() {
        let section = RegistryParser::community_section(DOCUMENT).unwrap();
        assert!(section.contains("Postgres"));
        assert!(!section.contains("Awesome list"));
    }

    #[test]
    fn test_community_section_runs_to_end_without_resources() {
        let doc = "## Community\n- [a](https://x/a) - one\n## Frameworks\n- [b](https://x/b) - two\n";
        let entries = RegistryParser::parse(doc);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_no_headings_yields_nothing() {
        let doc = "# Title\n- **[demo](https://github.com/acme/demo)** - a sample server\n";
        assert!(RegistryParser::parse(doc).is_empty());
        assert!(RegistryParser::parse("").is_empty());
    }

    #[test]
    fn test_parse_line_with_html_image() {
        let line = "- <img height=\"12\" src=\"logo.png\" /> **[Acme](https://github.com/acme/acme-mcp)** - Query Acme data";
        let entry = RegistryParser::parse_line(line, Category::Official).unwrap();
        assert_eq!(entry.name, "Acme");
        assert_eq!(entry.link, "https://github.com/acme/acme-mcp");
        assert_eq!(entry.description, "Query Acme data");
    }

    #[test]
    fn test_parse_line_with_image_inside_label() {
        let line = "- [![icon](https://img.example/x.png) Widget](https://github.com/acme/widget) - Widgets";
        let entry = RegistryParser::parse_line(line, Category::Community).unwrap();
        assert_eq!(entry.name, "Widget");
        assert_eq!(entry.link, "https://github.com/acme/widget");
    }

    #[test]
    fn test_parse_line_with_html_image_inside_label() {
        let line = "- **[<img src=\"logo.svg\" width=\"12\"/> Gadget](https://github.com/acme/gadget)** - Gadgets";
        let entry = RegistryParser::parse_line(line, Category::Community).unwrap();
        assert_eq!(entry.name, "Gadget");
    }

    #[test]
    fn test_parse_line_without_description() {
        let entry =
            RegistryParser::parse_line("- [bare](https://github.com/someone/bare)", Category::Community)
                .unwrap();
        assert_eq!(entry.description, MISSING_DESCRIPTION);

        let entry = RegistryParser::parse_line(
            "- **[bare](https://github.com/someone/bare)** -   ",
            Category::Community,
        )
        .unwrap();
        assert_eq!(entry.description, MISSING_DESCRIPTION);
    }

    #[test]
    fn test_parse_line_dash_variants() {
        for sep in ["-", "–", "—"] {
            let line = format!("- **[x](https://github.com/a/x)** {sep} described");
            let entry = RegistryParser::parse_line(&line, Category::Official).unwrap();
            assert_eq!(entry.description, "described");
        }
    }

    #[test]
    fn test_parse_line_with_link_title_and_crlf() {
        let line = "* [titled](https://github.com/a/titled \"Title\") - with title\r";
        let entry = RegistryParser::parse_line(line, Category::Official).unwrap();
        assert_eq!(entry.link, "https://github.com/a/titled");
        assert_eq!(entry.description, "with title");
    }

    #[test]
    fn test_parse_line_rejects_non_bullets() {
        assert!(RegistryParser::parse_line("Plain text", Category::Official).is_none());
        assert!(RegistryParser::parse_line("[demo](https://x)", Category::Official).is_none());
        assert!(RegistryParser::parse_line("- just a bullet", Category::Official).is_none());
        assert!(
            RegistryParser::parse_line("- [![badge](https://b/x.svg)](https://x)", Category::Official)
                .is_none()
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let doc = "## Official\n- [dup](https://x/1) - first\n- [dup](https://x/2) - second\n";
        let entries = RegistryParser::parse(doc);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "first");
        assert_eq!(entries[1].description, "second");
    }

    #[test]
    fn test_patterns_compile() {
        for pattern in [
            patterns::OFFICIAL_HEADING,
            patterns::COMMUNITY_HEADING,
            patterns::RESOURCES_HEADING,
            patterns::ANY_HEADING,
            patterns::INLINE_IMAGE,
            patterns::ENTRY_LINE,
        ] {
            assert!(Regex::new(pattern).is_ok(), "pattern failed: {pattern}");
        }
    }

    #[test]
    fn test_resources_heading_requires_top_level() {
        let re = Regex::new(patterns::RESOURCES_HEADING).unwrap();
        assert!(re.is_match("## 📚 Resources"));
        assert!(!re.is_match("### Resources for testing"));
    }
}
