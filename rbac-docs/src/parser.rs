//! # Doc-comment parser
//!
//! Converts a raw documentation block into a [`DocInfo`] tag map.
//!
//! ```text
//! /**
//!  * Fetch a user by id          <- description
//!  *
//!  * Only admins see e-mail.     <- long_description
//!  *
//!  * @func Get User              <- func
//!  * @param int $id              <- param
//!  */
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag holding the short human-readable name of a handler.
pub const FUNC_TAG: &str = "func";

/// Tag holding the summary of a handler.
pub const DESCRIPTION_TAG: &str = "description";

/// Tag holding untagged text that follows the summary paragraph.
pub const LONG_DESCRIPTION_TAG: &str = "long_description";

/// Tag values extracted from one documentation block.
///
/// Lookups never fail: a missing tag reads as the empty string through
/// [`DocInfo::value`].
///
/// # Example
///
/// ```
/// use rbac_docs::DocParser;
///
/// let info = DocParser::new().parse("/**\n * Fetch a user by id\n * @func Get User\n */");
/// assert_eq!(info.func(), "Get User");
/// assert_eq!(info.description(), "Fetch a user by id");
/// assert_eq!(info.value("return"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocInfo {
    tags: BTreeMap<String, String>,
}

impl DocInfo {
    /// Create an empty tag map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a tag value if the block defined it.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    /// Get a tag value, defaulting to the empty string.
    pub fn value(&self, tag: &str) -> &str {
        self.get(tag).unwrap_or("")
    }

    /// The `@func` tag.
    pub fn func(&self) -> &str {
        self.value(FUNC_TAG)
    }

    /// The summary paragraph or explicit `@description` tag.
    pub fn description(&self) -> &str {
        self.value(DESCRIPTION_TAG)
    }

    /// Untagged text after the summary paragraph.
    pub fn long_description(&self) -> &str {
        self.value(LONG_DESCRIPTION_TAG)
    }

    /// Check whether a tag is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if no tag was found.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over tags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set a tag, replacing any previous value.
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(tag.into(), value.into());
    }

    fn append(&mut self, tag: &str, value: &str) {
        self.tags
            .entry(tag.to_string())
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DocInfo {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut info = DocInfo::new();
        for (tag, value) in iter {
            info.insert(tag, value);
        }
        info
    }
}

/// Single-pass scanner for documentation blocks.
///
/// Accepts `/** ... */` blocks, `///` line comments, or bare text. Rules:
/// - `@name value` lines become tags; repeated tags are joined with `\n`
/// - the first untagged paragraph is the `description`
/// - later untagged lines are joined with spaces into `long_description`
/// - an explicit `@description` tag wins over the untagged paragraph
/// - malformed tag lines are skipped
#[derive(Debug, Clone, Copy, Default)]
pub struct DocParser;

impl DocParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a documentation block. Empty input gives an empty [`DocInfo`].
    pub fn parse(&self, doc: &str) -> DocInfo {
        let mut info = DocInfo::new();
        let mut summary: Vec<&str> = Vec::new();
        let mut body: Vec<&str> = Vec::new();
        let mut summary_done = false;

        for line in comment_lines(doc) {
            if line.is_empty() {
                summary_done |= !summary.is_empty();
                continue;
            }

            if let Some(rest) = line.strip_prefix('@') {
                summary_done |= !summary.is_empty();
                match split_tag(rest) {
                    Some((name, value)) => info.append(name, value),
                    None => tracing::debug!(line = %line, "Skipping malformed doc tag"),
                }
                continue;
            }

            if summary_done {
                body.push(line);
            } else {
                summary.push(line);
            }
        }

        if !summary.is_empty() {
            if info.contains(DESCRIPTION_TAG) {
                summary.append(&mut body);
                body = summary;
            } else {
                info.insert(DESCRIPTION_TAG, summary.join("\n"));
            }
        }

        if !body.is_empty() && !info.contains(LONG_DESCRIPTION_TAG) {
            info.insert(LONG_DESCRIPTION_TAG, body.join(" "));
        }

        info
    }

    /// Parse an optional documentation block.
    pub fn parse_opt(&self, doc: Option<&str>) -> DocInfo {
        doc.map(|d| self.parse(d)).unwrap_or_default()
    }
}

/// Strip comment delimiters and return trimmed content lines.
fn comment_lines(doc: &str) -> Vec<&str> {
    let body = doc.trim();
    // `/**/` and `/*/` share their stars between the delimiters.
    let body = match body.strip_prefix("/*") {
        Some("/") => "",
        Some(inner) => {
            let inner = inner.strip_suffix("*/").unwrap_or(inner);
            inner.strip_prefix('*').unwrap_or(inner)
        }
        None => body.strip_suffix("*/").unwrap_or(body),
    };

    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("///")
                .or_else(|| line.strip_prefix("//!"))
                .or_else(|| line.strip_prefix('*'))
                .unwrap_or(line)
                .trim()
        })
        .collect()
}

/// Split `name value text` into its name and trimmed value.
fn split_tag(rest: &str) -> Option<(&str, &str)> {
    let (name, value) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };

    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '\\'));

    valid.then_some((name, value))
}
