// Frontmatter handling for documentation pages.
// A deliberately small subset of YAML: `key: value` lines and inline `[a, b]` lists.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, StarboardError};

const DELIMITER: &str = "---";

/// Maturity badge shown next to a page title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stability {
    Stable,
    InDev,
    #[default]
    Experimental,
}

impl Stability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stability::Stable => "stable",
            Stability::InDev => "in-dev",
            Stability::Experimental => "experimental",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stability {
    type Err = StarboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "stable" => Ok(Stability::Stable),
            "in-dev" => Ok(Stability::InDev),
            "experimental" => Ok(Stability::Experimental),
            other => Err(StarboardError::InvalidDocument(format!(
                "unknown stability '{}'",
                other
            ))),
        }
    }
}

/// Metadata block at the top of a documentation page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DocMetadata {
    pub title: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub stability: Stability,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Scalar(String),
    List(Vec<String>),
}

/// Split a document into its frontmatter and body.
///
/// The document must open with a `---` line and contain a closing `---` line.
/// CRLF line endings are normalized first.
pub fn split_document(text: &str) -> Result<(String, String)> {
    let normalized = text.replace("\r\n", "\n");

    let after_open = normalized
        .strip_prefix(DELIMITER)
        .ok_or_else(|| invalid("missing opening '---'"))?;
    let (open_tail, rest) = after_open
        .split_once('\n')
        .ok_or_else(|| invalid("missing frontmatter"))?;
    if !open_tail.trim().is_empty() {
        return Err(invalid("opening '---' must be on its own line"));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let frontmatter = rest[..offset].trim_end_matches('\n').to_string();
            let body = rest[offset + line.len()..].to_string();
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }

    Err(invalid("missing closing '---'"))
}

/// Parse frontmatter lines into page metadata.
///
/// Lines split at the first colon, so values may contain colons (URLs). Lines without
/// a colon or with an empty key are ignored. Unknown keys are ignored. An unknown
/// stability falls back to experimental.
pub fn parse_metadata(frontmatter: &str) -> DocMetadata {
    let fields = parse_fields(frontmatter);

    let scalar = |key: &str| match fields.get(key) {
        Some(Value::Scalar(s)) => Some(s.clone()),
        _ => None,
    };

    DocMetadata {
        title: scalar("title").unwrap_or_default(),
        image: scalar("image"),
        tags: match fields.get("tags") {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        },
        stability: scalar("stability")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        excerpt: scalar("excerpt").unwrap_or_default(),
    }
}

fn parse_fields(frontmatter: &str) -> HashMap<String, Value> {
    let mut fields = HashMap::new();

    for line in frontmatter.trim().lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        match parse_value(value.trim()) {
            Some(value) => {
                fields.insert(key.to_string(), value);
            }
            None => {
                fields.remove(key);
            }
        }
    }

    fields
}

fn parse_value(value: &str) -> Option<Value> {
    if value.is_empty() {
        return None;
    }
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return Some(Value::List(items));
    }
    Some(Value::Scalar(value.to_string()))
}

fn invalid(reason: &str) -> StarboardError {
    StarboardError::InvalidDocument(reason.to_string())
}
