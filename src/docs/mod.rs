// Documentation pages: frontmatter metadata plus the Markdown/MDX body.
// Rendering the body is left to whatever displays it.

use std::fs;
use std::path::Path;

use crate::error::Result;

pub mod frontmatter;

pub use frontmatter::{DocMetadata, Stability, parse_metadata, split_document};

/// A parsed documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub metadata: DocMetadata,
    pub body: String,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self> {
        let (frontmatter, body) = split_document(text)?;
        Ok(Self {
            metadata: parse_metadata(&frontmatter),
            body,
        })
    }

    /// Read and parse a page from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}
