//! Page-tagged documents.
//!
//! Text extraction (PDF and friends) happens outside this crate. What arrives
//! here is plain text, optionally split into pages with form feeds the way
//! `pdftotext` emits them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Page separator used by text extractors.
pub const PAGE_BREAK: char = '\u{0c}';

/// A single page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,

    /// Page text.
    pub text: String,
}

/// A document as an ordered list of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Where the document came from, if known.
    pub source: Option<String>,

    /// Pages in reading order.
    pub pages: Vec<Page>,
}

impl Document {
    /// A single-page document.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_pages([text.into()])
    }

    /// Number pages from 1 in iteration order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = pages
            .into_iter()
            .zip(1u32..)
            .map(|(text, number)| Page {
                number,
                text: text.into(),
            })
            .collect();

        Self {
            source: None,
            pages,
        }
    }

    /// Split extracted text on form feeds.
    ///
    /// A trailing form feed does not produce an extra empty page.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
        Self::from_pages(text.split(PAGE_BREAK))
    }

    /// Read a UTF-8 text file and split it into pages.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::parse(&content).with_source(path.to_string_lossy());
        debug!(
            "Loaded {} pages from {}",
            document.pages.len(),
            path.display()
        );
        Ok(document)
    }

    /// Record where the document came from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Total characters across all pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}
