//! Overlapping fixed-size chunking.
//!
//! Each page is cut into windows of `chunk_size` characters. A window that
//! does not reach the end of the page is shortened to the last natural
//! boundary inside it (paragraph, line, sentence, word, in that order), and
//! the next window starts `chunk_overlap` characters before the cut. When no
//! boundary is usable the window is cut hard at `chunk_size`.
//!
//! Sizes and offsets are counted in chars, not bytes.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Page};
use crate::error::{IngestError, Result};

/// Boundaries tried, best first.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// A chunk of text extracted from a document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,

    /// Char offset of the first character within the page.
    pub source_offset: usize,

    /// Length of the chunk in chars.
    pub source_length: usize,

    /// Page the chunk was cut from.
    pub page: u32,
}

impl Chunk {
    /// Char offset one past the last character.
    pub fn source_end(&self) -> usize {
        self.source_offset + self.source_length
    }
}

/// Splits documents into overlapping chunks biased towards natural
/// boundaries.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter. Fails unless `0 < chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(IngestError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap == 0 {
            return Err(IngestError::InvalidConfiguration(
                "chunk_overlap must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(IngestError::InvalidConfiguration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Replace the boundary list. An empty list always cuts hard.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        self
    }

    /// Target chunk size in chars.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between consecutive chunks in chars.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Lazily chunk every page of `document`.
    pub fn chunks<'a>(&'a self, document: &'a Document) -> Chunks<'a> {
        Chunks {
            splitter: self,
            pages: document.pages.iter(),
            cursor: None,
        }
    }

    /// Chunk every page of `document`.
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        self.chunks(document).collect()
    }

    /// Chunk a single piece of text as page `page`.
    pub fn split_text(&self, text: &str, page: u32) -> Vec<Chunk> {
        let mut cursor = PageCursor::new(text, page);
        std::iter::from_fn(|| cursor.next_chunk(self)).collect()
    }

    /// Smallest chunk, in chars, that a boundary cut may produce.
    fn min_cut_len(&self) -> usize {
        self.chunk_overlap.max(self.chunk_size / 2)
    }

    /// Pick the end of the chunk starting at `start` whose window ends at
    /// `window_end` (exclusive, strictly inside the page).
    fn cut_point(&self, text: &str, bounds: &[usize], start: usize, window_end: usize) -> usize {
        let base = bounds[start];
        let window = &text[base..bounds[window_end]];

        for separator in &self.separators {
            let Some(pos) = window.rfind(separator.as_str()) else {
                continue;
            };
            let cut_byte = base + pos + separator.len();
            let cut = bounds.partition_point(|&b| b < cut_byte);
            if cut - start > self.min_cut_len() {
                return cut;
            }
        }

        window_end
    }
}

/// Lazy chunk sequence produced by [`RecursiveSplitter::chunks`].
pub struct Chunks<'a> {
    splitter: &'a RecursiveSplitter,
    pages: std::slice::Iter<'a, Page>,
    cursor: Option<PageCursor<'a>>,
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        loop {
            if let Some(chunk) = self
                .cursor
                .as_mut()
                .and_then(|cursor| cursor.next_chunk(self.splitter))
            {
                return Some(chunk);
            }

            let page = self.pages.next()?;
            self.cursor = Some(PageCursor::new(&page.text, page.number));
        }
    }
}

impl FusedIterator for Chunks<'_> {}

/// Position within one page.
struct PageCursor<'a> {
    text: &'a str,
    page: u32,
    /// Byte offset of every char, plus the text length.
    bounds: Vec<usize>,
    start: usize,
    done: bool,
}

impl<'a> PageCursor<'a> {
    fn new(text: &'a str, page: u32) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        Self {
            text,
            page,
            bounds,
            start: 0,
            done: text.is_empty(),
        }
    }

    fn char_len(&self) -> usize {
        self.bounds.len() - 1
    }

    fn next_chunk(&mut self, splitter: &RecursiveSplitter) -> Option<Chunk> {
        if self.done {
            return None;
        }

        let total = self.char_len();
        let window_end = (self.start + splitter.chunk_size).min(total);
        let end = if window_end == total {
            // The rest of the page fits; no overlap-only tail follows.
            self.done = true;
            total
        } else {
            splitter.cut_point(self.text, &self.bounds, self.start, window_end)
        };

        let chunk = Chunk {
            text: self.text[self.bounds[self.start]..self.bounds[end]].to_string(),
            source_offset: self.start,
            source_length: end - self.start,
            page: self.page,
        };

        if !self.done {
            self.start = end - splitter.chunk_overlap;
        }

        Some(chunk)
    }
}
