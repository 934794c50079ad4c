//! Delimiter-based chunking.
//!
//! Splits text on every literal occurrence of a marker string, typically a
//! Markdown heading prefix such as `"## "`. Each chunk after the first keeps
//! the delimiter as a prefix, so a reader can tell which marker opened it:
//!
//! ```text
//! delimiter = "## "
//!
//! Document: "Intro\n## A\ntext1\n## B\ntext2"
//!
//! Chunk 0: "Intro"            <- text before the first marker, verbatim
//! Chunk 1: "## A\ntext1"      <- re-prefixed, surrounding whitespace trimmed
//! Chunk 2: "## B\ntext2"
//! ```
//!
//! Parts that are empty after trimming are dropped. An empty delimiter does
//! not split at all: non-empty text comes back as a single chunk, so no
//! content is silently lost.
//!
//! ## Offsets
//!
//! Chunk text is trimmed and re-prefixed, so it is not always a verbatim
//! slice. A slab's span covers the region it was drawn from: the delimiter
//! occurrence (for prefixed chunks) through the end of the trimmed body.

use crate::{Chunker, Slab};

/// Literal delimiter splitter.
///
/// ## Example
///
/// ```rust
/// use docslab::{Chunker, DelimiterChunker};
///
/// let chunker = DelimiterChunker::new("## ");
/// let slabs = chunker.chunk("## A\ntext1\n## B\ntext2");
///
/// assert_eq!(slabs.len(), 2);
/// assert_eq!(slabs[0].text, "## A\ntext1");
/// assert_eq!(slabs[1].text, "## B\ntext2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterChunker {
    delimiter: String,
}

impl DelimiterChunker {
    /// Create a chunker splitting on `delimiter`.
    #[must_use]
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    /// Split on Markdown level-2 headings.
    #[must_use]
    pub fn markdown_sections() -> Self {
        Self::new("## ")
    }

    /// The delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl Chunker for DelimiterChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        if text.is_empty() {
            return vec![];
        }

        let delimiter = self.delimiter.as_str();
        if delimiter.is_empty() {
            return vec![Slab::new(text, 0, text.len(), 0)];
        }

        let leading = text.starts_with(delimiter);
        let mut slabs = Vec::new();
        let mut part_start = 0;

        for (i, part) in text.split(delimiter).enumerate() {
            let this_start = part_start;
            part_start += part.len() + delimiter.len();

            let body = part.trim();
            if body.is_empty() {
                continue;
            }

            let body_start = this_start + (part.len() - part.trim_start().len());
            let body_end = body_start + body.len();
            let index = slabs.len();

            if i == 0 && !leading {
                slabs.push(Slab::new(body, body_start, body_end, index));
            } else {
                let start = this_start.saturating_sub(delimiter.len());
                slabs.push(Slab::new(format!("{delimiter}{body}"), start, body_end, index));
            }
        }

        slabs
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / 1000).max(1)
    }
}
