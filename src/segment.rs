//! Parsed segments: the input contract from the external parser.
//!
//! A parser turns an uploaded file into an ordered list of segments, usually
//! one per page for paged formats and a single segment for plain text or
//! Markdown. Whole-document strategies never look at segments directly; they
//! operate on the [`full_text`] view:
//!
//! ```text
//! segments: ["Page one.", "Page two."]
//! full text: "Page one.\nPage two."
//! ```

use serde::{Deserialize, Serialize};

/// Open-ended key/value metadata, carried through unchanged.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One unit of parsed source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSegment {
    /// Ordinal position among segments of one document, starting at 0.
    pub index: usize,
    /// Raw text. May be empty.
    pub content: String,
    /// 1-based page number, when the source has pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Parser-supplied metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ParsedSegment {
    /// Create a segment without page number or metadata.
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
            page_number: None,
            metadata: Metadata::new(),
        }
    }

    /// Set the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }

    /// Insert a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Parser output for one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Original file name.
    pub filename: String,
    /// File type as reported by the parser (`pdf`, `txt`, `md`, ...).
    pub file_type: String,
    /// Size of the uploaded file in bytes.
    pub file_size: u64,
    /// Segments in document order.
    pub segments: Vec<ParsedSegment>,
}

impl ParsedDocument {
    /// The joined full text of all segments.
    #[must_use]
    pub fn full_text(&self) -> String {
        full_text(&self.segments)
    }
}

/// Concatenate segment contents with a single `\n` between them.
///
/// Empty input yields an empty string.
///
/// ```rust
/// use docslab::{full_text, ParsedSegment};
///
/// let segments = [ParsedSegment::new(0, "a"), ParsedSegment::new(1, "b")];
/// assert_eq!(full_text(&segments), "a\nb");
/// assert_eq!(full_text(&[]), "");
/// ```
#[must_use]
pub fn full_text(segments: &[ParsedSegment]) -> String {
    let capacity = segments.iter().map(|s| s.content.len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&segment.content);
    }
    text
}

/// Maps between byte offsets and character offsets of one string.
///
/// Chunk sizes are user-facing and counted in characters, while slicing is
/// done in bytes. Lookups are `O(log n)`.
#[derive(Debug, Clone)]
pub struct CharMap {
    // Byte offset of every char start, followed by the text length.
    boundaries: Vec<usize>,
}

impl CharMap {
    /// Build the map for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of characters in the text.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Byte offset of the character at `ch`, clamped to the text length.
    #[must_use]
    pub fn byte_of(&self, ch: usize) -> usize {
        self.boundaries
            .get(ch)
            .or_else(|| self.boundaries.last())
            .copied()
            .unwrap_or(0)
    }

    /// Character offset of the byte offset `byte`.
    ///
    /// A byte inside a multi-byte character maps to the following character.
    #[must_use]
    pub fn char_of(&self, byte: usize) -> usize {
        self.boundaries.partition_point(|&b| b < byte)
    }
}
