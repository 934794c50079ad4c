//! Recursive character splitting (LangChain-style).
//!
//! Tries progressively finer separators until chunks fit within the size limit.
//! This is the strategy used for automatic ingestion, where nobody tunes
//! parameters by hand.
//!
//! ## The Algorithm
//!
//! Given separators `["\n\n", "\n", "。", ".", " "]` and max_size `100`:
//!
//! ```text
//! 1. Split on "\n\n" (paragraphs), keeping the separator on each piece
//! 2. Greedily merge adjacent pieces while the merged chunk fits
//! 3. Any piece > 100 chars: split it again on the next separator
//! 4. No separators left: force split every 100 chars
//! ```
//!
//! Separators stay attached to the piece before them, so every slab is a
//! verbatim slice. Sizes count characters.
//!
//! ## Overlap
//!
//! With [`RecursiveChunker::with_overlap`], a new chunk starts with the
//! trailing pieces of the previous one, as many as fit in the overlap:
//!
//! ```text
//! pieces (chars): A=4 B=3 C=5 D=4     max_size = 10, overlap = 4
//!
//! Chunk 0: A B      (7)
//! Chunk 1: B C      (8)  <- B repeated; A + B would exceed the overlap
//! Chunk 2: D        (4)  <- C alone is longer than the overlap
//! ```
//!
//! Without overlap, concatenating the chunks reproduces the input exactly.
//!
//! ## Default Separators
//!
//! The defaults cover both Western and CJK sentence punctuation:
//!
//! ```text
//! ["\n\n", "\n", "。", "！", "？", ".", "!", "?", " "]
//! ```

use std::collections::VecDeque;

use crate::{CharMap, Chunker, FixedChunker, Slab};

/// Separator hierarchy used for automatic ingestion.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", "。", "！", "？", ".", "!", "?", " "];

/// Recursive character splitter.
///
/// Splits text using a hierarchy of separators, trying the coarsest first.
///
/// ## Example
///
/// ```rust
/// use docslab::{Chunker, RecursiveChunker};
///
/// let chunker = RecursiveChunker::new(50, &["\n\n", "\n", ". ", " "]);
/// let text = "Paragraph one.\n\nParagraph two is longer and might need splitting.";
/// let slabs = chunker.chunk(text);
///
/// assert!(slabs.iter().all(|s| s.char_len() <= 50));
///
/// let rebuilt: String = slabs.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(rebuilt, text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveChunker {
    max_size: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl RecursiveChunker {
    /// Create a new recursive chunker.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum chunk size in characters (at least 1)
    /// * `separators` - Hierarchy of separators, coarsest first
    #[must_use]
    pub fn new(max_size: usize, separators: &[&str]) -> Self {
        Self {
            max_size: max_size.max(1),
            overlap: 0,
            separators: separators
                .iter()
                .filter(|s| !s.is_empty())
                .map(|&s| s.to_string())
                .collect(),
        }
    }

    /// Create a chunker with [`DEFAULT_SEPARATORS`].
    #[must_use]
    pub fn with_defaults(max_size: usize) -> Self {
        Self::new(max_size, DEFAULT_SEPARATORS)
    }

    /// Create a chunker with separators for Markdown.
    #[must_use]
    pub fn markdown(max_size: usize) -> Self {
        Self::new(max_size, &["\n## ", "\n### ", "\n\n", "\n", ". ", " "])
    }

    /// Repeat up to `overlap` trailing characters of each chunk at the start
    /// of the next one.
    ///
    /// The repeated text is made of whole pieces, so it always begins right
    /// after a separator. Chunks still never exceed the maximum size.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Maximum chunk size in characters.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Overlap in characters.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Recursively split `text` (located at byte `base` of the document)
    /// into byte ranges using separators from `sep_index` on.
    fn split_recursive(&self, text: &str, base: usize, sep_index: usize, out: &mut Vec<(usize, usize)>) {
        if text.chars().count() <= self.max_size {
            if !text.is_empty() {
                out.push((base, base + text.len()));
            }
            return;
        }

        let Some(sep) = self.separators.get(sep_index) else {
            self.force_split(text, base, out);
            return;
        };

        if !text.contains(sep.as_str()) {
            self.split_recursive(text, base, sep_index + 1, out);
            return;
        }

        let mut pieces = Vec::new();
        let mut pos = 0;
        for (at, _) in text.match_indices(sep.as_str()) {
            let end = at + sep.len();
            pieces.push((pos, end));
            pos = end;
        }
        if pos < text.len() {
            pieces.push((pos, text.len()));
        }

        // Window of whole pieces: (start, end, chars)
        let mut window: VecDeque<(usize, usize, usize)> = VecDeque::new();
        let mut window_chars = 0;

        for (start, end) in pieces {
            let chars = text[start..end].chars().count();

            if chars > self.max_size {
                Self::emit(&window, base, out);
                window.clear();
                window_chars = 0;
                self.split_recursive(&text[start..end], base + start, sep_index + 1, out);
                continue;
            }

            if window_chars + chars > self.max_size && !window.is_empty() {
                Self::emit(&window, base, out);
                // Keep trailing pieces as the overlap of the next chunk
                while window_chars > self.overlap
                    || (window_chars > 0 && window_chars + chars > self.max_size)
                {
                    let Some((_, _, dropped)) = window.pop_front() else {
                        break;
                    };
                    window_chars -= dropped;
                }
            }

            window.push_back((start, end, chars));
            window_chars += chars;
        }

        Self::emit(&window, base, out);
    }

    /// Push the span covered by `window`, if any.
    fn emit(window: &VecDeque<(usize, usize, usize)>, base: usize, out: &mut Vec<(usize, usize)>) {
        if let (Some(first), Some(last)) = (window.front(), window.back()) {
            out.push((base + first.0, base + last.1));
        }
    }

    /// Force split at character boundaries when no separator works.
    fn force_split(&self, text: &str, base: usize, out: &mut Vec<(usize, usize)>) {
        let map = CharMap::new(text);
        out.extend(
            FixedChunker::new(self.max_size, self.overlap)
                .windows(map.char_len())
                .into_iter()
                .map(|(start, end)| (base + map.byte_of(start), base + map.byte_of(end))),
        );
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        if text.is_empty() {
            return vec![];
        }

        let mut ranges = Vec::with_capacity(self.estimate_chunks(text.len()));
        self.split_recursive(text, 0, 0, &mut ranges);

        ranges
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| Slab::new(&text[start..end], start, end, index))
            .collect()
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / self.max_size).max(1)
    }
}
