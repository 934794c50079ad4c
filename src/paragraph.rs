//! Paragraph chunking.
//!
//! Splits on runs of two or more consecutive newlines and drops empty parts.
//! This is a coarse paragraph-boundary heuristic; no embeddings are involved.
//! It is persisted under the strategy name `"semantic"` for compatibility
//! with stored chunk metadata (see [`crate::Strategy::Paragraph`]).
//!
//! ```text
//! "para1\n\npara2\n\n\npara3"  ->  ["para1", "para2", "para3"]
//! "line1\nline2"               ->  ["line1\nline2"]   <- single newline kept
//! ```
//!
//! Parts are not trimmed: text between two blank-line runs is returned
//! byte-for-byte, so every slab is a verbatim slice of its source.

use crate::{Chunker, Slab};

/// Blank-line paragraph splitter.
///
/// ## Example
///
/// ```rust
/// use docslab::{Chunker, ParagraphChunker};
///
/// let slabs = ParagraphChunker.chunk("para1\n\npara2\n\n\npara3");
/// let texts: Vec<_> = slabs.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, vec!["para1", "para2", "para3"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphChunker;

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        let bytes = text.as_bytes();
        let mut slabs = Vec::new();
        let mut start = 0;
        let mut i = 0;

        let push = |slabs: &mut Vec<Slab>, start: usize, end: usize| {
            if end > start {
                let index = slabs.len();
                slabs.push(Slab::new(&text[start..end], start, end, index));
            }
        };

        while i < bytes.len() {
            if bytes[i] != b'\n' {
                i += 1;
                continue;
            }

            let run_start = i;
            while i < bytes.len() && bytes[i] == b'\n' {
                i += 1;
            }

            if i - run_start >= 2 {
                push(&mut slabs, start, run_start);
                start = i;
            }
        }

        push(&mut slabs, start, text.len());
        slabs
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        (text_len / 300).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        ParagraphChunker
            .chunk(text)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn test_blank_line_runs() {
        assert_eq!(texts("para1\n\npara2\n\n\npara3"), vec!["para1", "para2", "para3"]);
    }

    #[test]
    fn test_single_newline_does_not_split() {
        assert_eq!(texts("line1\nline2"), vec!["line1\nline2"]);
    }

    #[test]
    fn test_leading_and_trailing_runs() {
        assert_eq!(texts("\n\nbody\n\n"), vec!["body"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(texts("").is_empty());
        assert!(texts("\n\n\n").is_empty());
    }

    #[test]
    fn test_spans_are_verbatim() {
        let text = "中文段落\n\nsecond";
        for slab in ParagraphChunker.chunk(text) {
            assert_eq!(&text[slab.span()], slab.text);
        }
    }
}
