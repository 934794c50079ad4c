//! Fixed-size chunking with overlap.
//!
//! The simplest chunking strategy: a window of N characters sliding forward
//! by N - M characters, so adjacent chunks share M characters.
//!
//! ## How It Works
//!
//! ```text
//! size = 10, overlap = 3
//!
//! Document: "abcdefghijklmnopqrstuvwxy"
//!
//! Chunk 0: "abcdefghij"   [0..10]
//! Chunk 1: "hijklmnopq"   [7..17]   <- starts at 10 - 3 = 7
//! Chunk 2: "opqrstuvwx"   [14..24]  <- starts at 17 - 3 = 14
//! Chunk 3: "vwxy"         [21..25]  <- final chunk may be shorter
//! ```
//!
//! Sizes and overlaps count characters, not bytes, so a window never cuts a
//! multi-byte character in half.
//!
//! ## Degenerate Parameters
//!
//! The window is total over its inputs. `size == 0` yields no chunks, and an
//! overlap that would keep the window in place (`overlap >= size`) is ignored
//! for that step: the next window starts where the previous one ended. No
//! parameter combination can loop forever.
//!
//! ## Trade-offs
//!
//! | Overlap | Storage | Retrieval | Risk |
//! |---------|---------|-----------|------|
//! | 0% | Minimal | Poor at boundaries | Info loss |
//! | 10-20% | Low | Good | Sweet spot |
//! | 50%+ | High | Redundant | Wasted compute |

use crate::{CharMap, Chunker, Error, Result, Slab};

/// Fixed-size chunker with configurable overlap.
///
/// ## Example
///
/// ```rust
/// use docslab::{Chunker, FixedChunker};
///
/// let chunker = FixedChunker::new(100, 20);
/// let text = "A".repeat(250);
/// let slabs = chunker.chunk(&text);
///
/// assert_eq!(slabs.len(), 3);
/// assert_eq!(slabs[0].len(), 100);
/// assert_eq!(slabs[1].start, 80); // 100 - 20 overlap
/// assert_eq!(slabs[2].end, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedChunker {
    size: usize,
    overlap: usize,
}

impl FixedChunker {
    /// Create a new fixed-size chunker.
    ///
    /// Any values are accepted; see the module docs for how degenerate
    /// parameters behave. Use [`FixedChunker::try_new`] to reject them.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum chunk size in characters
    /// * `overlap` - Characters shared between adjacent chunks
    #[must_use]
    pub const fn new(size: usize, overlap: usize) -> Self {
        Self { size, overlap }
    }

    /// Create a chunker, rejecting `size == 0` and `overlap >= size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] or [`Error::OverlapExceedsSize`].
    pub fn try_new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidChunkSize(size));
        }
        if overlap >= size {
            return Err(Error::OverlapExceedsSize { size, overlap });
        }
        Ok(Self::new(size, overlap))
    }

    /// Create a chunker with no overlap.
    #[must_use]
    pub const fn no_overlap(size: usize) -> Self {
        Self::new(size, 0)
    }

    /// Window size in characters.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Overlap in characters.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Character windows `[start, end)` over a text of `len` characters.
    ///
    /// Starts strictly increase and the last window ends at `len`.
    #[must_use]
    pub fn windows(&self, len: usize) -> Vec<(usize, usize)> {
        if len == 0 || self.size == 0 {
            return vec![];
        }

        let mut windows = Vec::with_capacity(self.estimate_chunks(len));
        let mut start = 0;

        loop {
            let end = (start + self.size).min(len);
            windows.push((start, end));

            if end >= len {
                break;
            }

            let next = (start + self.size).saturating_sub(self.overlap);
            start = if next > start { next } else { end };
        }

        windows
    }
}

impl Chunker for FixedChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        if text.is_empty() {
            return vec![];
        }

        let map = CharMap::new(text);
        self.windows(map.char_len())
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                let (start, end) = (map.byte_of(start), map.byte_of(end));
                Slab::new(&text[start..end], start, end, index)
            })
            .collect()
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        if text_len == 0 || self.size == 0 {
            return 0;
        }
        let step = if self.overlap < self.size {
            self.size - self.overlap
        } else {
            self.size
        };
        text_len.div_ceil(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_chunking() {
        let chunker = FixedChunker::new(10, 2);
        let text = "abcdefghijklmnopqrstuvwxyz";
        let slabs = chunker.chunk(text);

        assert_eq!(slabs[0].text, "abcdefghij");
        assert_eq!(slabs[0].start, 0);
        assert_eq!(slabs[0].end, 10);

        assert_eq!(slabs[1].start, 8); // 10 - 2 overlap
    }

    #[test]
    fn test_size_10_overlap_3_on_25_chars() {
        let chunker = FixedChunker::new(10, 3);
        let text = "abcdefghijklmnopqrstuvwxy";
        let spans: Vec<_> = chunker.chunk(text).iter().map(Slab::span).collect();

        assert_eq!(spans, vec![0..10, 7..17, 14..24, 21..25]);
    }

    #[test]
    fn test_empty_text() {
        let chunker = FixedChunker::new(10, 2);
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_zero_size_yields_nothing() {
        let chunker = FixedChunker::new(0, 0);
        assert!(chunker.chunk("some text").is_empty());
    }

    #[test]
    fn test_text_smaller_than_chunk() {
        let chunker = FixedChunker::new(100, 20);
        let slabs = chunker.chunk("small");
        assert_eq!(slabs.len(), 1);
        assert_eq!(slabs[0].text, "small");
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_overlap_chunk() {
        let chunker = FixedChunker::new(5, 0);
        let slabs = chunker.chunk("abcdefghij");
        assert_eq!(slabs.len(), 2);
        assert_eq!(slabs[1].text, "fghij");
    }

    #[test]
    fn test_overlap_equal_to_size_still_terminates() {
        let chunker = FixedChunker::new(4, 4);
        let slabs = chunker.chunk("abcdefghij");
        let texts: Vec<_> = slabs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_overlap_larger_than_size_still_terminates() {
        let chunker = FixedChunker::new(3, 50);
        let slabs = chunker.chunk("abcdefg");
        assert_eq!(slabs.len(), 3);
        assert_eq!(slabs.last().map(|s| s.end), Some(7));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let chunker = FixedChunker::new(2, 0);
        let text = "日本語です";
        let texts: Vec<_> = chunker.chunk(text).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["日本", "語で", "す"]);
    }

    #[test]
    fn test_try_new_rejects_bad_parameters() {
        assert!(matches!(
            FixedChunker::try_new(0, 0),
            Err(Error::InvalidChunkSize(0))
        ));
        assert!(matches!(
            FixedChunker::try_new(10, 10),
            Err(Error::OverlapExceedsSize { size: 10, overlap: 10 })
        ));
        assert!(FixedChunker::try_new(10, 9).is_ok());
    }
}
