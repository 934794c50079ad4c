//! Aggregate chunk statistics for tuning parameters interactively.

use serde::{Deserialize, Serialize};

use crate::Slab;

/// Count and length figures of one chunk set, in characters.
///
/// All fields are zero for an empty set. For a non-empty set
/// `min_length <= avg_length <= max_length`, and `total_chars` is the sum of
/// all chunk lengths.
///
/// ```rust
/// use docslab::{Chunker, ChunkStats, FixedChunker};
///
/// let slabs = FixedChunker::new(10, 3).chunk("abcdefghijklmnopqrstuvwxy");
/// let stats = ChunkStats::from_slabs(&slabs);
///
/// assert_eq!(stats.total_chunks, 4);
/// assert_eq!(stats.total_chars, 34);
/// assert_eq!(stats.avg_length, 9); // 8.5 rounds up
/// assert_eq!((stats.min_length, stats.max_length), (4, 10));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkStats {
    /// Number of chunks.
    pub total_chunks: usize,
    /// Sum of chunk lengths.
    pub total_chars: usize,
    /// Mean chunk length, rounded half up.
    pub avg_length: usize,
    /// Shortest chunk.
    pub min_length: usize,
    /// Longest chunk.
    pub max_length: usize,
}

impl ChunkStats {
    /// Statistics over slab character lengths.
    #[must_use]
    pub fn from_slabs(slabs: &[Slab]) -> Self {
        Self::from_lengths(slabs.iter().map(Slab::char_len))
    }

    /// Statistics over arbitrary lengths. Single pass.
    #[must_use]
    pub fn from_lengths(lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut stats = Self {
            min_length: usize::MAX,
            ..Self::default()
        };

        for len in lengths {
            stats.total_chunks += 1;
            stats.total_chars += len;
            stats.min_length = stats.min_length.min(len);
            stats.max_length = stats.max_length.max(len);
        }

        if stats.total_chunks == 0 {
            return Self::default();
        }

        let n = stats.total_chunks;
        stats.avg_length = (2 * stats.total_chars + n) / (2 * n);
        stats
    }

    /// Whether the set was empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_chunks == 0
    }
}
