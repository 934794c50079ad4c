//! Chunking parameters.
//!
//! ## The Problem
//!
//! Parameters arrive from interactive controls: a strategy picker, size and
//! overlap sliders, a free-text delimiter box. Any of them can be out of range
//! at any moment, and `overlap >= size` would stall a naive sliding window.
//!
//! ## Two Ways In
//!
//! - [`ChunkParams::clamp`] pulls values into range. This is what an input
//!   boundary should use: the user never sees an "invalid parameter" error,
//!   the control just stops at its limit.
//! - [`ChunkParams::validate`] is strict and reports the first violation, for
//!   callers that would rather fail than silently adjust.
//!
//! ```rust
//! use docslab::{ChunkParams, ParamLimits, Strategy};
//!
//! let params = ChunkParams::new(Strategy::Fixed).with_size(200).with_overlap(500);
//! assert!(params.validate().is_err());
//!
//! let params = params.clamp(&ParamLimits::default());
//! assert_eq!(params.chunk_overlap, 199);
//! assert!(params.validate().is_ok());
//! ```
//!
//! Parameters are plain immutable values passed into the chunkers, and they
//! serialize with the same camelCase field names used in persisted chunk
//! metadata.

use serde::{Deserialize, Serialize};

use crate::{Chunker, DelimiterChunker, Error, FixedChunker, ParagraphChunker, RecursiveChunker, Result};

/// Which chunking algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fixed-size sliding window over the full text.
    Fixed,
    /// Literal delimiter split over the full text.
    Delimiter,
    /// Blank-line paragraph split over the full text.
    ///
    /// Persisted as `"semantic"`, which is the name existing records use.
    #[serde(rename = "semantic", alias = "paragraph")]
    Paragraph,
    /// One chunk per parsed segment (e.g. per page).
    Page,
    /// Fixed-size sliding window inside each segment.
    Length,
    /// Recursive separator-based split over the full text.
    Recursive,
}

impl Strategy {
    /// All strategies.
    pub const ALL: [Self; 6] = [
        Self::Fixed,
        Self::Delimiter,
        Self::Paragraph,
        Self::Page,
        Self::Length,
        Self::Recursive,
    ];

    /// The persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Delimiter => "delimiter",
            Self::Paragraph => "semantic",
            Self::Page => "page",
            Self::Length => "length",
            Self::Recursive => "recursive",
        }
    }

    /// Whether this strategy cuts each segment on its own.
    #[must_use]
    pub const fn is_per_segment(self) -> bool {
        matches!(self, Self::Page | Self::Length)
    }

    /// Whether `chunk_size` and `chunk_overlap` affect the output.
    #[must_use]
    pub const fn uses_size(self) -> bool {
        matches!(self, Self::Fixed | Self::Length | Self::Recursive)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounds enforced by [`ChunkParams::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamLimits {
    /// Smallest allowed chunk size.
    pub min_size: usize,
    /// Largest allowed chunk size.
    pub max_size: usize,
    /// Minimum distance between overlap and size (`overlap <= size - min_gap`).
    pub min_gap: usize,
}

impl ParamLimits {
    /// Limits of the manual upload form: 100 to 5000 characters.
    #[must_use]
    pub const fn manual_upload() -> Self {
        Self {
            min_size: 100,
            max_size: 5000,
            min_gap: 1,
        }
    }
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: 100_000,
            min_gap: 1,
        }
    }
}

/// Strategy plus its parameters.
///
/// `chunk_size` and `chunk_overlap` count characters and only matter for
/// strategies where [`Strategy::uses_size`] holds; `delimiter` only matters
/// for [`Strategy::Delimiter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkParams {
    /// Algorithm to run.
    pub strategy: Strategy,
    /// Target chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks.
    pub chunk_overlap: usize,
    /// Literal split marker.
    pub delimiter: String,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            strategy: Strategy::Fixed,
            chunk_size: 500,
            chunk_overlap: 50,
            delimiter: "## ".to_string(),
        }
    }
}

impl ChunkParams {
    /// Defaults for `strategy`.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Settings of the automatic ingestion pipeline: recursive, 1000 / 200.
    #[must_use]
    pub fn ingestion() -> Self {
        Self {
            strategy: Strategy::Recursive,
            chunk_size: 1000,
            chunk_overlap: 200,
            ..Self::default()
        }
    }

    /// Settings of the manual upload dialog: per page, 1000 / 200.
    ///
    /// Pair with [`ParamLimits::manual_upload`].
    #[must_use]
    pub fn manual_upload() -> Self {
        Self {
            strategy: Strategy::Page,
            chunk_size: 1000,
            chunk_overlap: 200,
            ..Self::default()
        }
    }

    /// Set the chunk size.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the overlap.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Set the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Pull size and overlap into `limits`.
    ///
    /// Afterwards `overlap < size` always holds.
    #[must_use]
    pub fn clamp(mut self, limits: &ParamLimits) -> Self {
        let min_size = limits.min_size.max(1);
        let max_size = limits.max_size.max(min_size);
        self.chunk_size = self.chunk_size.clamp(min_size, max_size);

        let max_overlap = self.chunk_size.saturating_sub(limits.min_gap.max(1));
        self.chunk_overlap = self.chunk_overlap.min(max_overlap);
        self
    }

    /// Check the parameters the strategy actually uses.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidChunkSize`] when a size-based strategy has size 0, and
    /// [`Error::OverlapExceedsSize`] when `overlap >= size`.
    pub fn validate(&self) -> Result<()> {
        if !self.strategy.uses_size() {
            return Ok(());
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidChunkSize(self.chunk_size));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::OverlapExceedsSize {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }

    /// The sliding window for `Fixed` and `Length`.
    #[must_use]
    pub const fn window(&self) -> FixedChunker {
        FixedChunker::new(self.chunk_size, self.chunk_overlap)
    }

    /// The whole-document chunker, or `None` for per-segment strategies.
    #[must_use]
    pub fn chunker(&self) -> Option<Box<dyn Chunker>> {
        match self.strategy {
            Strategy::Fixed => Some(Box::new(self.window())),
            Strategy::Delimiter => Some(Box::new(DelimiterChunker::new(self.delimiter.clone()))),
            Strategy::Paragraph => Some(Box::new(ParagraphChunker)),
            Strategy::Recursive => Some(Box::new(
                RecursiveChunker::with_defaults(self.chunk_size).with_overlap(self.chunk_overlap),
            )),
            Strategy::Page | Strategy::Length => None,
        }
    }
}
