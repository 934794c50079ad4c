//! # docslab
//!
//! Document chunking for retrieval-augmented generation (RAG) uploads, with an
//! interactive preview loop for tuning the chunking by hand.
//!
//! ## The Problem
//!
//! An upload goes through a parser that yields segments, usually one per
//! page. Before indexing, those segments must be cut into chunks: small enough
//! to embed, large enough to keep meaning, and addressed well enough that a
//! citation can point back at a page and character range.
//!
//! No single cut works for every document. A Markdown handbook wants one chunk
//! per `## ` section; a scanned report wants one chunk per page; a long
//! transcript wants a sliding window. So chunking is a pure function of
//! `(segments, parameters)` that a user can rerun on every slider move while
//! watching statistics, and only then submit.
//!
//! ## Chunking Strategies
//!
//! ### Fixed Size (`fixed`, `length`)
//!
//! A window of N characters sliding by N - M, over the joined text (`fixed`)
//! or inside each segment (`length`).
//!
//! ```text
//! Document: "abcdefghijklmnopqrstuvwxy"
//! Size: 10, Overlap: 3
//!
//! Chunk 0: "abcdefghij"  [0..10]
//! Chunk 1: "hijklmnopq"  [7..17]  <- overlap preserves "hij"
//! Chunk 2: "opqrstuvwx"  [14..24]
//! Chunk 3: "vwxy"        [21..25]
//! ```
//!
//! ### Delimiter (`delimiter`)
//!
//! Split on a literal marker and keep it as the chunk prefix:
//!
//! ```text
//! "## A\ntext1\n## B\ntext2"  --"## "-->  ["## A\ntext1", "## B\ntext2"]
//! ```
//!
//! ### Paragraph (`semantic`)
//!
//! Split on blank lines. Persisted as `"semantic"` for compatibility, though
//! it is a plain paragraph heuristic.
//!
//! ### Per Page (`page`)
//!
//! One chunk per parsed segment, untouched.
//!
//! ### Recursive (`recursive`)
//!
//! Paragraphs, then lines, then sentences (CJK and Western punctuation), then
//! words, then characters, until every chunk fits. Consecutive chunks can
//! share trailing pieces up to the overlap. Used for automatic ingestion.
//!
//! ## Quick Start
//!
//! ```rust
//! use docslab::{assemble, split_document, ChunkParams, ChunkStats, ParsedSegment, Strategy};
//!
//! let segments = vec![
//!     ParsedSegment::new(0, "## Intro\nWelcome.").with_page(1),
//!     ParsedSegment::new(1, "## Usage\nRun it.").with_page(2),
//! ];
//!
//! let params = ChunkParams::new(Strategy::Delimiter).with_delimiter("## ");
//! let slabs = split_document(&segments, &params);
//! let stats = ChunkStats::from_slabs(&slabs);
//! assert_eq!(stats.total_chunks, 2);
//!
//! let chunks = assemble(&segments, &slabs, &params);
//! assert_eq!(chunks[1].content, "## Usage\nRun it.");
//! assert_eq!(chunks[1].metadata["chunk_index"], 1);
//! ```
//!
//! ## Preview Sessions
//!
//! [`PreviewSession`] wraps the loop: parse through a [`DocumentParser`],
//! recompute on every parameter change, select chunks, submit through a
//! [`ChunkStore`]. Late results from superseded requests are ignored.
//!
//! ## Units
//!
//! Sizes, overlaps, statistics and `start_char`/`end_char` count Unicode
//! scalar values. [`Slab`] spans are byte offsets, so they slice directly.

mod assemble;
mod delimiter;
mod error;
mod fixed;
mod paragraph;
mod params;
mod recursive;
mod segment;
mod session;
mod slab;
mod stats;

pub use assemble::{assemble, params_metadata, split_document, ManualChunk, SubmitRequest};
pub use delimiter::DelimiterChunker;
pub use error::{Error, ParseError, Result, SubmitError};
pub use fixed::FixedChunker;
pub use paragraph::ParagraphChunker;
pub use params::{ChunkParams, ParamLimits, Strategy};
pub use recursive::{RecursiveChunker, DEFAULT_SEPARATORS};
pub use segment::{full_text, CharMap, Metadata, ParsedDocument, ParsedSegment};
pub use session::{
    ChunkStore, Completion, DocumentId, DocumentParser, PreviewSession, SessionState, SourceFile,
    Ticket,
};
pub use slab::Slab;
pub use stats::ChunkStats;

/// A text chunking strategy.
///
/// All chunkers implement this trait, enabling polymorphic usage:
///
/// ```rust
/// use docslab::{Chunker, FixedChunker, ParagraphChunker};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<docslab::Slab> {
///     chunker.chunk(text)
/// }
///
/// let fixed = FixedChunker::new(100, 20);
/// let paragraphs = ParagraphChunker;
///
/// let text = "Hello world.\n\nThis is a test.";
/// assert_eq!(chunk_document(&fixed, text).len(), 1);
/// assert_eq!(chunk_document(&paragraphs, text).len(), 2);
/// ```
///
/// Implementations are pure: the same text always yields the same slabs.
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each chunk is a [`Slab`] containing the text and its byte offsets
    /// in the original text.
    fn chunk(&self, text: &str) -> Vec<Slab>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
