//! Error types for docslab.

/// The external parser could not turn an upload into segments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable reason, shown to the user as-is.
    pub message: String,
}

impl ParseError {
    /// Create a parse error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The storage collaborator rejected a submission. Nothing was stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmitError {
    /// Human-readable reason, shown to the user as-is.
    pub message: String,
}

impl SubmitError {
    /// Create a submit error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while chunking or driving a preview session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap is not strictly smaller than the chunk size.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The offending overlap.
        overlap: usize,
    },

    /// The current parameters produce no chunks, so there is nothing to submit.
    #[error("no chunks to submit, check the chunking settings")]
    EmptyChunkSet,

    /// Document parsing failed.
    #[error("document parsing failed: {0}")]
    Parse(#[from] ParseError),

    /// Chunk submission failed.
    #[error("chunk submission failed: {0}")]
    Submit(#[from] SubmitError),

    /// The session is not in a state that allows this operation.
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        /// What was attempted.
        operation: &'static str,
        /// The session state at the time.
        state: &'static str,
    },

    /// The request was superseded by a reset or a newer request.
    #[error("request was cancelled")]
    Cancelled,
}

/// Result type for docslab operations.
pub type Result<T> = std::result::Result<T, Error>;
