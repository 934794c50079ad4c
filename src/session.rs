//! Interactive preview session.
//!
//! Drives the loop an advanced-upload screen needs: parse a file, try
//! strategies and parameters while watching chunk statistics, inspect single
//! chunks, then submit.
//!
//! ```text
//!             begin_parse                 finish_parse(Ok)
//!   Idle ──────────────────▶ Parsing ─────────────────────▶ Previewing ◀──┐
//!    ▲                          │                              │   ▲      │ set_params
//!    │ retry                    │ finish_parse(Err)            │   │      │ (recompute)
//!    └──────── Failed ◀─────────┘                begin_submit  │   │ finish_submit(Err)
//!                                                              ▼   │
//!                                       Submitted ◀──────── Submitting
//!                                                finish_submit(Ok)
//! ```
//!
//! ## Stale Completions
//!
//! Parsing and submission are asynchronous and may outlive the request that
//! started them: the user picks another file, or resets the session. Every
//! `begin_*` call therefore bumps a monotonically increasing generation and
//! hands out a [`Ticket`] stamped with it. A `finish_*` call whose ticket is
//! not from the current generation changes nothing and reports
//! [`Completion::Stale`].
//!
//! Tickets also observe cancellation. [`Ticket::run`] races a collaborator
//! future against the generation moving on and returns `None` if it lost, so
//! the caller can drop the in-flight request early.
//!
//! ## Sharing a Session
//!
//! The two-phase API does not hold the session across an `.await`, so a
//! session behind a mutex stays responsive while a request is in flight:
//!
//! ```rust
//! # use std::sync::{Arc, Mutex};
//! # use docslab::{DocumentParser, ParseError, ParsedDocument, ParsedSegment, PreviewSession, SourceFile};
//! # struct Echo;
//! # #[async_trait::async_trait]
//! # impl DocumentParser for Echo {
//! #     async fn parse(&self, file: &SourceFile) -> Result<ParsedDocument, ParseError> {
//! #         Ok(ParsedDocument {
//! #             filename: file.filename.clone(),
//! #             file_type: "txt".into(),
//! #             file_size: file.data.len() as u64,
//! #             segments: vec![ParsedSegment::new(0, String::from_utf8_lossy(&file.data))],
//! #         })
//! #     }
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let session = Arc::new(Mutex::new(PreviewSession::new()));
//! let file = SourceFile::new("notes.txt", b"hello".to_vec());
//!
//! let mut ticket = session.lock().unwrap().begin_parse(&file.filename).unwrap();
//! if let Some(result) = ticket.run(Echo.parse(&file)).await {
//!     session.lock().unwrap().finish_parse(ticket, result);
//! }
//! assert_eq!(session.lock().unwrap().stats().total_chunks, 1);
//! # });
//! ```

use std::future::Future;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    split_document, ChunkParams, ChunkStats, Error, ParamLimits, ParseError, ParsedDocument,
    Result, Slab, Strategy, SubmitError, SubmitRequest,
};

/// Identifier the storage collaborator assigns to a created document.
pub type DocumentId = String;

/// An uploaded file handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name, including extension.
    pub filename: String,
    /// Raw bytes.
    pub data: Vec<u8>,
}

impl SourceFile {
    /// Create a source file.
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            data,
        }
    }
}

/// Turns uploads into segments.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse one file. Fails with a human-readable message.
    async fn parse(&self, file: &SourceFile) -> std::result::Result<ParsedDocument, ParseError>;
}

/// Stores assembled chunks as a new document.
///
/// Implementations must be all-or-nothing: on error, no chunk was stored.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Create a document from the request.
    async fn submit(&self, request: &SubmitRequest) -> std::result::Result<DocumentId, SubmitError>;
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No file chosen.
    Idle,
    /// Waiting for the parser.
    Parsing,
    /// Segments loaded; chunks follow the parameters.
    Previewing,
    /// Waiting for the storage collaborator.
    Submitting,
    /// Stored. Terminal until [`PreviewSession::reset`].
    Submitted(DocumentId),
    /// Parsing failed. [`PreviewSession::retry`] returns to `Idle`.
    Failed(String),
}

impl SessionState {
    /// Short lowercase name, for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Previewing => "previewing",
            Self::Submitting => "submitting",
            Self::Submitted(_) => "submitted",
            Self::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Parse,
    Submit,
}

/// Handle for one in-flight parse or submit request.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    kind: RequestKind,
    current: watch::Receiver<u64>,
}

impl Ticket {
    /// The generation this request belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the session has moved on since this request started.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.current.borrow() != self.generation
    }

    /// Resolves once the request is superseded or the session is dropped.
    pub async fn cancelled(&mut self) {
        let generation = self.generation;
        // A closed channel means the session is gone, which also cancels.
        let _ = self.current.wait_for(|current| *current != generation).await;
    }

    /// Run `request` unless cancelled first.
    ///
    /// Returns `None` when cancellation won; `request` is dropped unfinished.
    pub async fn run<F: Future>(&mut self, request: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        tokio::select! {
            output = request => Some(output),
            () = self.cancelled() => None,
        }
    }
}

/// Whether a `finish_*` call changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied.
    Applied,
    /// The ticket was superseded; nothing changed.
    Stale,
}

/// State of one interactive chunking session.
///
/// Chunks are a pure function of the parsed document and the parameters.
/// They are recomputed whenever the parameters change and reused otherwise.
#[derive(Debug)]
pub struct PreviewSession {
    state: SessionState,
    params: ChunkParams,
    limits: ParamLimits,
    document: Option<ParsedDocument>,
    slabs: Vec<Slab>,
    stats: ChunkStats,
    selected: Option<usize>,
    error: Option<String>,
    generation: watch::Sender<u64>,
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSession {
    /// A session with default parameters and limits.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(ChunkParams::default(), ParamLimits::default())
    }

    /// A session with the given starting parameters, clamped to `limits`.
    #[must_use]
    pub fn with_params(params: ChunkParams, limits: ParamLimits) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            state: SessionState::Idle,
            params: params.clamp(&limits),
            limits,
            document: None,
            slabs: Vec::new(),
            stats: ChunkStats::default(),
            selected: None,
            error: None,
            generation,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current parameters, already clamped.
    #[must_use]
    pub const fn params(&self) -> &ChunkParams {
        &self.params
    }

    /// Parameter limits.
    #[must_use]
    pub const fn limits(&self) -> &ParamLimits {
        &self.limits
    }

    /// The parsed document, once loaded.
    #[must_use]
    pub const fn document(&self) -> Option<&ParsedDocument> {
        self.document.as_ref()
    }

    /// Current chunks.
    #[must_use]
    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    /// Statistics of the current chunks.
    #[must_use]
    pub const fn stats(&self) -> ChunkStats {
        self.stats
    }

    /// Index of the selected chunk.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Full text of the selected chunk.
    #[must_use]
    pub fn selected_chunk(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.slabs.get(i))
            .map(|slab| slab.text.as_str())
    }

    /// Last user-facing error message, cleared by the next request.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current request generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    fn bump(&mut self) -> u64 {
        self.generation.send_modify(|g| *g += 1);
        self.generation()
    }

    fn next_ticket(&mut self, kind: RequestKind) -> Ticket {
        Ticket {
            generation: self.bump(),
            kind,
            current: self.generation.subscribe(),
        }
    }

    fn accepts(&self, ticket: &Ticket, kind: RequestKind, state: &SessionState) -> bool {
        ticket.kind == kind && ticket.generation == self.generation() && self.state == *state
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.name(),
        }
    }

    fn recompute(&mut self) {
        self.slabs = self
            .document
            .as_ref()
            .map(|doc| split_document(&doc.segments, &self.params))
            .unwrap_or_default();
        self.stats = ChunkStats::from_slabs(&self.slabs);
        self.selected = None;
    }

    /// Drop everything except the parameters and return to `Idle`.
    ///
    /// In-flight requests are cancelled and their results will be stale.
    pub fn reset(&mut self) {
        let generation = self.bump();
        self.state = SessionState::Idle;
        self.document = None;
        self.slabs.clear();
        self.stats = ChunkStats::default();
        self.selected = None;
        self.error = None;
        tracing::info!(generation, "session reset");
    }

    /// Leave `Failed` for `Idle` so a file can be picked again.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] outside `Failed`.
    pub fn retry(&mut self) -> Result<()> {
        if !matches!(self.state, SessionState::Failed(_)) {
            return Err(self.invalid("retry"));
        }
        self.state = SessionState::Idle;
        self.error = None;
        Ok(())
    }

    /// Start parsing a newly chosen file.
    ///
    /// Picking a file while another is still parsing, or while previewing,
    /// replaces it; the earlier request becomes stale.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] while submitting or after submission.
    pub fn begin_parse(&mut self, filename: &str) -> Result<Ticket> {
        if matches!(self.state, SessionState::Submitting | SessionState::Submitted(_)) {
            return Err(self.invalid("parse a file"));
        }

        let ticket = self.next_ticket(RequestKind::Parse);
        self.state = SessionState::Parsing;
        self.document = None;
        self.slabs.clear();
        self.stats = ChunkStats::default();
        self.selected = None;
        self.error = None;
        tracing::info!(filename, generation = ticket.generation, "parsing started");
        Ok(ticket)
    }

    /// Apply the parser's result.
    pub fn finish_parse(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<ParsedDocument, ParseError>,
    ) -> Completion {
        if !self.accepts(&ticket, RequestKind::Parse, &SessionState::Parsing) {
            tracing::warn!(generation = ticket.generation, "ignoring stale parse result");
            return Completion::Stale;
        }

        match result {
            Ok(document) => {
                tracing::info!(
                    filename = %document.filename,
                    segments = document.segments.len(),
                    "document parsed"
                );
                self.document = Some(document);
                self.state = SessionState::Previewing;
                self.recompute();
            }
            Err(err) => {
                tracing::warn!(error = %err, "document parsing failed");
                self.error = Some(err.message.clone());
                self.state = SessionState::Failed(err.message);
            }
        }
        Completion::Applied
    }

    /// Replace the parameters.
    ///
    /// Values are clamped first. Returns whether anything changed; when it
    /// did and a document is loaded, chunks and statistics are recomputed and
    /// the selection is cleared.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] while submitting or after submission.
    pub fn set_params(&mut self, params: ChunkParams) -> Result<bool> {
        if matches!(self.state, SessionState::Submitting | SessionState::Submitted(_)) {
            return Err(self.invalid("change parameters"));
        }

        let params = params.clamp(&self.limits);
        if params == self.params {
            return Ok(false);
        }

        self.params = params;
        if self.state == SessionState::Previewing {
            self.recompute();
            tracing::debug!(
                strategy = %self.params.strategy,
                chunks = self.stats.total_chunks,
                "chunks recomputed"
            );
        }
        Ok(true)
    }

    /// Change only the strategy.
    ///
    /// # Errors
    ///
    /// See [`PreviewSession::set_params`].
    pub fn set_strategy(&mut self, strategy: Strategy) -> Result<bool> {
        let params = ChunkParams {
            strategy,
            ..self.params.clone()
        };
        self.set_params(params)
    }

    /// Change only the chunk size. The overlap is clamped below it.
    ///
    /// # Errors
    ///
    /// See [`PreviewSession::set_params`].
    pub fn set_chunk_size(&mut self, size: usize) -> Result<bool> {
        let params = self.params.clone().with_size(size);
        self.set_params(params)
    }

    /// Change only the overlap.
    ///
    /// # Errors
    ///
    /// See [`PreviewSession::set_params`].
    pub fn set_chunk_overlap(&mut self, overlap: usize) -> Result<bool> {
        let params = self.params.clone().with_overlap(overlap);
        self.set_params(params)
    }

    /// Change only the delimiter.
    ///
    /// # Errors
    ///
    /// See [`PreviewSession::set_params`].
    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) -> Result<bool> {
        let params = self.params.clone().with_delimiter(delimiter);
        self.set_params(params)
    }

    /// Select a chunk for inspection and return its text.
    ///
    /// An out-of-range index clears the selection.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        self.selected = (index < self.slabs.len()).then_some(index);
        self.selected_chunk()
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Assemble the current chunks and start submitting them.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] outside `Previewing`, and
    /// [`Error::EmptyChunkSet`] when there is nothing to submit. In the
    /// latter case the session stays in `Previewing` with an error message,
    /// and the storage collaborator must not be called.
    pub fn begin_submit(&mut self) -> Result<(Ticket, SubmitRequest)> {
        if self.state != SessionState::Previewing {
            return Err(self.invalid("submit"));
        }
        let Some(document) = self.document.as_ref() else {
            return Err(self.invalid("submit"));
        };

        let request = match SubmitRequest::build(document, &self.slabs, &self.params) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "submission blocked");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let ticket = self.next_ticket(RequestKind::Submit);
        self.state = SessionState::Submitting;
        self.error = None;
        tracing::info!(
            filename = %request.filename,
            chunks = request.chunks.len(),
            generation = ticket.generation,
            "submitting chunks"
        );
        Ok((ticket, request))
    }

    /// Apply the storage collaborator's result.
    ///
    /// Failure returns to `Previewing` with chunks intact, so submitting
    /// again is a retry.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<DocumentId, SubmitError>,
    ) -> Completion {
        if !self.accepts(&ticket, RequestKind::Submit, &SessionState::Submitting) {
            tracing::warn!(generation = ticket.generation, "ignoring stale submit result");
            return Completion::Stale;
        }

        match result {
            Ok(id) => {
                tracing::info!(document_id = %id, "chunks stored");
                self.state = SessionState::Submitted(id);
            }
            Err(err) => {
                tracing::warn!(error = %err, "chunk submission failed");
                self.error = Some(err.message);
                self.state = SessionState::Previewing;
            }
        }
        Completion::Applied
    }

    /// Parse `file` with `parser` and apply the result.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] as for [`PreviewSession::begin_parse`], and
    /// [`Error::Parse`] after the session has moved to `Failed`.
    pub async fn parse_with<P>(&mut self, parser: &P, file: &SourceFile) -> Result<()>
    where
        P: DocumentParser + ?Sized,
    {
        let mut ticket = self.begin_parse(&file.filename)?;
        let Some(result) = ticket.run(parser.parse(file)).await else {
            return Err(Error::Cancelled);
        };

        let failure = result.as_ref().err().cloned();
        match (self.finish_parse(ticket, result), failure) {
            (Completion::Stale, _) => Err(Error::Cancelled),
            (Completion::Applied, Some(err)) => Err(Error::Parse(err)),
            (Completion::Applied, None) => Ok(()),
        }
    }

    /// Submit the current chunks to `store` and apply the result.
    ///
    /// # Errors
    ///
    /// Those of [`PreviewSession::begin_submit`], and [`Error::Submit`]
    /// after the session has returned to `Previewing`.
    pub async fn submit_with<S>(&mut self, store: &S) -> Result<DocumentId>
    where
        S: ChunkStore + ?Sized,
    {
        let (mut ticket, request) = self.begin_submit()?;
        let Some(result) = ticket.run(store.submit(&request)).await else {
            return Err(Error::Cancelled);
        };

        let outcome = result.clone();
        match (self.finish_submit(ticket, result), outcome) {
            (Completion::Stale, _) => Err(Error::Cancelled),
            (Completion::Applied, Ok(id)) => Ok(id),
            (Completion::Applied, Err(err)) => Err(Error::Submit(err)),
        }
    }
}
