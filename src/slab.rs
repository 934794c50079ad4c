//! The Slab type: a chunk of text with position metadata.

/// A chunk of text with its position in the text it was cut from.
///
/// ## Byte Offsets
///
/// `start` and `end` are byte offsets, not character indices. This matches
/// Rust's string slicing semantics:
///
/// ```rust
/// use docslab::Slab;
///
/// let text = "Hello, world!";
/// let slab = Slab::new("world", 7, 12, 0);
///
/// assert_eq!(&text[slab.start..slab.end], "world");
/// assert_eq!(slab.char_len(), 5);
/// ```
///
/// Whole-document strategies measure offsets against the joined full text
/// (see [`crate::full_text`]). Per-segment strategies set [`Slab::segment`]
/// and measure against that segment's content instead.
///
/// ## Overlap Handling
///
/// When chunks overlap, adjacent slabs share some text:
///
/// ```text
/// Original: "The quick brown fox"
/// Slab 0:   "The quick b"     [0..11]
/// Slab 1:   "ck brown fox"    [8..19]  <- overlaps with slab 0
///                ^
///            overlap region [8..11]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    /// The chunk text.
    pub text: String,
    /// Byte offset where this chunk starts in its source.
    pub start: usize,
    /// Byte offset where this chunk ends (exclusive) in its source.
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// Owning segment, for chunks cut from a single segment.
    pub segment: Option<usize>,
}

impl Slab {
    /// Create a new slab over the full text.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
            segment: None,
        }
    }

    /// Attach the owning segment index.
    #[must_use]
    pub fn in_segment(mut self, segment: usize) -> Self {
        self.segment = Some(segment);
        self
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// The length of this chunk in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The byte span of this chunk in its source.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for Slab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Slab {{ index: {}, span: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.char_len()
        )
    }
}
