//! From segments to addressed, submission-ready chunks.
//!
//! Two steps, both pure:
//!
//! 1. [`split_document`] runs the configured strategy and returns [`Slab`]s.
//!    Statistics and previews work on these directly.
//! 2. [`assemble`] turns slabs into [`ManualChunk`]s: character offsets, an
//!    inherited page number, and self-describing metadata.
//!
//! ## Addressing
//!
//! | strategy | `start_char..end_char` | `page_number` |
//! |----------|------------------------|---------------|
//! | `page`, `length` | local to the owning segment | owning segment |
//! | `fixed`, `semantic`, `recursive` | in the joined full text | first segment |
//! | `delimiter` | absent (content is re-prefixed) | first segment |
//!
//! Whole-document chunks can span several segments, so their page number is
//! only an approximation: the first segment's page, whatever the chunk covers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    full_text, CharMap, ChunkParams, Chunker, Error, Metadata, ParsedDocument, ParsedSegment,
    Result, Slab, Strategy,
};

/// A chunk enriched with addressing, ready for the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualChunk {
    /// Chunk text.
    pub content: String,
    /// Page number inherited from a segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// First character, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_char: Option<usize>,
    /// Last character, exclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_char: Option<usize>,
    /// Inherited segment metadata plus `chunk_index` and `chunking`.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Everything the storage collaborator needs to create a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Original file name.
    pub filename: String,
    /// File type reported by the parser.
    pub file_type: String,
    /// Uploaded size in bytes.
    pub file_size: u64,
    /// The chunks, in order.
    pub chunks: Vec<ManualChunk>,
    /// Document-level metadata: the chunking parameters.
    pub metadata: Metadata,
}

impl SubmitRequest {
    /// Assemble a request from a parsed document and its current slabs.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyChunkSet`] when there is nothing to submit.
    pub fn build(document: &ParsedDocument, slabs: &[Slab], params: &ChunkParams) -> Result<Self> {
        let chunks = assemble(&document.segments, slabs, params);
        if chunks.is_empty() {
            return Err(Error::EmptyChunkSet);
        }

        Ok(Self {
            filename: document.filename.clone(),
            file_type: document.file_type.clone(),
            file_size: document.file_size,
            chunks,
            metadata: params_metadata(params),
        })
    }
}

/// Run `params.strategy` over `segments`.
///
/// Per-segment strategies tag each slab with the position of its segment in
/// `segments`; whole-document strategies cut the [`full_text`].
#[must_use]
pub fn split_document(segments: &[ParsedSegment], params: &ChunkParams) -> Vec<Slab> {
    let slabs = match params.strategy {
        Strategy::Page => segments
            .iter()
            .enumerate()
            .map(|(i, seg)| Slab::new(&seg.content, 0, seg.content.len(), i).in_segment(i))
            .collect(),
        Strategy::Length => {
            let window = params.window();
            let mut slabs = Vec::new();
            for (i, seg) in segments.iter().enumerate() {
                for mut slab in window.chunk(&seg.content) {
                    slab.index = slabs.len();
                    slabs.push(slab.in_segment(i));
                }
            }
            slabs
        }
        Strategy::Fixed | Strategy::Delimiter | Strategy::Paragraph | Strategy::Recursive => params
            .chunker()
            .map(|chunker| chunker.chunk(&full_text(segments)))
            .unwrap_or_default(),
    };

    tracing::debug!(
        strategy = %params.strategy,
        segments = segments.len(),
        chunks = slabs.len(),
        "split document"
    );
    slabs
}

/// Address `slabs` produced by [`split_document`] with the same `params`.
///
/// Every chunk's metadata carries `chunk_index` (its position in the output)
/// and `chunking` (strategy and parameters).
#[must_use]
pub fn assemble(segments: &[ParsedSegment], slabs: &[Slab], params: &ChunkParams) -> Vec<ManualChunk> {
    let chunking = Value::Object(params_metadata(params));
    let first = segments.first();
    let empty = Metadata::new();

    let full_map = if params.strategy.is_per_segment() || params.strategy == Strategy::Delimiter {
        None
    } else {
        Some(CharMap::new(&full_text(segments)))
    };
    let mut segment_map: Option<(usize, CharMap)> = None;

    slabs
        .iter()
        .enumerate()
        .map(|(position, slab)| {
            let owner = slab.segment.and_then(|i| segments.get(i).map(|seg| (i, seg)));

            let (page_number, base_metadata, range) = match owner {
                Some((i, seg)) => {
                    if segment_map.as_ref().map_or(true, |(cached, _)| *cached != i) {
                        segment_map = Some((i, CharMap::new(&seg.content)));
                    }
                    let range = segment_map
                        .as_ref()
                        .map(|(_, map)| (map.char_of(slab.start), map.char_of(slab.end)));
                    (seg.page_number, &seg.metadata, range)
                }
                None => {
                    let range = full_map
                        .as_ref()
                        .map(|map| (map.char_of(slab.start), map.char_of(slab.end)));
                    (
                        first.and_then(|seg| seg.page_number),
                        first.map_or(&empty, |seg| &seg.metadata),
                        range,
                    )
                }
            };

            let mut metadata = base_metadata.clone();
            metadata.insert("chunk_index".to_string(), position.into());
            metadata.insert("chunking".to_string(), chunking.clone());

            ManualChunk {
                content: slab.text.clone(),
                page_number,
                start_char: range.map(|(start, _)| start),
                end_char: range.map(|(_, end)| end),
                metadata,
            }
        })
        .collect()
}

/// The active strategy and its parameters, as persisted metadata.
#[must_use]
pub fn params_metadata(params: &ChunkParams) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("strategy".to_string(), params.strategy.as_str().into());
    metadata.insert("chunkSize".to_string(), params.chunk_size.into());
    metadata.insert("chunkOverlap".to_string(), params.chunk_overlap.into());
    metadata.insert("delimiter".to_string(), params.delimiter.clone().into());
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<ParsedSegment> {
        vec![
            ParsedSegment::new(0, "Page one text.")
                .with_page(1)
                .with_metadata("source", "a.pdf"),
            ParsedSegment::new(1, "").with_page(2),
            ParsedSegment::new(2, "Page three.").with_page(3),
        ]
    }

    #[test]
    fn test_page_mode_one_chunk_per_segment() {
        let segments = pages();
        let params = ChunkParams::new(Strategy::Page);
        let slabs = split_document(&segments, &params);
        let chunks = assemble(&segments, &slabs, &params);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, "");
        assert_eq!(chunks[2].page_number, Some(3));
        assert_eq!(chunks[2].start_char, Some(0));
        assert_eq!(chunks[2].end_char, Some(11));
        assert_eq!(chunks[0].metadata["source"], "a.pdf");
        assert_eq!(chunks[2].metadata["chunk_index"], 2);
    }

    #[test]
    fn test_length_mode_offsets_are_segment_local() {
        let segments = pages();
        let params = ChunkParams::new(Strategy::Length).with_size(8).with_overlap(2);
        let slabs = split_document(&segments, &params);
        let chunks = assemble(&segments, &slabs, &params);

        // "Page one text." (14) -> [0,8) [6,14); empty page skipped; "Page three." (11) -> [0,8) [6,11)
        let spans: Vec<_> = chunks
            .iter()
            .map(|c| (c.page_number, c.start_char, c.end_char))
            .collect();
        assert_eq!(
            spans,
            vec![
                (Some(1), Some(0), Some(8)),
                (Some(1), Some(6), Some(14)),
                (Some(3), Some(0), Some(8)),
                (Some(3), Some(6), Some(11)),
            ]
        );
        let indices: Vec<_> = chunks.iter().map(|c| c.metadata["chunk_index"].clone()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_whole_document_uses_first_page() {
        let segments = pages();
        let params = ChunkParams::new(Strategy::Fixed).with_size(10).with_overlap(0);
        let slabs = split_document(&segments, &params);
        let chunks = assemble(&segments, &slabs, &params);

        assert!(chunks.iter().all(|c| c.page_number == Some(1)));
        assert_eq!(chunks[1].start_char, Some(10));
        assert_eq!(chunks[0].metadata["chunking"]["strategy"], "fixed");
        assert_eq!(chunks[0].metadata["chunking"]["chunkSize"], 10);
    }

    #[test]
    fn test_full_text_offsets_count_characters() {
        let segments = vec![ParsedSegment::new(0, "日本語\n\nテキスト")];
        let params = ChunkParams::new(Strategy::Paragraph);
        let slabs = split_document(&segments, &params);
        let chunks = assemble(&segments, &slabs, &params);

        assert_eq!(chunks[1].content, "テキスト");
        assert_eq!(chunks[1].start_char, Some(5));
        assert_eq!(chunks[1].end_char, Some(9));
    }

    #[test]
    fn test_delimiter_chunks_have_no_offsets() {
        let segments = vec![ParsedSegment::new(0, "## A\nx\n## B\ny").with_page(4)];
        let params = ChunkParams::new(Strategy::Delimiter);
        let slabs = split_document(&segments, &params);
        let chunks = assemble(&segments, &slabs, &params);

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.start_char.is_none() && c.end_char.is_none()));
        assert!(chunks.iter().all(|c| c.page_number == Some(4)));
    }

    #[test]
    fn test_no_segments() {
        for strategy in Strategy::ALL {
            let params = ChunkParams::new(strategy);
            assert!(split_document(&[], &params).is_empty(), "{strategy}");
        }
    }

    #[test]
    fn test_submit_request_rejects_empty() {
        let document = ParsedDocument {
            filename: "empty.txt".into(),
            file_type: "txt".into(),
            file_size: 0,
            segments: vec![ParsedSegment::new(0, "")],
        };
        let params = ChunkParams::default();
        let slabs = split_document(&document.segments, &params);
        assert!(matches!(
            SubmitRequest::build(&document, &slabs, &params),
            Err(Error::EmptyChunkSet)
        ));
    }

    #[test]
    fn test_submit_request_serializes_snake_case() {
        let document = ParsedDocument {
            filename: "a.md".into(),
            file_type: "md".into(),
            file_size: 12,
            segments: vec![ParsedSegment::new(0, "hello world")],
        };
        let params = ChunkParams::default();
        let slabs = split_document(&document.segments, &params);
        let request = SubmitRequest::build(&document, &slabs, &params).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["file_type"], "md");
        assert_eq!(json["chunks"][0]["start_char"], 0);
        assert_eq!(json["chunks"][0]["end_char"], 11);
        assert!(json["chunks"][0].get("page_number").is_none());
        assert_eq!(json["metadata"]["strategy"], "fixed");
    }
}
