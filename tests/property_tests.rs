//! Property-based tests for text chunking.
//!
//! These tests verify that chunking strategies maintain key invariants:
//! - Window arithmetic: consecutive fixed windows start `overlap` before the
//!   previous end, and the last window ends at the text length
//! - Termination: any size and overlap, including `overlap >= size`
//! - Round trips: overlaps removed, windows rebuild the text
//! - Recursive overlap: repeated text never exceeds the configured overlap
//! - Stats: sums and orderings hold for every chunk set
//! - Idempotence: same input, same output

use proptest::prelude::*;
use docslab::{
    split_document, CharMap, ChunkParams, ChunkStats, Chunker, DelimiterChunker, FixedChunker,
    ParagraphChunker, ParsedSegment, RecursiveChunker, Slab, Strategy as ChunkStrategy,
};

// =============================================================================
// Test Generators
// =============================================================================

/// Generate a non-empty string for chunking, multibyte characters included
fn arbitrary_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("(.|\n){1,400}").unwrap()
}

/// Generate Markdown-ish text with `## ` sections
fn sectioned_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop::string::string_regex("[A-Za-z ]{0,12}").unwrap(),
            prop::string::string_regex("[a-z\n ]{0,40}").unwrap(),
        ),
        0..8,
    )
    .prop_map(|sections| {
        sections
            .into_iter()
            .map(|(title, body)| format!("## {title}\n{body}"))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn arbitrary_params() -> impl Strategy<Value = ChunkParams> {
    (
        prop::sample::select(ChunkStrategy::ALL.to_vec()),
        1usize..60,
        0usize..80,
        prop::sample::select(vec!["## ", "\n", "|", ""]),
    )
        .prop_map(|(strategy, size, overlap, delimiter)| {
            ChunkParams::new(strategy)
                .with_size(size)
                .with_overlap(overlap)
                .with_delimiter(delimiter)
        })
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Character windows of the slabs
fn char_windows(slabs: &[Slab], text: &str) -> Vec<(usize, usize)> {
    let map = CharMap::new(text);
    slabs
        .iter()
        .map(|s| (map.char_of(s.start), map.char_of(s.end)))
        .collect()
}

/// Check that chunk text matches the source
fn chunk_text_matches(slabs: &[Slab], text: &str) -> bool {
    slabs.iter().all(|slab| text[slab.span()] == slab.text)
}

// =============================================================================
// FixedChunker Tests
// =============================================================================

proptest! {
    #[test]
    fn fixed_windows_step_by_size_minus_overlap(
        text in arbitrary_text(),
        size in 2usize..60,
        overlap in 0usize..60,
    ) {
        let overlap = overlap.min(size - 1);
        let slabs = FixedChunker::new(size, overlap).chunk(&text);
        let windows = char_windows(&slabs, &text);
        let len = text.chars().count();

        prop_assert_eq!(windows.first().map(|w| w.0), Some(0));
        prop_assert_eq!(windows.last().map(|w| w.1), Some(len));
        for pair in windows.windows(2) {
            prop_assert_eq!(pair[1].0, pair[0].1 - overlap);
            prop_assert_eq!(pair[0].1 - pair[0].0, size);
        }
    }

    #[test]
    fn fixed_rebuilds_text_without_overlaps(
        text in arbitrary_text(),
        size in 2usize..60,
        overlap in 0usize..60,
    ) {
        let overlap = overlap.min(size - 1);
        let slabs = FixedChunker::new(size, overlap).chunk(&text);

        let mut rebuilt = String::new();
        let mut covered = 0;
        for slab in &slabs {
            rebuilt.push_str(&text[slab.start.max(covered)..slab.end]);
            covered = slab.end;
        }
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn fixed_terminates_for_any_overlap(
        text in arbitrary_text(),
        size in 1usize..40,
        overlap in 0usize..200,
    ) {
        let slabs = FixedChunker::new(size, overlap).chunk(&text);
        let len = text.chars().count();
        let step = if overlap < size { size - overlap } else { size };

        prop_assert!(slabs.len() <= len.div_ceil(step).max(1));
        prop_assert!(chunk_text_matches(&slabs, &text));
        for pair in slabs.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }
}

// =============================================================================
// DelimiterChunker Tests
// =============================================================================

proptest! {
    #[test]
    fn delimiter_round_trip(text in sectioned_text()) {
        let slabs = DelimiterChunker::new("## ").chunk(&text);

        let bodies: Vec<&str> = slabs
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if i == 0 && !text.starts_with("## ") {
                    s.text.as_str()
                } else {
                    s.text.strip_prefix("## ").unwrap_or(s.text.as_str())
                }
            })
            .collect();

        let expected: Vec<&str> = text
            .split("## ")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        prop_assert_eq!(bodies, expected);
    }

    #[test]
    fn delimiter_chunks_are_trimmed_and_non_empty(text in sectioned_text()) {
        for slab in DelimiterChunker::new("## ").chunk(&text) {
            prop_assert!(!slab.text.trim().is_empty());
            prop_assert_eq!(slab.text.trim_end(), slab.text.as_str());
        }
    }
}

// =============================================================================
// Paragraph and Recursive Tests
// =============================================================================

proptest! {
    #[test]
    fn paragraphs_never_contain_blank_lines(text in arbitrary_text()) {
        let slabs = ParagraphChunker.chunk(&text);
        prop_assert!(chunk_text_matches(&slabs, &text));
        for slab in &slabs {
            prop_assert!(!slab.text.contains("\n\n"));
            prop_assert!(!slab.is_empty());
        }
    }

    #[test]
    fn recursive_respects_max_size_and_rebuilds(
        text in arbitrary_text(),
        size in 1usize..80,
    ) {
        let slabs = RecursiveChunker::with_defaults(size).chunk(&text);
        let rebuilt: String = slabs.iter().map(|s| s.text.as_str()).collect();

        prop_assert_eq!(rebuilt, text.clone());
        prop_assert!(chunk_text_matches(&slabs, &text));
        for slab in &slabs {
            prop_assert!(slab.char_len() <= size);
        }
    }
}

proptest! {
    #[test]
    fn recursive_overlap_is_bounded(
        text in arbitrary_text(),
        size in 1usize..80,
        overlap in 0usize..100,
    ) {
        let slabs = RecursiveChunker::with_defaults(size).with_overlap(overlap).chunk(&text);
        let windows = char_windows(&slabs, &text);
        prop_assert!(chunk_text_matches(&slabs, &text));

        for slab in &slabs {
            prop_assert!(slab.char_len() <= size);
        }
        for pair in windows.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0);
            prop_assert!(pair[0].1 < pair[1].1);
            prop_assert!(pair[0].1.saturating_sub(pair[1].0) <= overlap);
            prop_assert!(pair[1].0 <= pair[0].1);
        }

        // Dropping the repeated prefixes gives back the text
        let mut rebuilt = String::new();
        let mut covered = 0;
        for slab in &slabs {
            rebuilt.push_str(&text[slab.start.max(covered)..slab.end]);
            covered = slab.end;
        }
        prop_assert_eq!(rebuilt, text);
    }
}

// =============================================================================
// Stats and Determinism
// =============================================================================

proptest! {
    #[test]
    fn stats_invariants(text in arbitrary_text(), params in arbitrary_params()) {
        let segments = vec![ParsedSegment::new(0, text)];
        let slabs = split_document(&segments, &params);
        let stats = ChunkStats::from_slabs(&slabs);

        let sum: usize = slabs.iter().map(Slab::char_len).sum();
        prop_assert_eq!(stats.total_chars, sum);
        prop_assert_eq!(stats.total_chunks, slabs.len());
        if slabs.is_empty() {
            prop_assert_eq!(stats, ChunkStats::default());
        } else {
            prop_assert!(stats.min_length <= stats.avg_length);
            prop_assert!(stats.avg_length <= stats.max_length);
        }
    }

    #[test]
    fn strategies_are_idempotent(
        pages in prop::collection::vec(arbitrary_text(), 0..4),
        params in arbitrary_params(),
    ) {
        let segments: Vec<_> = pages
            .into_iter()
            .enumerate()
            .map(|(i, content)| ParsedSegment::new(i, content).with_page(i as u32 + 1))
            .collect();

        prop_assert_eq!(
            split_document(&segments, &params),
            split_document(&segments, &params)
        );
    }
}
