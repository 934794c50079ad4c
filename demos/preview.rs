//! Preview Session
//!
//! Parse a file, try a few strategies while watching statistics, then submit.
//!
//! ```bash
//! RUST_LOG=docslab=debug cargo run --example preview
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use docslab::{
    ChunkStore, DocumentId, DocumentParser, ParseError, ParsedDocument, ParsedSegment,
    PreviewSession, SourceFile, Strategy, SubmitError, SubmitRequest,
};
use tracing_subscriber::EnvFilter;

/// Treats form feeds as page breaks.
struct PlainTextParser;

#[async_trait]
impl DocumentParser for PlainTextParser {
    async fn parse(&self, file: &SourceFile) -> Result<ParsedDocument, ParseError> {
        let text = std::str::from_utf8(&file.data)
            .map_err(|e| ParseError::new(format!("{}: {e}", file.filename)))?;

        Ok(ParsedDocument {
            filename: file.filename.clone(),
            file_type: "md".into(),
            file_size: file.data.len() as u64,
            segments: text
                .split('\u{c}')
                .enumerate()
                .map(|(i, page)| ParsedSegment::new(i, page).with_page(i as u32 + 1))
                .collect(),
        })
    }
}

/// Keeps submitted requests in memory.
#[derive(Default)]
struct InMemoryStore {
    documents: Mutex<Vec<SubmitRequest>>,
}

#[async_trait]
impl ChunkStore for InMemoryStore {
    async fn submit(&self, request: &SubmitRequest) -> Result<DocumentId, SubmitError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| SubmitError::new("store poisoned"))?;
        documents.push(request.clone());
        Ok(format!("doc-{}", documents.len()))
    }
}

const HANDBOOK: &str = "## Getting started\n\
Install the agent and point it at your workspace.\n\n\
It indexes every file it can parse.\n\
## Configuration\n\
Settings live in a single TOML file.\u{c}\
## Troubleshooting\n\
Most problems are permissions. Check the logs first.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let file = SourceFile::new("handbook.md", HANDBOOK.as_bytes().to_vec());
    let mut session = PreviewSession::new();
    session.parse_with(&PlainTextParser, &file).await?;

    println!("{:<10} {:>6} {:>6} {:>6} {:>6}", "strategy", "chunks", "avg", "min", "max");
    for strategy in Strategy::ALL {
        session.set_strategy(strategy)?;
        let stats = session.stats();
        println!(
            "{:<10} {:>6} {:>6} {:>6} {:>6}",
            strategy.as_str(),
            stats.total_chunks,
            stats.avg_length,
            stats.min_length,
            stats.max_length
        );
    }

    session.set_strategy(Strategy::Delimiter)?;
    if let Some(text) = session.select(1) {
        println!("\nchunk 1:\n{text}\n");
    }

    let store = InMemoryStore::default();
    let id = session.submit_with(&store).await?;
    println!("stored as {id} ({})", session.state());

    Ok(())
}
