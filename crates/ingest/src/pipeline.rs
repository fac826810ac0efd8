//! Fetch → chunk → embed orchestration.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use textmill_chunker::{Chunk, Chunker, ConfigError};

use crate::batcher::EmbeddingBatcher;
use crate::config::IngestConfig;
use crate::embedder::{EmbedError, Embedder};
use crate::retry::RetryPolicy;
use crate::source::{DocumentSource, SourceDescriptor, SourceError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A chunk paired with its embedding vector, ready for storage.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub document_id: Uuid,
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Result of ingesting one document.
#[derive(Debug)]
pub struct IngestOutcome {
    pub document_id: Uuid,
    pub chunks: Vec<EmbeddedChunk>,
}

/// End-to-end ingestion: fetch a document, chunk it, merge undersized
/// chunks, and embed everything in batches.
pub struct Pipeline {
    chunker: Chunker,
    min_chunk_size: Option<usize>,
    source: Arc<dyn DocumentSource>,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(
        config: &IngestConfig,
        source: Arc<dyn DocumentSource>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            chunker: config.chunker()?,
            min_chunk_size: config.min_chunk_size,
            source,
            embedder,
            batch_size: config.embedding_batch_size,
            retry: config.retry_policy(),
        })
    }

    /// Ingest one document. Empty or whitespace-only documents produce an
    /// outcome with no chunks rather than an error.
    pub async fn ingest(
        &self,
        descriptor: &SourceDescriptor,
    ) -> Result<IngestOutcome, PipelineError> {
        let document_id = Uuid::new_v4();
        let extracted = self.source.fetch(descriptor).await?;

        let metadata = extracted.base_metadata();
        let mut chunks = self.chunker.chunk(&extracted.text, Some(&metadata));
        if chunks.is_empty() {
            tracing::warn!(
                document_id = %document_id,
                mime_type = %extracted.mime_type,
                "document produced no chunks, skipping embedding"
            );
            return Ok(IngestOutcome {
                document_id,
                chunks: Vec::new(),
            });
        }

        if let Some(min_size) = self.min_chunk_size {
            chunks = self.chunker.merge_small(chunks, min_size)?;
        }

        let chunk_count = chunks.len();
        let mut batcher =
            EmbeddingBatcher::new(self.embedder.clone(), self.batch_size, self.retry.clone());
        let mut embedded = Vec::with_capacity(chunk_count);
        for chunk in chunks {
            if let Some(flushed) = batcher.add(document_id, chunk).await? {
                embedded.extend(flushed);
            }
        }
        embedded.extend(batcher.flush().await?);

        tracing::info!(
            document_id = %document_id,
            chunks = chunk_count,
            size_bytes = extracted.size_bytes,
            mime_type = %extracted.mime_type,
            "document ingested"
        );

        Ok(IngestOutcome {
            document_id,
            chunks: embedded,
        })
    }
}
