//! Batches chunks for embedding, flushing when the batch is full.

use std::sync::Arc;

use textmill_chunker::Chunk;
use uuid::Uuid;

use crate::embedder::{EmbedError, Embedder};
use crate::pipeline::EmbeddedChunk;
use crate::retry::{retry_transient, RetryPolicy};

/// Collects chunks and embeds them in batches through an [`Embedder`],
/// retrying transient backend failures per the configured policy.
pub struct EmbeddingBatcher {
    buffer: Vec<(Uuid, Chunk)>,
    batch_size: usize,
    embedder: Arc<dyn Embedder>,
    retry: RetryPolicy,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize, retry: RetryPolicy) -> Self {
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size: batch_size.max(1),
            embedder,
            retry,
        }
    }

    /// Add a chunk to the batch. Returns embedded chunks if the batch
    /// filled up (auto-flush).
    pub async fn add(
        &mut self,
        document_id: Uuid,
        chunk: Chunk,
    ) -> Result<Option<Vec<EmbeddedChunk>>, EmbedError> {
        self.buffer.push((document_id, chunk));
        if self.buffer.len() >= self.batch_size {
            Ok(Some(self.flush().await?))
        } else {
            Ok(None)
        }
    }

    /// Force-flush remaining chunks.
    pub async fn flush(&mut self) -> Result<Vec<EmbeddedChunk>, EmbedError> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<(Uuid, Chunk)> = self.buffer.drain(..).collect();
        let texts: Vec<&str> = batch.iter().map(|(_, c)| c.text.as_str()).collect();

        let embeddings =
            retry_transient(&self.retry, || self.embedder.embed_batch(&texts)).await?;

        if embeddings.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                sent: texts.len(),
                received: embeddings.len(),
            });
        }
        let expected = self.embedder.dimensions();
        for embedding in &embeddings {
            if embedding.len() != expected {
                return Err(EmbedError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        Ok(batch
            .into_iter()
            .zip(embeddings)
            .map(|((document_id, chunk), embedding)| EmbeddedChunk {
                document_id,
                chunk,
                embedding,
            })
            .collect())
    }

    /// Number of chunks currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
