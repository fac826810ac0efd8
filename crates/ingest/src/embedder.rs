//! Downstream embedding collaborator contract.

use async_trait::async_trait;
use thiserror::Error;

use crate::retry::Transient;

#[derive(Debug, Error)]
pub enum EmbedError {
    /// Temporary failure (rate limit, timeout, overloaded backend) —
    /// eligible for retry.
    #[error("transient embedding failure: {0}")]
    Transient(String),

    /// Permanent backend rejection (bad request, auth, quota).
    #[error("embedding API error: {0}")]
    Api(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Backend returned a different number of vectors than texts sent.
    #[error("embedding count mismatch: sent {sent}, received {received}")]
    CountMismatch { sent: usize, received: usize },
}

impl Transient for EmbedError {
    fn is_transient(&self) -> bool {
        matches!(self, EmbedError::Transient(_))
    }
}

/// Trait for embedding backends (Vertex AI, OpenAI, Ollama, ONNX, etc.).
///
/// Implementations are thin vendor clients and live outside this workspace;
/// tests use in-process fakes.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;
}
