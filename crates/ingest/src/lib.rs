//! Ingestion orchestration around the chunking engine.
//!
//! Owns the collaborator seams — where documents come from and where chunk
//! embeddings go — plus the retry/backoff policy and the batched
//! chunk-then-embed pipeline. All heavy lifting (OCR, LLMs, vector stores)
//! stays behind the [`DocumentSource`] and [`Embedder`] traits.

pub mod batcher;
pub mod config;
pub mod embedder;
pub mod pipeline;
pub mod retry;
pub mod source;

pub use batcher::EmbeddingBatcher;
pub use config::IngestConfig;
pub use embedder::{EmbedError, Embedder};
pub use pipeline::{EmbeddedChunk, IngestOutcome, Pipeline, PipelineError};
pub use retry::{retry_transient, RetryPolicy, Transient};
pub use source::{DocumentSource, ExtractedText, SourceDescriptor, SourceError};
