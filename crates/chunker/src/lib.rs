//! Text chunking engine.
//!
//! Splits document text into ordered, size-bounded, overlapping chunks
//! suitable for independent embedding, with a selectable strategy
//! (paragraph, sentence, fixed-width, or approximate-token), small-chunk
//! merging, context-window assembly, and metadata consolidation.
//!
//! The engine is pure and synchronous — document acquisition and embedding
//! live upstream/downstream of this crate.

mod config;
mod engine;
mod helpers;
mod strategies;
mod types;

pub use config::{ChunkerConfig, ConfigError, Strategy};
pub use engine::{consolidate_metadata, ChunkError, Chunker};
pub use types::{Chunk, Metadata};
