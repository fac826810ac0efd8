//! Chunk output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied metadata: a flat string-keyed mapping of scalar values.
pub type Metadata = BTreeMap<String, Value>;

/// Keys maintained by the chunker itself (merge bookkeeping, positional
/// fields mirrored into metadata by some callers). Excluded from
/// [`consolidate_metadata`](crate::consolidate_metadata).
pub(crate) const BOOKKEEPING_KEYS: &[&str] =
    &["chunk_index", "total_chunks", "merged", "merged_with"];

// ── Chunk output ────────────────────────────────────────────────────────────

/// A chunk of text with positional metadata for embedding and attribution.
///
/// Chunks are immutable value objects created fresh per chunking call; they
/// carry no identity beyond the batch they were emitted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position in emission order.
    pub index: usize,
    /// Number of chunks in the batch this chunk belongs to.
    pub total: usize,
    /// The chunk text content.
    pub text: String,
    /// (start, end) byte offsets of the chunk's fresh content in the
    /// original text. Chunks seeded with an overlap tail report the span of
    /// their non-overlap content; `None` when a merge absorbed a chunk
    /// whose span was unknown.
    pub span: Option<(usize, usize)>,
    /// Copy of the caller-supplied metadata. Never shared between chunks —
    /// mutating one chunk's metadata (e.g. merge tagging) cannot leak into
    /// another.
    pub metadata: Option<Metadata>,
}

impl Chunk {
    /// Length of the chunk text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
