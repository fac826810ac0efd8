//! The chunking engine: strategy dispatch, chunk wrapping, merging, and
//! metadata consolidation.

use serde_json::Value;
use thiserror::Error;

use crate::config::{ChunkerConfig, ConfigError};
use crate::strategies::Segment;
use crate::types::{Chunk, Metadata, BOOKKEEPING_KEYS};

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk index {index} out of range (have {len} chunks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ── Chunker ─────────────────────────────────────────────────────────────────

/// Splits input text into ordered, size-bounded, overlapping chunks.
///
/// Pure and synchronous: no I/O, no shared mutable state. The configuration
/// is read-only after construction, so one `Chunker` can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `text` into chunks using the configured strategy.
    ///
    /// Empty or whitespace-only input yields an empty vec — upstream
    /// documents may legitimately contain no extractable text, so this is
    /// tolerance, not an error. Metadata is copied into every chunk
    /// (copy-on-attach); chunks never share a metadata instance.
    pub fn chunk(&self, text: &str, metadata: Option<&Metadata>) -> Vec<Chunk> {
        if text.trim().is_empty() {
            tracing::warn!("empty text provided for chunking");
            return Vec::new();
        }

        let mut segments = (self.config.strategy().split_fn())(text, &self.config);

        // Degenerate strategy-internal states (no units found) resolve to
        // the whole text as a single chunk rather than losing content.
        if segments.is_empty() {
            let trimmed = text.trim();
            let lead = text.len() - text.trim_start().len();
            segments = vec![Segment {
                text: trimmed.to_string(),
                start: lead,
                end: lead + trimmed.len(),
            }];
        }

        let total = segments.len();
        let chunks: Vec<Chunk> = segments
            .into_iter()
            .enumerate()
            .map(|(index, seg)| Chunk {
                index,
                total,
                text: seg.text,
                span: Some((seg.start, seg.end)),
                metadata: metadata.cloned(),
            })
            .collect();

        tracing::info!(
            chunks = total,
            strategy = %self.config.strategy(),
            "split text into chunks"
        );
        chunks
    }

    /// Merge chunks smaller than `min_size` bytes into their successor.
    ///
    /// Linear accumulator scan: while the accumulator's text is below
    /// `min_size`, the next chunk is absorbed (joined with `\n`) and the
    /// accumulator's metadata is tagged `merged: true` with the absorbed
    /// chunk's original index appended to `merged_with`. Note the check is
    /// on the accumulator only — a large chunk can still be absorbed into a
    /// too-small accumulator, but a small chunk never pulls in a large
    /// predecessor. Indices and totals are renumbered afterwards.
    ///
    /// Requires `0 < min_size <= chunk_size`.
    pub fn merge_small(
        &self,
        chunks: Vec<Chunk>,
        min_size: usize,
    ) -> Result<Vec<Chunk>, ConfigError> {
        if min_size == 0 {
            return Err(ConfigError::ZeroMinSize);
        }
        if min_size > self.config.chunk_size() {
            return Err(ConfigError::MinSizeTooLarge {
                min: min_size,
                size: self.config.chunk_size(),
            });
        }
        if chunks.is_empty() {
            return Ok(chunks);
        }

        let original = chunks.len();
        let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());
        let mut acc: Option<Chunk> = None;

        for chunk in chunks {
            let Some(mut current) = acc.take() else {
                acc = Some(chunk);
                continue;
            };

            if current.len() < min_size {
                current.text.push('\n');
                current.text.push_str(&chunk.text);
                current.span = match (current.span, chunk.span) {
                    (Some((start, _)), Some((_, end))) => Some((start, end)),
                    _ => None,
                };
                tag_merged(&mut current, chunk.index);
                acc = Some(current);
            } else {
                merged.push(current);
                acc = Some(chunk);
            }
        }
        if let Some(last) = acc {
            merged.push(last);
        }

        let total = merged.len();
        for (index, chunk) in merged.iter_mut().enumerate() {
            chunk.index = index;
            chunk.total = total;
        }

        tracing::info!(original, merged = total, "merged small chunks");
        Ok(merged)
    }

    /// Build a chunk carrying the target's text plus up to `window`
    /// neighbouring chunks on each side, wrapped in explicit context
    /// markers, for feeding an LLM that benefits from surrounding context
    /// without re-embedding it.
    ///
    /// An out-of-range `index` is a caller bug and reported as an error,
    /// never clamped.
    pub fn context_window(
        &self,
        chunks: &[Chunk],
        index: usize,
        window: usize,
    ) -> Result<Chunk, ChunkError> {
        if index >= chunks.len() {
            return Err(ChunkError::IndexOutOfRange {
                index,
                len: chunks.len(),
            });
        }

        let target = &chunks[index];
        let first = index.saturating_sub(window);
        let last = (index + window).min(chunks.len() - 1);

        let before: Vec<&str> = chunks[first..index].iter().map(|c| c.text.as_str()).collect();
        let after: Vec<&str> = chunks[index + 1..=last]
            .iter()
            .map(|c| c.text.as_str())
            .collect();

        let mut text = String::new();
        if !before.is_empty() {
            text.push_str("[CONTEXT_BEFORE] ");
            text.push_str(&before.join(" "));
            text.push_str(" [/CONTEXT_BEFORE]\n\n");
        }
        text.push_str(&target.text);
        if !after.is_empty() {
            text.push_str("\n\n[CONTEXT_AFTER] ");
            text.push_str(&after.join(" "));
            text.push_str(" [/CONTEXT_AFTER]");
        }

        let mut metadata = target.metadata.clone().unwrap_or_default();
        metadata.insert(
            "has_context".to_string(),
            Value::Bool(!before.is_empty() || !after.is_empty()),
        );
        metadata.insert("context_window".to_string(), Value::from(window));
        metadata.insert(
            "context_chunks_before".to_string(),
            Value::Array((first..index).map(Value::from).collect()),
        );
        metadata.insert(
            "context_chunks_after".to_string(),
            Value::Array((index + 1..=last).map(Value::from).collect()),
        );

        Ok(Chunk {
            index: target.index,
            total: target.total,
            text,
            span: target.span,
            metadata: Some(metadata),
        })
    }
}

fn tag_merged(chunk: &mut Chunk, absorbed_index: usize) {
    let meta = chunk.metadata.get_or_insert_with(Metadata::new);
    meta.insert("merged".to_string(), Value::Bool(true));
    match meta.get_mut("merged_with") {
        Some(Value::Array(list)) => list.push(Value::from(absorbed_index)),
        _ => {
            meta.insert(
                "merged_with".to_string(),
                Value::Array(vec![Value::from(absorbed_index)]),
            );
        }
    }
}

// ── Metadata consolidation ──────────────────────────────────────────────────

/// Merge per-chunk metadata into one mapping. Keys with a consistent value
/// across chunks stay scalar; divergent keys become an array of the
/// distinct values in order of first appearance. Chunk-local bookkeeping
/// keys are excluded.
pub fn consolidate_metadata(chunks: &[Chunk]) -> Metadata {
    let mut consolidated = Metadata::new();

    for chunk in chunks {
        let Some(meta) = &chunk.metadata else {
            continue;
        };
        for (key, value) in meta {
            if BOOKKEEPING_KEYS.contains(&key.as_str()) {
                continue;
            }
            match consolidated.get_mut(key) {
                None => {
                    consolidated.insert(key.clone(), value.clone());
                }
                Some(Value::Array(list)) => {
                    if !list.contains(value) {
                        list.push(value.clone());
                    }
                }
                Some(existing) if existing != value => {
                    let previous = existing.take();
                    *existing = Value::Array(vec![previous, value.clone()]);
                }
                Some(_) => {}
            }
        }
    }
    consolidated
}
