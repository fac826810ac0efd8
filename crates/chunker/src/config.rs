//! Chunker configuration and validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("chunk_size must be positive")]
    ZeroChunkSize,

    #[error("chunk_overlap ({overlap}) must be less than chunk_size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },

    #[error("unknown chunk strategy: {0} (expected paragraph, sentence, fixed, or token)")]
    UnknownStrategy(String),

    #[error("min_chunk_size must be positive")]
    ZeroMinSize,

    #[error("min_chunk_size ({min}) must not exceed chunk_size ({size})")]
    MinSizeTooLarge { min: usize, size: usize },
}

// ── Strategy ────────────────────────────────────────────────────────────────

/// Splitting strategy for the chunking engine.
///
/// The `token` strategy is a character-length approximation over whitespace
/// words, not a real subword tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Split on blank-line boundaries, greedily packing paragraphs.
    Paragraph,
    /// Split on terminal punctuation followed by whitespace.
    Sentence,
    /// Fixed-width character windows, backtracking to whitespace.
    Fixed,
    /// Word windows sized from an estimated mean word length.
    Token,
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paragraph" => Ok(Strategy::Paragraph),
            "sentence" => Ok(Strategy::Sentence),
            "fixed" => Ok(Strategy::Fixed),
            "token" => Ok(Strategy::Token),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Paragraph => "paragraph",
            Strategy::Sentence => "sentence",
            Strategy::Fixed => "fixed",
            Strategy::Token => "token",
        };
        f.write_str(name)
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Validated chunking configuration.
///
/// Sizes are measured in bytes of UTF-8 text; chunk boundaries always fall
/// on `char` boundaries. `chunk_overlap` is defined in characters for every
/// strategy: `fixed` realizes it exactly, `paragraph`/`sentence` take the
/// word tail of the closed chunk (assuming ~5 characters per word), and
/// `token` converts the budget through the estimated mean word length.
///
/// Invalid combinations are rejected at construction, never at call time.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    strategy: Strategy,
}

impl ChunkerConfig {
    /// Build a validated configuration.
    ///
    /// Requires `chunk_size > 0` and `chunk_overlap < chunk_size`.
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        strategy: Strategy,
    ) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if chunk_overlap >= chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap: chunk_overlap,
                size: chunk_size,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            strategy,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl Default for ChunkerConfig {
    /// 1000-byte chunks, 200-byte overlap, paragraph strategy.
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            strategy: Strategy::Paragraph,
        }
    }
}
