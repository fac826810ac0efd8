//! Environment-driven ingestion configuration.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use textmill_chunker::{Chunker, ChunkerConfig, ConfigError, Strategy};

use crate::retry::RetryPolicy;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub strategy: String,
    /// Merge chunks below this size after splitting. `None` disables merging.
    pub min_chunk_size: Option<usize>,
    pub embedding_batch_size: usize,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_multiplier: f64,
    pub retry_max_delay_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            strategy: "paragraph".to_string(),
            min_chunk_size: Some(100),
            embedding_batch_size: 64,
            retry_max_attempts: 3,
            retry_initial_delay_ms: 1000,
            retry_multiplier: 2.0,
            retry_max_delay_ms: 60_000,
        }
    }
}

impl IngestConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: env_usize("CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: env_usize("CHUNK_OVERLAP", defaults.chunk_overlap),
            strategy: env_or("CHUNK_STRATEGY", &defaults.strategy),
            min_chunk_size: match env_usize("MIN_CHUNK_SIZE", 100) {
                0 => None,
                n => Some(n),
            },
            embedding_batch_size: env_usize(
                "EMBEDDING_BATCH_SIZE",
                defaults.embedding_batch_size,
            ),
            retry_max_attempts: env_u32("EMBEDDING_RETRY_ATTEMPTS", defaults.retry_max_attempts),
            retry_initial_delay_ms: env_u64(
                "EMBEDDING_RETRY_DELAY_MS",
                defaults.retry_initial_delay_ms,
            ),
            retry_multiplier: env_f64("EMBEDDING_RETRY_MULTIPLIER", defaults.retry_multiplier),
            retry_max_delay_ms: env_u64(
                "EMBEDDING_RETRY_MAX_DELAY_MS",
                defaults.retry_max_delay_ms,
            ),
        }
    }

    /// Validate the chunking knobs and build a [`Chunker`].
    pub fn chunker(&self) -> Result<Chunker, ConfigError> {
        let strategy: Strategy = self.strategy.parse()?;
        let config = ChunkerConfig::new(self.chunk_size, self.chunk_overlap, strategy)?;
        if let Some(min) = self.min_chunk_size {
            if min == 0 {
                return Err(ConfigError::ZeroMinSize);
            }
            if min > self.chunk_size {
                return Err(ConfigError::MinSizeTooLarge {
                    min,
                    size: self.chunk_size,
                });
            }
        }
        Ok(Chunker::new(config))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            multiplier: self.retry_multiplier,
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            chunk_size = self.chunk_size,
            chunk_overlap = self.chunk_overlap,
            strategy = %self.strategy,
            min_chunk_size = ?self.min_chunk_size,
            batch_size = self.embedding_batch_size,
            "ingest configuration loaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_a_chunker() {
        let config = IngestConfig::default();
        assert!(config.chunker().is_ok());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let config = IngestConfig {
            strategy: "semantic".to_string(),
            ..IngestConfig::default()
        };
        assert!(matches!(
            config.chunker(),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn min_size_above_chunk_size_is_rejected() {
        let config = IngestConfig {
            chunk_size: 100,
            chunk_overlap: 10,
            min_chunk_size: Some(500),
            ..IngestConfig::default()
        };
        assert!(matches!(
            config.chunker(),
            Err(ConfigError::MinSizeTooLarge { min: 500, size: 100 })
        ));
    }

    #[test]
    fn retry_policy_uses_millisecond_knobs() {
        let config = IngestConfig {
            retry_max_attempts: 5,
            retry_initial_delay_ms: 250,
            retry_max_delay_ms: 4000,
            ..IngestConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_millis(4000));
    }
}
