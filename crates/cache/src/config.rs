use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_capacity() -> usize {
    100_000
}

fn default_shard_count() -> usize {
    4096
}

/// Cache tuning knobs, typically deserialized from the resolver's config
/// file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Total number of entries across all shards. Per-shard capacity is
    /// `capacity / shard_count`, at least one entry per shard.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Number of independently-locked shards. Clamped to `capacity` so a
    /// tiny cache does not end up with more shards than entries.
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Maintain hit/miss/add/eviction counters. Off by default to keep
    /// the hot path free of atomic traffic when nobody reads them.
    #[serde(default)]
    pub capture_statistics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            shard_count: default_shard_count(),
            capture_statistics: false,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), CacheConfigError> {
        if self.capacity == 0 {
            return Err(CacheConfigError::ZeroCapacity);
        }
        if self.shard_count == 0 {
            return Err(CacheConfigError::ZeroShardCount);
        }
        Ok(())
    }

    /// Shard count actually used: never more shards than entries.
    pub fn effective_shard_count(&self) -> usize {
        self.shard_count.min(self.capacity).max(1)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheConfigError {
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    #[error("cache shard count must be greater than zero")]
    ZeroShardCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 100_000);
        assert_eq!(config.shard_count, 4096);
        assert!(!config.capture_statistics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = CacheConfig::default();
        config.capacity = 0;
        assert_eq!(config.validate(), Err(CacheConfigError::ZeroCapacity));

        config.capacity = 10;
        config.shard_count = 0;
        assert_eq!(config.validate(), Err(CacheConfigError::ZeroShardCount));
    }

    #[test]
    fn test_shard_clamping() {
        let config = CacheConfig {
            capacity: 16,
            shard_count: 4096,
            capture_statistics: false,
        };
        assert_eq!(config.effective_shard_count(), 16);
    }
}
