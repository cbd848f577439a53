//! Configuration for building partition maps.

use crate::error::{Error, Result};
use crate::partitioning::Algorithm;

/// Configuration for a partition map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Name of the partition map.
    pub name: String,

    /// Prefix for partition labels; partitions are labeled `<prefix>-<i>`.
    pub label_prefix: String,

    /// Number of partitions to split the digest space into.
    pub partitions: usize,

    /// Digest backing the map.
    pub algorithm: Algorithm,

    /// Seed for seeded digests (xxHash64). Ignored by the others.
    pub xxhash_seed: u64,

    /// Whether resolutions are counted.
    pub track_metrics: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            label_prefix: "partition".to_string(),
            partitions: 16,
            algorithm: Algorithm::Md5,
            xxhash_seed: 0,
            track_metrics: true,
        }
    }
}

impl PartitionConfig {
    /// Create a new configuration with the given map name and partition count.
    pub fn new(name: impl Into<String>, partitions: usize) -> Self {
        Self {
            name: name.into(),
            partitions,
            ..Default::default()
        }
    }

    /// Set the partition label prefix.
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    /// Set the number of partitions.
    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions;
        self
    }

    /// Set the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the xxHash64 seed.
    pub fn with_xxhash_seed(mut self, seed: u64) -> Self {
        self.xxhash_seed = seed;
        self
    }

    /// Enable or disable resolution metrics.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Check the configuration before building a map from it.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("map name cannot be empty".to_string()));
        }
        if self.label_prefix.trim().is_empty() {
            return Err(Error::Config("label prefix cannot be empty".to_string()));
        }
        if self.partitions <= 1 {
            return Err(Error::Config(format!(
                "partitions must be greater than 1, got {}",
                self.partitions
            )));
        }
        Ok(())
    }
}
