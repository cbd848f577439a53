//! Range partitioning over digest output spaces.
//!
//! This crate splits the full output range of a digest function into
//! contiguous, labeled ranges and resolves byte-string keys to the range that
//! contains their digest. It is the building block behind range-based
//! sharding: routing keys to shard owners, bucketing work across workers, or
//! assigning ranges to storage nodes.
//!
//! - **Exact splits**: ranges are computed with arbitrary-precision integers
//!   and tile the digest space with no gaps or overlaps
//! - **Pluggable digests**: MD5, SHA-256, SHA-512 and xxHash64 built in, any
//!   [`DigestSpace`] implementation accepted
//! - **Thread-safe lookups**: once built, a map is immutable and resolves keys
//!   from any number of threads
//!
//! # Example
//!
//! ```rust
//! use rangeshard::{PartitionConfig, PartitionMap};
//! use rangeshard::partitioning::Algorithm;
//!
//! let config = PartitionConfig::new("key_store", 100)
//!     .with_label_prefix("partition")
//!     .with_algorithm(Algorithm::Sha256);
//! let map = PartitionMap::from_config(&config)?;
//!
//! let owner = map.resolve(b"user:123")?;
//! println!("user:123 -> {}", owner);
//!
//! // Same key, same partition.
//! assert_eq!(map.resolve(b"user:123")?, owner);
//!
//! // Serialize with hex bounds, rebuild elsewhere.
//! let json = map.to_json()?;
//! let copy = PartitionMap::from_json(&json)?;
//! assert_eq!(copy.partitions(), map.partitions());
//! # Ok::<(), rangeshard::Error>(())
//! ```
//!
//! # Splitting
//!
//! A space `[lower, upper]` split `n` ways uses `step = (upper - lower) / n`
//! and gives one extra unit to each of the first `(upper - lower) % n`
//! ranges. `[0, 255]` split 4 ways yields `[0,64] [65,128] [129,192]
//! [193,255]`.

pub mod config;
pub mod error;
pub mod metrics;
pub mod partitioning;
pub mod testing;

// Re-export main types for convenience
pub use config::PartitionConfig;
pub use error::{Error, Result};
pub use metrics::{ResolveMetrics, ResolveMetricsSnapshot};
pub use partitioning::{
    Algorithm, DigestSpace, EvenSplitter, Interval, PartitionMap, PartitionMapRecord, Splitter,
};
