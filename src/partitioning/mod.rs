//! Partitioning of digest spaces into labeled key ranges.
//!
//! A [`PartitionMap`] takes the full output range of a digest function, cuts
//! it into contiguous [`Interval`]s with an [`EvenSplitter`], and answers
//! "which interval owns this key" by hashing the key and binary-searching the
//! intervals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PartitionMap                          │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │ DigestSpace (MD5: [0, 2^128 - 1])                    │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                  │ EvenSplitter, once                       │
//! │                  ▼                                          │
//! │  ┌──────────┐┌──────────┐┌──────────┐     ┌──────────┐     │
//! │  │   p-0    ││   p-1    ││   p-2    │ ... │  p-N-1   │     │
//! │  └──────────┘└──────────┘└──────────┘     └──────────┘     │
//! │                                                             │
//! │  Key "user:123" → digest → binary search → p-1             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use rangeshard::partitioning::PartitionMap;
//!
//! let map = PartitionMap::md5("key_store", "partition", 100)?;
//! let owner = map.resolve(b"user:123")?;
//! assert!(owner.label().starts_with("partition-"));
//! # Ok::<(), rangeshard::Error>(())
//! ```

mod digest;
mod interval;
mod map;
mod record;
mod splitter;

pub use digest::{
    width_bounds, Algorithm, DigestSpace, HashSpace, Md5Space, Sha256Space, Sha512Space,
    XxHash64Space,
};
pub use interval::Interval;
pub use map::PartitionMap;
pub use record::{IntervalRecord, PartitionMapRecord};
pub use splitter::{EvenSplitter, Splitter};
