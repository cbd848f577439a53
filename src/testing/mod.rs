//! Testing utilities for partition maps.
//!
//! This module provides fixtures shared by unit tests and downstream crates:
//! - [`XorFoldSpace`], an 8-bit digest space with predictable output, for
//!   asserting exact resolutions
//! - [`sample_keys`] for generating key sets
//! - [`assert_exact_coverage`] for checking that a split tiles its source
//!
//! # Example
//!
//! ```rust
//! use rangeshard::testing::XorFoldSpace;
//! use rangeshard::PartitionMap;
//!
//! let map = PartitionMap::build(XorFoldSpace::new(), "bytes", "p", 4)?;
//! assert_eq!(map.resolve(&[200])?.label(), "p-3");
//! # Ok::<(), rangeshard::Error>(())
//! ```

mod fixtures;

#[cfg(test)]
mod partition_map_tests;

pub use fixtures::{assert_exact_coverage, sample_keys, XorFoldSpace};
