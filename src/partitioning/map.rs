//! Partition maps: a digest space split into labeled ranges.

use super::digest::{DigestSpace, Md5Space, Sha256Space};
use super::interval::Interval;
use super::splitter::{EvenSplitter, Splitter};
use crate::config::PartitionConfig;
use crate::error::{Error, Result};
use crate::metrics::ResolveMetrics;
use num_bigint::BigUint;
use num_traits::One;
use std::collections::{HashMap, HashSet};

/// A digest space split into contiguous, labeled partitions.
///
/// A map is immutable once built. Partitions are kept sorted by lower bound
/// and tile `[space.lower_bound(), space.upper_bound()]` exactly, so every
/// digest value belongs to exactly one partition.
///
/// # Concurrency
///
/// `PartitionMap` is `Send + Sync`. Resolution locks only the digest state of
/// the space (for spaces that have any); the partition search itself reads
/// immutable data and never locks.
#[derive(Debug)]
pub struct PartitionMap {
    /// Name of the map.
    name: String,

    /// Digest space the partitions are carved from.
    space: Box<dyn DigestSpace>,

    /// Partitions ordered by lower bound.
    partitions: Vec<Interval>,

    /// Partition label to position in `partitions`.
    index: HashMap<String, usize>,

    /// Resolution counters.
    metrics: ResolveMetrics,
}

impl PartitionMap {
    /// Build a map by evenly splitting the full range of `space` into `count`
    /// partitions labeled `<label_prefix>-<i>`.
    pub fn build<S>(space: S, name: impl Into<String>, label_prefix: &str, count: usize) -> Result<Self>
    where
        S: DigestSpace + 'static,
    {
        Self::build_boxed(Box::new(space), name, label_prefix, count)
    }

    /// Same as [`PartitionMap::build`] for an already boxed space.
    pub fn build_boxed(
        space: Box<dyn DigestSpace>,
        name: impl Into<String>,
        label_prefix: &str,
        count: usize,
    ) -> Result<Self> {
        let root = root_interval(space.as_ref(), label_prefix)?;

        // Split output is already in ascending order, no sort needed.
        let partitions = EvenSplitter.split(&root, count)?;
        Ok(Self::assemble(name.into(), space, partitions))
    }

    /// Build a map with a custom splitting strategy.
    ///
    /// The splitter's output is checked to tile the space before the map is
    /// accepted; a splitter that leaves gaps, overlaps or reorders fails with
    /// [`Error::Coverage`].
    pub fn build_with_splitter<S, P>(
        space: S,
        splitter: &P,
        name: impl Into<String>,
        label_prefix: &str,
        count: usize,
    ) -> Result<Self>
    where
        S: DigestSpace + 'static,
        P: Splitter + ?Sized,
    {
        let root = root_interval(&space, label_prefix)?;
        let partitions = splitter.split(&root, count)?;
        check_coverage(&space, &partitions)?;
        Ok(Self::assemble(name.into(), Box::new(space), partitions))
    }

    /// Build an MD5-backed map.
    pub fn md5(name: impl Into<String>, label_prefix: &str, count: usize) -> Result<Self> {
        Self::build(Md5Space::md5(), name, label_prefix, count)
    }

    /// Build a SHA-256-backed map.
    pub fn sha256(name: impl Into<String>, label_prefix: &str, count: usize) -> Result<Self> {
        Self::build(Sha256Space::sha256(), name, label_prefix, count)
    }

    /// Build a map from configuration.
    pub fn from_config(config: &PartitionConfig) -> Result<Self> {
        config.validate()?;
        let space = config.algorithm.space(config.xxhash_seed);
        let map = Self::build_boxed(space, config.name.clone(), &config.label_prefix, config.partitions)?;
        map.metrics.set_enabled(config.track_metrics);
        Ok(map)
    }

    /// Wrap partitions that are known to tile `space`.
    pub(super) fn assemble(name: String, space: Box<dyn DigestSpace>, partitions: Vec<Interval>) -> Self {
        let index = partitions
            .iter()
            .enumerate()
            .map(|(i, p)| (p.label().to_string(), i))
            .collect();
        let metrics = ResolveMetrics::new(partitions.iter().map(|p| p.label().to_string()).collect());

        tracing::debug!(
            map = %name,
            algorithm = space.name(),
            partitions = partitions.len(),
            "Partition map built"
        );

        Self {
            name,
            space,
            partitions,
            index,
            metrics,
        }
    }

    /// Resolve the partition owning `key`.
    ///
    /// The same key always resolves to the same partition for the lifetime of
    /// the map. Fails with [`Error::EmptyKey`] for zero-length keys.
    ///
    /// # Panics
    ///
    /// Panics if the digest value lies outside every partition, which means
    /// the coverage invariant of the map is broken.
    pub fn resolve(&self, key: &[u8]) -> Result<&Interval> {
        if key.is_empty() {
            self.metrics.record_rejected();
            return Err(Error::EmptyKey);
        }

        let value = self.space.digest(key)?;
        let position = self.position_for_value(&value).unwrap_or_else(|| {
            panic!(
                "digest {:x} from {} is outside every partition of map {}",
                value,
                self.space.name(),
                self.name
            )
        });
        let partition = &self.partitions[position];

        self.metrics.record_resolved(position);
        tracing::trace!(map = %self.name, partition = partition.label(), "Key resolved");
        Ok(partition)
    }

    /// Find the partition containing a digest value.
    ///
    /// Returns `None` for values outside the digest space.
    pub fn partition_for_value(&self, value: &BigUint) -> Option<&Interval> {
        self.position_for_value(value).map(|i| &self.partitions[i])
    }

    fn position_for_value(&self, value: &BigUint) -> Option<usize> {
        let idx = self.partitions.partition_point(|p| p.upper() < value);
        self.partitions
            .get(idx)
            .filter(|p| p.contains(value))
            .map(|_| idx)
    }

    /// Group keys by the partition they resolve to.
    ///
    /// Returns partition label to the indices of the keys in `keys`. Fails on
    /// the first empty key.
    pub fn route_batch(&self, keys: &[&[u8]]) -> Result<HashMap<String, Vec<usize>>> {
        let mut result: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, key) in keys.iter().enumerate() {
            let partition = self.resolve(key)?;
            result.entry(partition.label().to_string()).or_default().push(idx);
        }

        Ok(result)
    }

    /// Digest value of a key in this map's space.
    pub fn key_digest(&self, key: &[u8]) -> Result<BigUint> {
        self.space.digest(key)
    }

    /// Get a partition by label.
    pub fn get(&self, label: &str) -> Option<&Interval> {
        self.index.get(label).map(|&i| &self.partitions[i])
    }

    /// Get the map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the digest space.
    pub fn space(&self) -> &dyn DigestSpace {
        self.space.as_ref()
    }

    /// Get all partitions, ordered by lower bound.
    pub fn partitions(&self) -> &[Interval] {
        &self.partitions
    }

    /// Iterate over partitions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.partitions.iter()
    }

    /// Get the number of partitions.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// A built map always has at least two partitions.
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Get the resolution metrics.
    pub fn metrics(&self) -> &ResolveMetrics {
        &self.metrics
    }
}

impl<'a> IntoIterator for &'a PartitionMap {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.partitions.iter()
    }
}

fn root_interval(space: &dyn DigestSpace, label_prefix: &str) -> Result<Interval> {
    Interval::new(
        label_prefix,
        space.lower_bound().clone(),
        space.upper_bound().clone(),
    )
}

/// Check that `partitions` tile the full range of `space` in ascending order
/// with unique labels.
pub(crate) fn check_coverage(space: &dyn DigestSpace, partitions: &[Interval]) -> Result<()> {
    let (first, last) = match (partitions.first(), partitions.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::Coverage("no partitions".to_string())),
    };

    if first.lower() != space.lower_bound() {
        return Err(Error::Coverage(format!(
            "first partition {} does not start at {:x}",
            first,
            space.lower_bound()
        )));
    }
    if last.upper() != space.upper_bound() {
        return Err(Error::Coverage(format!(
            "last partition {} does not end at {:x}",
            last,
            space.upper_bound()
        )));
    }

    let mut labels = HashSet::with_capacity(partitions.len());
    for partition in partitions {
        partition.validate()?;
        if !labels.insert(partition.label()) {
            return Err(Error::Coverage(format!("duplicate partition label {}", partition.label())));
        }
    }

    for pair in partitions.windows(2) {
        if pair[1].lower() != &(pair[0].upper() + BigUint::one()) {
            return Err(Error::Coverage(format!(
                "partition {} does not directly follow {}",
                pair[1], pair[0]
            )));
        }
    }

    Ok(())
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any non-empty key resolves to the partition containing its digest.
        #[test]
        fn prop_resolution_contains_digest(
            key in prop::collection::vec(any::<u8>(), 1..64),
            count in 2usize..200,
        ) {
            let map = PartitionMap::md5("prop", "p", count).unwrap();
            let partition = map.resolve(&key).unwrap();
            let value = map.key_digest(&key).unwrap();

            prop_assert!(partition.contains(&value));
            prop_assert_eq!(map.resolve(&key).unwrap(), partition);
        }
    }
}
