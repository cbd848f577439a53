//! Counter metrics for monotonically increasing values.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug)]
pub struct Counter {
    name: &'static str,
    help: &'static str,
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter.
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            value: AtomicU64::new(0),
        }
    }

    /// Get the counter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the counter help text.
    pub fn help(&self) -> &'static str {
        self.help
    }

    /// Increment the counter by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Reset the counter to zero.
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// One counter per partition, addressed by partition position.
///
/// The series are fixed when the map is built, so incrementing is a single
/// atomic add with no lookup and no lock.
#[derive(Debug)]
pub struct PartitionCounter {
    name: &'static str,
    label_name: &'static str,
    labels: Vec<String>,
    counts: Vec<AtomicU64>,
}

impl PartitionCounter {
    /// Create a counter with one zeroed series per label.
    pub fn new(name: &'static str, label_name: &'static str, labels: Vec<String>) -> Self {
        let counts = labels.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            name,
            label_name,
            labels,
            counts,
        }
    }

    /// Get the counter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the label name used in exposition output.
    pub fn label_name(&self) -> &'static str {
        self.label_name
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Increment the series at `index` by 1. Out-of-range indices are ignored.
    pub fn inc(&self, index: usize) {
        if let Some(count) = self.counts.get(index) {
            count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get the value of the series at `index`.
    pub fn get(&self, index: usize) -> u64 {
        self.counts
            .get(index)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Get the value of the series labeled `label`.
    pub fn get_by_label(&self, label: &str) -> u64 {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.get(i))
            .unwrap_or(0)
    }

    /// Get all series with their labels, in partition order.
    pub fn get_all(&self) -> Vec<(String, u64)> {
        self.labels
            .iter()
            .zip(&self.counts)
            .map(|(label, count)| (label.clone(), count.load(Ordering::Relaxed)))
            .collect()
    }

    /// Zero every series.
    pub fn reset(&self) {
        for count in &self.counts {
            count.store(0, Ordering::Relaxed);
        }
    }
}
