//! Resolution metrics for partition maps.
//!
//! Counts how many keys were resolved, how many were rejected, and how the
//! resolved keys spread over partitions. Recording is purely observational:
//! it never changes what a key resolves to.
//!
//! # Example
//!
//! ```rust,ignore
//! use rangeshard::PartitionMap;
//!
//! let map = PartitionMap::md5("users", "shard", 8)?;
//! map.resolve(b"user:123")?;
//!
//! let snapshot = map.metrics().snapshot();
//! println!("resolved {} keys", snapshot.resolved);
//! print!("{}", map.metrics().to_prometheus());
//! ```

mod counters;

pub use counters::{Counter, PartitionCounter};

use std::sync::atomic::{AtomicBool, Ordering};

/// Counters kept by a partition map while resolving keys.
#[derive(Debug)]
pub struct ResolveMetrics {
    /// Keys successfully resolved.
    pub resolved: Counter,
    /// Keys rejected before hashing.
    pub rejected: Counter,
    /// Resolved keys per partition.
    pub partition_hits: PartitionCounter,
    enabled: AtomicBool,
}

impl ResolveMetrics {
    /// Create an enabled metrics instance with one hit series per label.
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            resolved: Counter::new("partition_resolved_total", "Keys resolved to a partition"),
            rejected: Counter::new("partition_rejected_total", "Keys rejected before resolution"),
            partition_hits: PartitionCounter::new("partition_hits_total", "partition", labels),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a metrics instance that ignores all recordings.
    pub fn disabled(labels: Vec<String>) -> Self {
        let metrics = Self::new(labels);
        metrics.set_enabled(false);
        metrics
    }

    /// Turn recording on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Check whether recording is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Record a key resolved to the partition at `index`.
    pub fn record_resolved(&self, index: usize) {
        if self.is_enabled() {
            self.resolved.inc();
            self.partition_hits.inc(index);
        }
    }

    /// Record a rejected key.
    pub fn record_rejected(&self) {
        if self.is_enabled() {
            self.rejected.inc();
        }
    }

    /// Hits recorded for a single partition.
    pub fn hits(&self, label: &str) -> u64 {
        self.partition_hits.get_by_label(label)
    }

    /// Clear all counters.
    pub fn reset(&self) {
        self.resolved.reset();
        self.rejected.reset();
        self.partition_hits.reset();
    }

    /// Get a point-in-time snapshot.
    pub fn snapshot(&self) -> ResolveMetricsSnapshot {
        ResolveMetricsSnapshot {
            resolved: self.resolved.get(),
            rejected: self.rejected.get(),
            hits: self.partition_hits.get_all(),
        }
    }

    /// Format metrics in Prometheus exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        for counter in [&self.resolved, &self.rejected] {
            output.push_str(&format!(
                "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
                counter.name(),
                counter.help(),
                counter.name(),
                counter.name(),
                counter.get()
            ));
        }

        let name = self.partition_hits.name();
        let label_name = self.partition_hits.label_name();
        output.push_str(&format!(
            "# HELP {} Keys resolved per partition\n# TYPE {} counter\n",
            name, name
        ));
        for (label, count) in self.partition_hits.get_all() {
            output.push_str(&format!("{}{{{}=\"{}\"}} {}\n", name, label_name, label, count));
        }

        output
    }
}

/// A snapshot of resolution metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveMetricsSnapshot {
    pub resolved: u64,
    pub rejected: u64,
    /// `(label, hits)` for every partition, in partition order.
    pub hits: Vec<(String, u64)>,
}

impl ResolveMetricsSnapshot {
    /// Fraction of attempts that were rejected.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.resolved + self.rejected;
        if total == 0 {
            0.0
        } else {
            self.rejected as f64 / total as f64
        }
    }
}
