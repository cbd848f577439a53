//! End-to-end tests: building, resolving concurrently, and round-tripping
//! partition maps for every built-in digest.

use super::{assert_exact_coverage, sample_keys};
use crate::partitioning::{Algorithm, Interval, PartitionMap};
use crate::{Error, PartitionConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn full_range(map: &PartitionMap) -> Interval {
    Interval::new(
        "root",
        map.space().lower_bound().clone(),
        map.space().upper_bound().clone(),
    )
    .unwrap()
}

#[test]
fn test_every_algorithm_builds_and_round_trips() {
    for algorithm in Algorithm::ALL {
        let config = PartitionConfig::new(format!("{}-map", algorithm), 33).with_algorithm(algorithm);
        let map = PartitionMap::from_config(&config).unwrap();

        assert_eq!(map.len(), 33);
        assert_exact_coverage(&full_range(&map), map.partitions());

        let decoded = PartitionMap::from_json(&map.to_json().unwrap()).unwrap();
        assert_eq!(decoded.partitions(), map.partitions(), "{} round trip", algorithm);

        for key in sample_keys(50) {
            assert_eq!(
                decoded.resolve(key.as_bytes()).unwrap().label(),
                map.resolve(key.as_bytes()).unwrap().label()
            );
        }
    }
}

#[test]
fn test_concurrent_resolution_matches_sequential() {
    let map = PartitionMap::md5("concurrent", "p", 16).unwrap();
    let keys = sample_keys(1000);

    let expected: Vec<String> = keys
        .iter()
        .map(|k| map.resolve(k.as_bytes()).unwrap().label().to_string())
        .collect();
    map.metrics().reset();

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for (key, label) in keys.iter().zip(&expected) {
                    assert_eq!(map.resolve(key.as_bytes()).unwrap().label(), label);
                }
            });
        }
    });

    assert_eq!(map.metrics().snapshot().resolved, 8 * 1000);
}

#[test]
fn test_shared_map_across_threads() {
    let map = Arc::new(PartitionMap::sha256("shared", "node", 5).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                let key = format!("thread-{}", t);
                let value = map.key_digest(key.as_bytes()).unwrap();
                let partition = map.resolve(key.as_bytes()).unwrap();
                assert!(partition.contains(&value));
                partition.label().to_string()
            })
        })
        .collect();

    for handle in handles {
        let label = handle.join().unwrap();
        assert!(map.get(&label).is_some());
    }
}

#[test]
fn test_md5_distribution() {
    let map = PartitionMap::md5("dist", "p", 4).unwrap();
    let mut distribution: HashMap<String, usize> = HashMap::new();

    for key in sample_keys(10_000) {
        let label = map.resolve(key.as_bytes()).unwrap().label().to_string();
        *distribution.entry(label).or_insert(0) += 1;
    }

    assert_eq!(distribution.len(), 4);
    for (label, count) in &distribution {
        // Expect ~2500 each; allow 20% variance.
        assert!(*count > 2000 && *count < 3000, "{} has {} keys", label, count);
        assert_eq!(map.metrics().hits(label), *count as u64);
    }
}

#[test]
fn test_rejections_leave_map_usable() {
    let map = PartitionMap::md5("reject", "p", 3).unwrap();

    assert_eq!(map.resolve(b""), Err(Error::EmptyKey));
    assert!(map.resolve(b"still works").is_ok());

    let snapshot = map.metrics().snapshot();
    assert_eq!(snapshot.rejected, 1);
    assert_eq!(snapshot.resolved, 1);
}

#[test]
fn test_large_partition_count() {
    let map = PartitionMap::sha256("wide", "p", 4096).unwrap();
    assert_exact_coverage(&full_range(&map), map.partitions());
    assert_eq!(map.get("p-4095").unwrap().upper(), map.space().upper_bound());
}
