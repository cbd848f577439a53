//! Serialized form of partition maps.
//!
//! A map is written as its name, its partitions with bounds as lowercase hex
//! (no `0x` prefix) and the name of its hash function:
//!
//! ```json
//! {
//!   "map_name": "key_store",
//!   "partitions": [
//!     { "label": "partition-0", "lower_bound": "0", "upper_bound": "80000000000000000000000000000000" },
//!     { "label": "partition-1", "lower_bound": "80000000000000000000000000000001", "upper_bound": "ffffffffffffffffffffffffffffffff" }
//!   ],
//!   "hash_function": "MD5"
//! }
//! ```
//!
//! Digest state is not part of the record. Decoding builds a fresh digest
//! space for the named hash function and re-checks that the partitions tile
//! it.

use super::digest::{Algorithm, DigestSpace};
use super::interval::Interval;
use super::map::{check_coverage, PartitionMap};
use crate::error::{Error, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialized partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub label: String,
    pub lower_bound: String,
    pub upper_bound: String,
}

impl IntervalRecord {
    /// Parse the hex bounds and validate the interval.
    pub fn to_interval(&self) -> Result<Interval> {
        let lower = parse_bound(&self.label, "lower", &self.lower_bound)?;
        let upper = parse_bound(&self.label, "upper", &self.upper_bound)?;
        Interval::new(self.label.clone(), lower, upper)
    }
}

impl From<&Interval> for IntervalRecord {
    fn from(interval: &Interval) -> Self {
        Self {
            label: interval.label().to_string(),
            lower_bound: interval.lower_hex(),
            upper_bound: interval.upper_hex(),
        }
    }
}

/// Serialized partition map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMapRecord {
    pub map_name: String,
    pub partitions: Vec<IntervalRecord>,
    pub hash_function: String,
}

impl PartitionMapRecord {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}

/// Parse a hex bound. Only hex digits are accepted: no sign, no `0x`, no
/// separators.
fn parse_bound(label: &str, field: &'static str, value: &str) -> Result<BigUint> {
    let malformed = || Error::MalformedBound {
        label: label.to_string(),
        field,
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }
    BigUint::parse_bytes(value.as_bytes(), 16).ok_or_else(malformed)
}

impl PartitionMap {
    /// Convert to the serializable record.
    pub fn to_record(&self) -> PartitionMapRecord {
        PartitionMapRecord {
            map_name: self.name().to_string(),
            partitions: self.iter().map(IntervalRecord::from).collect(),
            hash_function: self.space().name().to_string(),
        }
    }

    /// Rebuild a map from a record, using a fresh space of the named
    /// built-in hash function.
    ///
    /// Seeded spaces come back with seed 0; use
    /// [`PartitionMap::from_record_with_space`] to supply the seeded space.
    pub fn from_record(record: &PartitionMapRecord) -> Result<Self> {
        let algorithm = Algorithm::from_name(&record.hash_function)?;
        Self::from_record_with_space(record, algorithm.space(0))
    }

    /// Rebuild a map from a record on top of the given space.
    ///
    /// The space's name must match the record's hash function, otherwise
    /// this fails with [`Error::AlgorithmMismatch`].
    pub fn from_record_with_space(record: &PartitionMapRecord, space: Box<dyn DigestSpace>) -> Result<Self> {
        if !space.name().eq_ignore_ascii_case(record.hash_function.trim()) {
            return Err(Error::AlgorithmMismatch {
                record: record.hash_function.clone(),
                space: space.name().to_string(),
            });
        }

        let partitions = record
            .partitions
            .iter()
            .map(IntervalRecord::to_interval)
            .collect::<Result<Vec<_>>>()
            .and_then(|partitions| check_coverage(space.as_ref(), &partitions).map(|_| partitions))
            .map_err(|e| {
                tracing::warn!(map = %record.map_name, error = %e, "Rejected partition map record");
                e
            })?;

        Ok(Self::assemble(record.map_name.clone(), space, partitions))
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_record(&PartitionMapRecord::from_json(json)?)
    }
}

impl Serialize for PartitionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PartitionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = PartitionMapRecord::deserialize(deserializer)?;
        PartitionMap::from_record(&record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::XxHash64Space;
    use crate::testing::sample_keys;

    fn record_for(bounds: &[(&str, &str, &str)]) -> PartitionMapRecord {
        PartitionMapRecord {
            map_name: "m".to_string(),
            partitions: bounds
                .iter()
                .map(|(label, lower, upper)| IntervalRecord {
                    label: label.to_string(),
                    lower_bound: lower.to_string(),
                    upper_bound: upper.to_string(),
                })
                .collect(),
            hash_function: "XXH64".to_string(),
        }
    }

    #[test]
    fn test_json_layout() {
        let map = PartitionMap::md5("key_store", "partition", 2).unwrap();
        let json = map.to_json().unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"map_name":"key_store","partitions":["#,
                r#"{"label":"partition-0","lower_bound":"0","upper_bound":"80000000000000000000000000000000"},"#,
                r#"{"label":"partition-1","lower_bound":"80000000000000000000000000000001","upper_bound":"ffffffffffffffffffffffffffffffff"}"#,
                r#"],"hash_function":"MD5"}"#
            )
        );
    }

    #[test]
    fn test_json_round_trip() {
        let map = PartitionMap::sha256("users", "shard", 13).unwrap();
        let decoded = PartitionMap::from_json(&map.to_json().unwrap()).unwrap();

        assert_eq!(decoded.name(), "users");
        assert_eq!(decoded.space().name(), "SHA256");
        assert_eq!(decoded.partitions(), map.partitions());
        for key in sample_keys(200) {
            assert_eq!(
                decoded.resolve(key.as_bytes()).unwrap(),
                map.resolve(key.as_bytes()).unwrap()
            );
        }
    }

    #[test]
    fn test_bincode_round_trip() {
        let record = PartitionMap::md5("bin", "p", 5).unwrap().to_record();
        let bytes = record.to_bytes().unwrap();
        assert_eq!(PartitionMapRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_serde_impls_use_record() {
        let map = PartitionMap::md5("serde", "p", 3).unwrap();
        let via_serde = serde_json::to_string(&map).unwrap();
        assert_eq!(via_serde, map.to_json().unwrap());

        let decoded: PartitionMap = serde_json::from_str(&via_serde).unwrap();
        assert_eq!(decoded.partitions(), map.partitions());
    }

    #[test]
    fn test_hex_bounds_round_trip() {
        let map = PartitionMap::build(XxHash64Space::default(), "hex", "p", 7).unwrap();
        for partition in map.iter() {
            let record = IntervalRecord::from(partition);
            assert_eq!(&record.to_interval().unwrap(), partition);
            assert_eq!(record.lower_bound, record.lower_bound.to_lowercase());
        }
    }

    #[test]
    fn test_malformed_bounds_rejected() {
        for bad in ["", "0x10", "+ff", "-1", "1_0", "zz", " ff"] {
            let record = IntervalRecord {
                label: "p-0".to_string(),
                lower_bound: bad.to_string(),
                upper_bound: "ff".to_string(),
            };
            assert!(
                matches!(record.to_interval(), Err(Error::MalformedBound { field: "lower", .. })),
                "accepted {:?}",
                bad
            );
        }

        let upper_bad = IntervalRecord {
            label: "p-0".to_string(),
            lower_bound: "0".to_string(),
            upper_bound: "fg".to_string(),
        };
        assert!(matches!(
            upper_bad.to_interval(),
            Err(Error::MalformedBound { field: "upper", .. })
        ));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let record = record_for(&[("a", "0", "7FFFFFFFFFFFFFFF"), ("b", "8000000000000000", "FFFFFFFFFFFFFFFF")]);
        let map = PartitionMap::from_record(&record).unwrap();
        assert_eq!(map.get("b").unwrap().lower_hex(), "8000000000000000");
    }

    #[test]
    fn test_unknown_hash_function() {
        let mut record = PartitionMap::md5("m", "p", 2).unwrap().to_record();
        record.hash_function = "SPOOKY".to_string();
        assert_eq!(
            PartitionMap::from_record(&record).unwrap_err(),
            Error::UnknownAlgorithm("SPOOKY".to_string())
        );
    }

    #[test]
    fn test_broken_coverage_rejected() {
        let gap = record_for(&[("a", "0", "10"), ("b", "12", "ffffffffffffffff")]);
        assert!(matches!(PartitionMap::from_record(&gap), Err(Error::Coverage(_))));

        let short = record_for(&[("a", "0", "10"), ("b", "11", "fffffffffffffffe")]);
        assert!(matches!(PartitionMap::from_record(&short), Err(Error::Coverage(_))));

        let inverted = record_for(&[("a", "10", "0")]);
        assert!(matches!(
            PartitionMap::from_record(&inverted),
            Err(Error::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_seeded_space_restored() {
        let map = PartitionMap::build(XxHash64Space::with_seed(77), "seeded", "p", 4).unwrap();
        let record = map.to_record();

        let restored =
            PartitionMap::from_record_with_space(&record, Box::new(XxHash64Space::with_seed(77))).unwrap();
        assert_eq!(restored.key_digest(b"k").unwrap(), map.key_digest(b"k").unwrap());

        let mismatched = PartitionMap::from_record_with_space(&record, Algorithm::Md5.space(0));
        assert_eq!(
            mismatched.unwrap_err(),
            Error::AlgorithmMismatch {
                record: "XXH64".to_string(),
                space: "MD5".to_string(),
            }
        );
    }

    #[test]
    fn test_module_doc_sample_matches_output() {
        let map = PartitionMap::md5("key_store", "partition", 2).unwrap();
        let record = map.to_record();

        assert_eq!(record.partitions[0].upper_bound, format!("8{}", "0".repeat(31)));
        assert_eq!(record.partitions[1].lower_bound, format!("8{}1", "0".repeat(30)));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            PartitionMap::from_json("{\"map_name\": 3}"),
            Err(Error::Serialization(_))
        ));
    }
}
