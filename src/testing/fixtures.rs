use crate::error::{Error, Result};
use crate::partitioning::{width_bounds, DigestSpace, Interval};
use num_bigint::BigUint;
use num_traits::One;

/// 8-bit digest space whose digest is the XOR of all key bytes.
///
/// A single-byte key digests to itself.
#[derive(Debug, Clone)]
pub struct XorFoldSpace {
    lower: BigUint,
    upper: BigUint,
}

impl XorFoldSpace {
    pub fn new() -> Self {
        let (lower, upper) = width_bounds(8);
        Self { lower, upper }
    }
}

impl Default for XorFoldSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestSpace for XorFoldSpace {
    fn name(&self) -> &str {
        "XOR8"
    }

    fn bit_width(&self) -> u32 {
        8
    }

    fn lower_bound(&self) -> &BigUint {
        &self.lower
    }

    fn upper_bound(&self) -> &BigUint {
        &self.upper
    }

    fn digest(&self, key: &[u8]) -> Result<BigUint> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        Ok(BigUint::from(key.iter().fold(0u8, |acc, b| acc ^ b)))
    }
}

/// Generate `count` distinct keys of the form `sample_key_<i>`.
pub fn sample_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("sample_key_{}", i)).collect()
}

/// Assert that `parts` tile `source` exactly: same endpoints, and each lower
/// bound one past the previous upper bound.
///
/// # Panics
///
/// Panics with the offending pair if the tiling is broken.
pub fn assert_exact_coverage(source: &Interval, parts: &[Interval]) {
    let (first, last) = match (parts.first(), parts.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => panic!("split of {} produced no parts", source),
    };

    assert_eq!(first.lower(), source.lower(), "first part {} does not start at source", first);
    assert_eq!(last.upper(), source.upper(), "last part {} does not end at source", last);

    for pair in parts.windows(2) {
        assert_eq!(
            pair[1].lower(),
            &(pair[0].upper() + BigUint::one()),
            "{} does not directly follow {}",
            pair[1],
            pair[0]
        );
    }
}
