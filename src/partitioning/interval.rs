//! Closed, labeled ranges over big unsigned integers.

use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

/// A single partition of a digest space.
///
/// Bounds are inclusive on both ends: a value `v` belongs to the interval iff
/// `lower <= v <= upper`. An interval is always valid once constructed, i.e.
/// `lower < upper` and the label is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Uniquely identifies the interval within its partition map.
    label: String,

    /// Smallest value contained in this interval.
    lower: BigUint,

    /// Largest value contained in this interval.
    upper: BigUint,
}

impl Interval {
    /// Create a validated interval.
    pub fn new(label: impl Into<String>, lower: BigUint, upper: BigUint) -> Result<Self> {
        let interval = Self {
            label: label.into(),
            lower,
            upper,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Check the interval invariants.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(Error::invalid_interval(&self.label, "label cannot be empty or whitespace"));
        }
        if self.lower >= self.upper {
            return Err(Error::invalid_interval(
                &self.label,
                format!(
                    "lower bound {:x} must be strictly less than upper bound {:x}",
                    self.lower, self.upper
                ),
            ));
        }
        Ok(())
    }

    /// Get the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the inclusive lower bound.
    pub fn lower(&self) -> &BigUint {
        &self.lower
    }

    /// Get the inclusive upper bound.
    pub fn upper(&self) -> &BigUint {
        &self.upper
    }

    /// `upper - lower`. This is what the splitter divides.
    pub fn span(&self) -> BigUint {
        &self.upper - &self.lower
    }

    /// Number of values in the interval, `upper - lower + 1`.
    pub fn width(&self) -> BigUint {
        self.span() + BigUint::one()
    }

    /// Check if a value falls inside this interval.
    pub fn contains(&self, value: &BigUint) -> bool {
        &self.lower <= value && value <= &self.upper
    }

    /// Lower bound as lowercase hex without a prefix.
    pub fn lower_hex(&self) -> String {
        self.lower.to_str_radix(16)
    }

    /// Upper bound as lowercase hex without a prefix.
    pub fn upper_hex(&self) -> String {
        self.upper.to_str_radix(16)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:x}, {:x}]", self.label, self.lower, self.upper)
    }
}
