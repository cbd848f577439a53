//! Splitting an interval into contiguous sub-intervals.
//!
//! [`EvenSplitter`] divides `upper - lower` by the split count and hands the
//! leftover units out one at a time to the leading intervals:
//!
//! ```text
//! [0, 255] / 4:  span = 255, step = 63, leftover = 3
//!
//!   i  base  +step  +carry  interval      width
//!   0    0     63     1     [  0,  64]     65
//!   1   64    127     1     [ 65, 128]     64
//!   2  128    191     1     [129, 192]     64
//!   3  192    255     0     [193, 255]     63
//! ```
//!
//! The first interval's base is the source lower bound, every later base is
//! the previous upper bound, and every later lower bound is the previous
//! upper bound plus one. The output therefore always tiles the source range
//! exactly.

use super::interval::Interval;
use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};

const MAX_PREALLOCATED: usize = 1 << 16;

/// Strategy for splitting one interval into several.
pub trait Splitter {
    /// Split `source` into `count` intervals ordered by lower bound.
    ///
    /// The result must cover `source` exactly, with no gaps or overlaps.
    fn split(&self, source: &Interval, count: usize) -> Result<Vec<Interval>>;
}

/// Splits an interval into near-equal pieces labeled `<label>-<index>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenSplitter;

impl EvenSplitter {
    /// Create an even splitter.
    pub fn new() -> Self {
        Self
    }
}

impl Splitter for EvenSplitter {
    fn split(&self, source: &Interval, count: usize) -> Result<Vec<Interval>> {
        if count <= 1 {
            return Err(Error::InvalidSplitCount(count));
        }
        source.validate()?;

        let divisor = BigUint::from(count);
        let span = source.span();
        let step = &span / &divisor;
        if step.is_zero() {
            // Every piece after the first would have lower >= upper.
            return Err(Error::invalid_interval(
                source.label(),
                format!("span {} is too narrow to split into {} intervals", span, count),
            ));
        }
        let mut leftover = &span % &divisor;
        assert!(
            leftover < divisor,
            "split of {} into {} left {} units over",
            source,
            count,
            leftover
        );

        // Wide spaces admit counts far beyond what can be allocated up front.
        let mut result = Vec::with_capacity(count.min(MAX_PREALLOCATED));
        let mut base = source.lower().clone();

        for i in 0..count {
            let lower = if i == 0 {
                source.lower().clone()
            } else {
                &base + BigUint::one()
            };

            let mut upper = &base + &step;
            if !leftover.is_zero() {
                upper += BigUint::one();
                leftover -= BigUint::one();
            }

            result.push(Interval::new(format!("{}-{}", source.label(), i), lower, upper.clone())?);
            base = upper;
        }

        Ok(result)
    }
}
