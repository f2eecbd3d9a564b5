//! Per-option running totals of discounted-payoff statistics.

use super::reduce::Mergeable;

/// Running `(sum, sum_squares)` of payoffs for one option.
///
/// Partial accumulators built over disjoint sets of paths merge into the same
/// totals, up to floating-point summation order, however the paths were
/// partitioned.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::mc::Accumulator;
///
/// let mut left = Accumulator::new();
/// left.accumulate(1.0);
/// left.accumulate(2.0);
///
/// let mut right = Accumulator::new();
/// right.accumulate(3.0);
///
/// left.merge(&right);
/// assert_eq!(left.sum(), 6.0);
/// assert_eq!(left.sum_squares(), 14.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Accumulator {
    sum: f64,
    sum_squares: f64,
}

impl Accumulator {
    /// Empty accumulator.
    #[inline]
    pub const fn new() -> Self {
        Self {
            sum: 0.0,
            sum_squares: 0.0,
        }
    }

    /// Builds an accumulator from precomputed totals.
    #[inline]
    pub const fn from_parts(sum: f64, sum_squares: f64) -> Self {
        Self { sum, sum_squares }
    }

    /// Adds one payoff sample.
    #[inline]
    pub fn accumulate(&mut self, payoff: f64) {
        self.sum += payoff;
        self.sum_squares += payoff * payoff;
    }

    /// Folds another partial accumulator into this one.
    #[inline]
    pub fn merge(&mut self, other: &Accumulator) {
        self.sum += other.sum;
        self.sum_squares += other.sum_squares;
    }

    /// Σ payoff.
    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Σ payoff².
    #[inline]
    pub fn sum_squares(&self) -> f64 {
        self.sum_squares
    }
}

impl Mergeable for Accumulator {
    #[inline]
    fn identity() -> Self {
        Self::new()
    }

    #[inline]
    fn merged(mut self, other: Self) -> Self {
        self.merge(&other);
        self
    }
}
