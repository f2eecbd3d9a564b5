//! Conversion of accumulated statistics into price estimates.

use super::accumulator::Accumulator;
use super::contract::DerivedParams;

/// Two-sided ~95% standard normal quantile.
pub const DEFAULT_CONFIDENCE_MULTIPLIER: f64 = 1.96;

/// Price estimate of one option.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionEstimate {
    /// Discounted expected payoff.
    pub expected: f64,
    /// Half-width of the confidence interval around `expected`.
    pub confidence: f64,
}

impl OptionEstimate {
    /// Builds the estimate from the totals of `path_count` payoffs.
    ///
    /// ```text
    /// expected   = df · sum / N
    /// stdDev     = sqrt((N·sumSq − sum²) / (N·(N − 1)))
    /// confidence = df · z · stdDev / sqrt(N)
    /// ```
    ///
    /// A slightly negative variance from cancellation is clamped to zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_batch::mc::{Accumulator, OptionEstimate};
    ///
    /// // Payoffs 1 and 3: mean 2, sample std dev sqrt(2)
    /// let acc = Accumulator::from_parts(4.0, 10.0);
    /// let estimate = OptionEstimate::from_accumulator(&acc, 2, 1.0, 1.0);
    /// assert_eq!(estimate.expected, 2.0);
    /// assert!((estimate.confidence - 1.0).abs() < 1e-15);
    /// ```
    pub fn from_accumulator(
        acc: &Accumulator,
        path_count: u64,
        discount: f64,
        multiplier: f64,
    ) -> Self {
        let n = path_count as f64;
        let sum = acc.sum();
        let variance = ((n * acc.sum_squares() - sum * sum) / (n * (n - 1.0))).max(0.0);
        let std_dev = variance.sqrt();
        Self {
            expected: discount * sum / n,
            confidence: discount * multiplier * std_dev / n.sqrt(),
        }
    }

    /// Exact estimate of an option with no diffusion.
    #[inline]
    pub fn deterministic(params: &DerivedParams) -> Self {
        Self {
            expected: params.discount * params.deterministic_payoff(),
            confidence: 0.0,
        }
    }

    /// Returns `true` when `value` lies inside `expected ± confidence`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        (value - self.expected).abs() <= self.confidence
    }
}
