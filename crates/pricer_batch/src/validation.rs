//! Comparison of Monte Carlo estimates with closed-form prices.

use pricer_core::analytical::BlackScholes;

use crate::engine::EngineError;
use crate::mc::{OptionContract, OptionEstimate};

/// Per-option comparison with the Black-Scholes price.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionComparison {
    /// Monte Carlo estimate.
    pub monte_carlo: f64,
    /// Confidence radius of the estimate.
    pub confidence: f64,
    /// Closed-form price.
    pub black_scholes: f64,
    /// `|monte_carlo - black_scholes|`.
    pub abs_error: f64,
}

impl OptionComparison {
    /// Returns `true` if the closed-form price lies inside the confidence
    /// interval of the estimate.
    #[inline]
    pub fn within_confidence(&self) -> bool {
        self.abs_error <= self.confidence
    }
}

/// Batch-level comparison summary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonReport {
    /// Per-option rows in batch order.
    pub options: Vec<OptionComparison>,
    /// `Σ|mc - bs| / Σ|bs|`; zero when every closed-form price is zero.
    pub relative_l1: f64,
    /// Largest absolute error.
    pub max_abs_error: f64,
    /// Fraction of options whose error is within their confidence radius.
    pub within_confidence: f64,
}

/// Closed-form price of one contract.
///
/// Deterministic contracts (zero volatility or expiry) are priced as their
/// discounted forward payoff.
///
/// # Errors
///
/// Returns `EngineError::Analytical` if the closed form rejects the contract.
pub fn black_scholes_price(contract: &OptionContract) -> Result<f64, EngineError> {
    if contract.is_deterministic() {
        return Ok(OptionEstimate::deterministic(&contract.derive()).expected);
    }
    let model = BlackScholes::new(contract.spot, contract.rate, contract.volatility)?;
    Ok(model.price(
        contract.strike,
        contract.expiry,
        contract.option_type.is_call(),
    ))
}

/// Compares `estimates` against the Black-Scholes prices of `contracts`.
///
/// # Errors
///
/// Returns `OptionCountMismatch` if the slices differ in length and
/// `Analytical` if a closed-form price cannot be computed.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::mc::{OptionContract, OptionEstimate};
/// use pricer_batch::validation::compare_with_black_scholes;
///
/// let contracts = [OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2)];
/// let estimates = [OptionEstimate { expected: 10.5, confidence: 0.1 }];
/// let report = compare_with_black_scholes(&contracts, &estimates).unwrap();
/// assert!(report.max_abs_error < 0.06);
/// assert_eq!(report.within_confidence, 1.0);
/// ```
pub fn compare_with_black_scholes(
    contracts: &[OptionContract],
    estimates: &[OptionEstimate],
) -> Result<ComparisonReport, EngineError> {
    if contracts.len() != estimates.len() {
        return Err(EngineError::OptionCountMismatch {
            expected: contracts.len(),
            actual: estimates.len(),
        });
    }

    let options = contracts
        .iter()
        .zip(estimates)
        .map(|(contract, estimate)| -> Result<OptionComparison, EngineError> {
            let black_scholes = black_scholes_price(contract)?;
            Ok(OptionComparison {
                monte_carlo: estimate.expected,
                confidence: estimate.confidence,
                black_scholes,
                abs_error: (estimate.expected - black_scholes).abs(),
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    let error_sum: f64 = options.iter().map(|o| o.abs_error).sum();
    let reference_sum: f64 = options.iter().map(|o| o.black_scholes.abs()).sum();
    let relative_l1 = if reference_sum > 0.0 {
        error_sum / reference_sum
    } else {
        0.0
    };
    let max_abs_error = options.iter().map(|o| o.abs_error).fold(0.0, f64::max);
    let within_confidence = if options.is_empty() {
        1.0
    } else {
        options.iter().filter(|o| o.within_confidence()).count() as f64 / options.len() as f64
    };

    Ok(ComparisonReport {
        options,
        relative_l1,
        max_abs_error,
        within_confidence,
    })
}
