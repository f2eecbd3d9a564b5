//! Error types for batch configuration and option contracts.

use thiserror::Error;

/// Configuration error for the batch engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Path count outside the valid range `[2, MAX_PATHS]`.
    #[error("Invalid path count {0}: must be in range [2, {max}]", max = super::config::MAX_PATHS)]
    InvalidPathCount(u64),
    /// Step count outside the valid range `[1, MAX_STEPS]`.
    #[error("Invalid step count {0}: must be in range [1, {max}]", max = super::config::MAX_STEPS)]
    InvalidStepCount(usize),
    /// More Sobol dimensions requested than direction numbers are available.
    #[error("Sobol source supports at most {max} dimensions, {requested} requested")]
    TooManySobolDimensions {
        /// Requested dimension (one per time step).
        requested: usize,
        /// Largest supported dimension.
        max: usize,
    },
    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Reason an option contract cannot be priced.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ContractError {
    /// A field is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Spot price is zero or negative.
    #[error("spot must be positive, got {0}")]
    NonPositiveSpot(f64),
    /// Strike is negative.
    #[error("strike must be non-negative, got {0}")]
    NegativeStrike(f64),
    /// Time to expiry is negative.
    #[error("expiry must be non-negative, got {0}")]
    NegativeExpiry(f64),
    /// Volatility is negative.
    #[error("volatility must be non-negative, got {0}")]
    NegativeVolatility(f64),
}
