//! European option contracts and their precomputed simulation parameters.

use super::error::ContractError;

/// European exercise style payoff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OptionType {
    /// `max(S_T - X, 0)`.
    #[default]
    Call,
    /// `max(X - S_T, 0)`.
    Put,
}

impl OptionType {
    /// Undiscounted payoff at terminal price `terminal`.
    #[inline]
    pub fn payoff(self, terminal: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (terminal - strike).max(0.0),
            OptionType::Put => (strike - terminal).max(0.0),
        }
    }

    /// Returns `true` for calls.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }
}

impl std::str::FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(format!("unknown option type '{}', expected call or put", s)),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// An independent European option on a GBM underlying.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::mc::OptionContract;
///
/// let contract = OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2);
/// let params = contract.derive();
/// assert!((params.mu_by_t - 0.03).abs() < 1e-15);
/// assert!((params.v_by_sqrt_t - 0.2).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    /// Spot price `S`.
    pub spot: f64,
    /// Strike `X`.
    pub strike: f64,
    /// Time to expiry `T` in years.
    pub expiry: f64,
    /// Continuously compounded risk-free rate `R`.
    pub rate: f64,
    /// Volatility `V`.
    pub volatility: f64,
    /// Call or put.
    #[cfg_attr(feature = "serde", serde(default))]
    pub option_type: OptionType,
}

impl OptionContract {
    /// Creates a call.
    pub fn call(spot: f64, strike: f64, expiry: f64, rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            strike,
            expiry,
            rate,
            volatility,
            option_type: OptionType::Call,
        }
    }

    /// Creates a put.
    pub fn put(spot: f64, strike: f64, expiry: f64, rate: f64, volatility: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            ..Self::call(spot, strike, expiry, rate, volatility)
        }
    }

    /// Checks that the contract can be priced.
    ///
    /// # Errors
    ///
    /// Returns `ContractError` for non-finite fields, a non-positive spot or a
    /// negative strike, expiry or volatility.
    pub fn validate(&self) -> Result<(), ContractError> {
        for (field, value) in [
            ("spot", self.spot),
            ("strike", self.strike),
            ("expiry", self.expiry),
            ("rate", self.rate),
            ("volatility", self.volatility),
        ] {
            if !value.is_finite() {
                return Err(ContractError::NonFinite { field, value });
            }
        }
        if self.spot <= 0.0 {
            return Err(ContractError::NonPositiveSpot(self.spot));
        }
        if self.strike < 0.0 {
            return Err(ContractError::NegativeStrike(self.strike));
        }
        if self.expiry < 0.0 {
            return Err(ContractError::NegativeExpiry(self.expiry));
        }
        if self.volatility < 0.0 {
            return Err(ContractError::NegativeVolatility(self.volatility));
        }
        Ok(())
    }

    /// Zero volatility or zero expiry leaves no randomness in the payoff.
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        self.volatility == 0.0 || self.expiry == 0.0
    }

    /// Precomputes the per-option simulation parameters.
    pub fn derive(&self) -> DerivedParams {
        DerivedParams {
            spot: self.spot,
            strike: self.strike,
            mu_by_t: (self.rate - 0.5 * self.volatility * self.volatility) * self.expiry,
            v_by_sqrt_t: self.volatility * self.expiry.sqrt(),
            discount: (-self.rate * self.expiry).exp(),
            option_type: self.option_type,
            deterministic: self.is_deterministic(),
        }
    }
}

/// Per-option row of the device parameter table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedParams {
    /// Spot price `S`.
    pub spot: f64,
    /// Strike `X`.
    pub strike: f64,
    /// `(R - V²/2)·T`.
    pub mu_by_t: f64,
    /// `V·√T`.
    pub v_by_sqrt_t: f64,
    /// `exp(-R·T)`.
    pub discount: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// No paths are simulated for deterministic options.
    pub deterministic: bool,
}

impl DerivedParams {
    /// Undiscounted payoff of a path with zero diffusion.
    #[inline]
    pub fn deterministic_payoff(&self) -> f64 {
        self.option_type
            .payoff(self.spot * self.mu_by_t.exp(), self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_payoffs() {
        assert_eq!(OptionType::Call.payoff(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.payoff(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.payoff(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.payoff(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_option_type_parse() {
        assert_eq!("Call".parse::<OptionType>(), Ok(OptionType::Call));
        assert_eq!(" p ".parse::<OptionType>(), Ok(OptionType::Put));
        assert!("straddle".parse::<OptionType>().is_err());
        assert_eq!(OptionType::Put.to_string(), "put");
    }

    #[test]
    fn test_derive_matches_closed_forms() {
        let params = OptionContract::put(30.0, 25.0, 4.0, 0.06, 0.1).derive();
        assert_relative_eq!(params.mu_by_t, (0.06 - 0.005) * 4.0, epsilon = 1e-15);
        assert_relative_eq!(params.v_by_sqrt_t, 0.2, epsilon = 1e-15);
        assert_relative_eq!(params.discount, (-0.24_f64).exp(), epsilon = 1e-15);
        assert_eq!(params.option_type, OptionType::Put);
        assert!(!params.deterministic);
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        let ok = OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2);
        assert!(ok.validate().is_ok());

        let cases = [
            OptionContract { spot: 0.0, ..ok },
            OptionContract { strike: -1.0, ..ok },
            OptionContract { expiry: -0.5, ..ok },
            OptionContract { volatility: -0.2, ..ok },
            OptionContract { rate: f64::NAN, ..ok },
            OptionContract { spot: f64::INFINITY, ..ok },
        ];
        for contract in cases {
            assert!(contract.validate().is_err(), "{:?}", contract);
        }

        // Negative rates and zero strikes are legitimate
        assert!(OptionContract { rate: -0.01, ..ok }.validate().is_ok());
        assert!(OptionContract { strike: 0.0, ..ok }.validate().is_ok());
    }

    #[test]
    fn test_deterministic_payoffs() {
        let zero_vol = OptionContract::call(100.0, 90.0, 2.0, 0.05, 0.0);
        assert!(zero_vol.is_deterministic());
        let params = zero_vol.derive();
        assert_eq!(
            params.deterministic_payoff(),
            (100.0 * (0.05_f64 * 2.0).exp() - 90.0).max(0.0)
        );

        let expired = OptionContract::put(80.0, 100.0, 0.0, 0.05, 0.3).derive();
        assert!(expired.deterministic);
        assert_eq!(expired.discount, 1.0);
        assert_eq!(expired.deterministic_payoff(), 20.0);
    }
}
