//! Analytical (closed-form) option pricing.
//!
//! - [`BlackScholes`]: European call/put prices under lognormal dynamics
//! - [`AnalyticalError`]: invalid model parameters
//!
//! Closed-form prices serve as the convergence target for the Monte Carlo
//! engine.

mod black_scholes;
mod error;

pub use black_scholes::BlackScholes;
pub use error::AnalyticalError;
