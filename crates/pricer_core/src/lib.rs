//! # pricer_core: Numerical Foundation for Batch Monte Carlo Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the batch pricer, providing:
//! - Standard normal CDF/PDF and the rational inverse CND (`math::distributions`)
//! - Black-Scholes closed-form prices for European options (`analytical`)
//! - Error types for analytical pricing (`analytical::AnalyticalError`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Structured error types
//!
//! All kernels are generic over `num_traits::Float`, so single precision is a
//! type choice at the call site rather than a separate implementation.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::analytical::BlackScholes;
//! use pricer_core::math::distributions::{inverse_norm_cdf, norm_cdf};
//!
//! // Shock for the 97.5% quantile
//! let z = inverse_norm_cdf(0.975_f64);
//! assert!((z - 1.959_963_985).abs() < 1e-8);
//! assert!((norm_cdf(z) - 0.975).abs() < 1e-7);
//!
//! // Textbook at-the-money call
//! let bs = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
//! assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-3);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod math;
