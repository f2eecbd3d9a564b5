//! # pricer_batch: Batch Monte Carlo Engine for European Options
//!
//! ## Layer 2 (Engine) Role
//!
//! pricer_batch prices batches of independent European options by
//! simulating risk-neutral GBM paths, accumulating per-option payoff
//! statistics in parallel and turning them into a price estimate with a
//! confidence radius:
//! - Uniform sources and normal shocks (`rng`)
//! - Path simulation, accumulators, reductions and strategy choice (`mc`)
//! - Devices, the bounded option table and the batch lifecycle (`engine`)
//! - A serial reference pricer (`reference`)
//! - Closed-form comparison (`validation`)
//! - Splitting a batch across devices (`multi_device`)
//!
//! ## Execution Model
//!
//! A device is a dedicated rayon thread pool. A kernel launch runs a
//! data-parallel closure inside that pool; a work-group is one task driving
//! 256 lanes. Small per-option path budgets use one work-group per option
//! with an in-group tree reduction; large budgets spread each option over
//! 16 or 64 work-groups and merge their partial accumulators in a second
//! launch.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_batch::engine::{price_batch, Device};
//! use pricer_batch::mc::{OptionContract, SimulationConfig};
//! use pricer_batch::validation::compare_with_black_scholes;
//!
//! let device = Device::new(0, 2)?;
//! let config = SimulationConfig::builder()
//!     .path_count(50_000)
//!     .seed(7)
//!     .build()?;
//! let contracts = vec![
//!     OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2),
//!     OptionContract::put(100.0, 100.0, 1.0, 0.05, 0.2),
//! ];
//!
//! let estimates = price_batch(&device, &config, &contracts)?;
//! let report = compare_with_black_scholes(&contracts, &estimates)?;
//! assert!(report.relative_l1 < 0.05);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod mc;
pub mod multi_device;
pub mod reference;
pub mod rng;
pub mod validation;

pub use engine::{price_batch, Device, EngineError, MonteCarloEngine, SimulationPlan};
pub use mc::{OptionContract, OptionEstimate, OptionType, SimulationConfig};
