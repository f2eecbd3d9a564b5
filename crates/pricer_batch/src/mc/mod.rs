//! Monte Carlo building blocks for batch pricing.
//!
//! This module provides:
//! - [`OptionContract`] and [`DerivedParams`]: inputs and per-option
//!   precomputed parameters
//! - [`terminal_price`] / [`simulate_payoff`]: one GBM path
//! - [`Accumulator`]: per-option `(sum, sum_squares)` with merge
//! - [`combine`] / [`Mergeable`]: generic partial-result reduction
//! - [`ReductionStrategy`]: one-phase vs two-phase decision and geometry
//! - [`OptionEstimate`]: expected value and confidence radius
//! - [`SimulationConfig`]: batch configuration with builder
//!
//! # Architecture
//!
//! ```text
//! SimulationConfig ──► ReductionStrategy ──► LaunchShape / scratch_len
//!        │
//!        ▼
//! ShockSource ─► simulate_payoff ─► Accumulator ─► combine ─► OptionEstimate
//! ```

mod accumulator;
mod config;
mod contract;
pub mod error;
mod estimate;
mod paths;
mod reduce;
mod strategy;

pub use accumulator::Accumulator;
pub use config::{SimulationConfig, SimulationConfigBuilder, MAX_PATHS, MAX_STEPS, MIN_PATHS};
pub use contract::{DerivedParams, OptionContract, OptionType};
pub use error::{ConfigError, ContractError};
pub use estimate::{OptionEstimate, DEFAULT_CONFIDENCE_MULTIPLIER};
pub use paths::{accumulate_paths, simulate_payoff, terminal_price};
pub use reduce::{combine, combine_all, tree_reduce_in_place, Mergeable};
pub use strategy::{
    chunk_range, LaunchShape, ReductionStrategy, BLOCKS_PER_OPTION_FEW, BLOCKS_PER_OPTION_MANY,
    FEW_OPTIONS, LANES_PER_GROUP, MULTI_BLOCK_THRESHOLD,
};
