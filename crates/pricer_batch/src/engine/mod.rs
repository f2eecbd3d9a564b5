//! Batch execution on compute devices.
//!
//! This module provides:
//! - [`Device`]: a thread-pool backed device hosting one batch at a time
//! - [`OptionTable`]: bounded per-option parameter arena ([`MAX_OPTIONS`] rows)
//! - [`SimulationPlan`]: batch shape, strategy and scratch sizing
//! - [`MonteCarloEngine`] and the batch stages [`InitializedBatch`],
//!   [`CompletedBatch`] and [`FinalizedBatch`]
//! - [`price_batch`]: the whole lifecycle in one call

mod device;
mod error;
mod kernels;
mod orchestrator;
mod plan;
mod table;

pub use device::Device;
pub use error::EngineError;
pub use orchestrator::{
    price_batch, CompletedBatch, FinalizedBatch, InitializedBatch, MonteCarloEngine,
};
pub use plan::SimulationPlan;
pub use table::{OptionTable, MAX_OPTIONS};
