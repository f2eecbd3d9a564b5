//! Batch lifecycle: initialise, run, finalise, close.
//!
//! Each lifecycle stage is its own type, and every transition consumes the
//! previous stage:
//!
//! ```text
//! MonteCarloEngine::initialize ─► InitializedBatch ─run─► CompletedBatch
//!                                        ▲                      │ finalize
//!                                        └──── reinitialize ─── FinalizedBatch ─close─► ()
//! ```
//!
//! Calling a stage out of order does not compile:
//!
//! ```compile_fail
//! use pricer_batch::engine::{Device, MonteCarloEngine, SimulationPlan};
//! use pricer_batch::mc::{OptionContract, SimulationConfig};
//!
//! let device = Device::new(0, 1).unwrap();
//! let config = SimulationConfig::builder().path_count(1000).build().unwrap();
//! let contracts = [OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2)];
//! let batch = MonteCarloEngine::new(&device)
//!     .initialize(SimulationPlan::new(&config, 1), &contracts)
//!     .unwrap();
//! let (_estimates, finalized) = batch.run().unwrap().finalize();
//! // A finalised batch has to be re-initialised before it can run again.
//! finalized.run();
//! ```

use tracing::{debug, info};

use super::device::{Device, DeviceLease};
use super::error::EngineError;
use super::kernels::{self, KernelArgs};
use super::plan::SimulationPlan;
use super::table::{check_capacity, validate_contracts, OptionTable, MAX_OPTIONS};
use crate::mc::{
    Accumulator, OptionContract, OptionEstimate, ReductionStrategy, SimulationConfig,
};
use crate::rng::ShockSource;

/// Entry point for pricing batches on one device.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::engine::{Device, MonteCarloEngine, SimulationPlan};
/// use pricer_batch::mc::{OptionContract, SimulationConfig};
///
/// let device = Device::new(0, 2).unwrap();
/// let config = SimulationConfig::builder().path_count(20_000).seed(1).build().unwrap();
/// let contracts = vec![OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2); 4];
///
/// let engine = MonteCarloEngine::new(&device);
/// let batch = engine.initialize(SimulationPlan::new(&config, contracts.len()), &contracts)?;
/// let (estimates, finalized) = batch.run()?.finalize();
/// finalized.close();
///
/// assert_eq!(estimates.len(), 4);
/// assert!((estimates[0].expected - 10.45).abs() < 0.5);
/// # Ok::<(), pricer_batch::engine::EngineError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MonteCarloEngine<'d> {
    device: &'d Device,
}

impl<'d> MonteCarloEngine<'d> {
    /// Creates an engine bound to `device`.
    pub fn new(device: &'d Device) -> Self {
        Self { device }
    }

    /// The device this engine launches on.
    #[inline]
    pub fn device(&self) -> &'d Device {
        self.device
    }

    /// Takes the device, loads the option table and allocates scratch.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if the batch holds more than [`MAX_OPTIONS`]
    ///   options (checked before anything is allocated or leased)
    /// - `OptionCountMismatch` if `plan` was built for another batch size
    /// - `InvalidContract` for the first contract that fails validation
    /// - `DeviceBusy` if another batch holds the device
    /// - `Allocation` if the table or scratch cannot be reserved
    pub fn initialize(
        &self,
        plan: SimulationPlan,
        contracts: &[OptionContract],
    ) -> Result<InitializedBatch<'d>, EngineError> {
        preflight(&plan, contracts)?;
        let lease = self.device.lease()?;

        let mut table = OptionTable::with_capacity(MAX_OPTIONS)?;
        table.load(contracts)?;
        let source = ShockSource::new(plan.sampler(), plan.seed(), plan.n_steps())?;
        let scratch = allocate(plan.scratch_len())?;
        let results = allocate(plan.option_count())?;

        log_plan(lease.device(), &plan);
        Ok(InitializedBatch {
            inner: Batch {
                lease,
                plan,
                table,
                source,
                scratch,
                results,
            },
        })
    }
}

fn preflight(plan: &SimulationPlan, contracts: &[OptionContract]) -> Result<(), EngineError> {
    check_capacity(contracts.len(), MAX_OPTIONS)?;
    if plan.option_count() != contracts.len() {
        return Err(EngineError::OptionCountMismatch {
            expected: plan.option_count(),
            actual: contracts.len(),
        });
    }
    validate_contracts(contracts)
}

fn allocate(len: usize) -> Result<Vec<Accumulator>, EngineError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EngineError::Allocation { elements: len })?;
    buffer.resize(len, Accumulator::new());
    Ok(buffer)
}

fn log_plan(device: &Device, plan: &SimulationPlan) {
    let shape = plan.launch_shape();
    debug!(
        device = device.id(),
        options = plan.option_count(),
        paths = plan.path_count(),
        strategy = %plan.strategy(),
        groups = shape.groups,
        accum_n = plan.accumulators_per_option(),
        scratch = plan.scratch_len(),
        "batch planned"
    );
}

/// Resources owned by a batch from initialise to close.
#[derive(Debug)]
struct Batch<'d> {
    lease: DeviceLease<'d>,
    plan: SimulationPlan,
    table: OptionTable,
    source: ShockSource,
    scratch: Vec<Accumulator>,
    results: Vec<Accumulator>,
}

impl Batch<'_> {
    fn simulate(&mut self) -> Result<(), EngineError> {
        let device = self.lease.device();
        let args = KernelArgs {
            table: self.table.rows(),
            source: &self.source,
            path_count: self.plan.path_count(),
            n_steps: self.plan.n_steps(),
            option_offset: self.plan.option_offset(),
        };

        match self.plan.strategy() {
            ReductionStrategy::OnePhase => {
                let results = &mut self.results;
                device.launch("simulate_one_block_per_option", || {
                    kernels::simulate_one_block_per_option(args, results)
                })
            }
            ReductionStrategy::TwoPhase { blocks_per_option } => {
                let accum_n = self.plan.accumulators_per_option();
                let scratch = &mut self.scratch;
                device.launch("simulate_multi_block", || {
                    kernels::simulate_multi_block(args, blocks_per_option, scratch)
                })?;
                // Every partial is written once the first launch returns.
                let (scratch, results) = (&self.scratch, &mut self.results);
                device.launch("reduce_partials", || {
                    kernels::reduce_partials(scratch, accum_n, results)
                })
            }
        }
    }

    fn estimates(&self) -> Vec<OptionEstimate> {
        let n = self.plan.path_count();
        let multiplier = self.plan.confidence_multiplier();
        self.table
            .rows()
            .iter()
            .zip(&self.results)
            .map(|(params, acc)| {
                if params.deterministic {
                    OptionEstimate::deterministic(params)
                } else {
                    OptionEstimate::from_accumulator(acc, n, params.discount, multiplier)
                }
            })
            .collect()
    }

    fn reload(
        mut self,
        plan: SimulationPlan,
        contracts: &[OptionContract],
    ) -> Result<Self, EngineError> {
        preflight(&plan, contracts)?;
        self.table.load(contracts)?;
        self.source = ShockSource::new(plan.sampler(), plan.seed(), plan.n_steps())?;

        if self.scratch.len() != plan.scratch_len() {
            // Drop the old scratch before reserving the new one.
            self.scratch = Vec::new();
            self.scratch = allocate(plan.scratch_len())?;
        } else {
            self.scratch.fill(Accumulator::new());
        }
        self.results.clear();
        self.results.resize(plan.option_count(), Accumulator::new());

        log_plan(self.lease.device(), &plan);
        self.plan = plan;
        Ok(self)
    }
}

macro_rules! batch_accessors {
    ($ty:ident) => {
        impl $ty<'_> {
            /// Plan of the batch.
            #[inline]
            pub fn plan(&self) -> &SimulationPlan {
                &self.inner.plan
            }

            /// Options in the batch.
            #[inline]
            pub fn option_count(&self) -> usize {
                self.inner.table.len()
            }

            /// Scratch accumulators currently allocated.
            #[inline]
            pub fn scratch_len(&self) -> usize {
                self.inner.scratch.len()
            }

            /// Id of the device holding the batch.
            #[inline]
            pub fn device_id(&self) -> usize {
                self.inner.lease.device().id()
            }
        }
    };
}

/// A batch whose option table and scratch are loaded on the device.
#[derive(Debug)]
pub struct InitializedBatch<'d> {
    inner: Batch<'d>,
}

/// A batch whose kernels have completed.
#[derive(Debug)]
pub struct CompletedBatch<'d> {
    inner: Batch<'d>,
}

/// A batch whose estimates have been handed out.
///
/// Still holds the device; close it or load the next batch into it.
#[derive(Debug)]
pub struct FinalizedBatch<'d> {
    inner: Batch<'d>,
}

batch_accessors!(InitializedBatch);
batch_accessors!(CompletedBatch);
batch_accessors!(FinalizedBatch);

impl<'d> InitializedBatch<'d> {
    /// Launches the simulation, and for two-phase plans the reduction.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if a kernel aborts. The batch is dropped and the
    /// device released; no partial results survive.
    pub fn run(mut self) -> Result<CompletedBatch<'d>, EngineError> {
        self.inner.simulate()?;
        Ok(CompletedBatch { inner: self.inner })
    }
}

impl<'d> CompletedBatch<'d> {
    /// Converts the per-option totals into estimates.
    pub fn finalize(self) -> (Vec<OptionEstimate>, FinalizedBatch<'d>) {
        let estimates = self.inner.estimates();
        info!(
            device = self.device_id(),
            options = estimates.len(),
            paths = self.inner.plan.path_count(),
            strategy = %self.inner.plan.strategy(),
            "batch finalised"
        );
        (estimates, FinalizedBatch { inner: self.inner })
    }
}

impl<'d> FinalizedBatch<'d> {
    /// Releases the scratch, the option table and the device.
    pub fn close(self) {
        debug!(device = self.device_id(), "batch closed");
    }

    /// Loads the next batch, reusing the device lease and the table.
    ///
    /// The scratch buffer is kept only if the new plan needs exactly as many
    /// accumulators; otherwise it is freed and reallocated.
    ///
    /// # Errors
    ///
    /// Same as [`MonteCarloEngine::initialize`], except that the device is
    /// already held. On error the device is released.
    pub fn reinitialize(
        self,
        plan: SimulationPlan,
        contracts: &[OptionContract],
    ) -> Result<InitializedBatch<'d>, EngineError> {
        Ok(InitializedBatch {
            inner: self.inner.reload(plan, contracts)?,
        })
    }
}

/// Prices `contracts` on `device` through the full lifecycle.
///
/// # Errors
///
/// Any error of [`MonteCarloEngine::initialize`] or [`InitializedBatch::run`].
pub fn price_batch(
    device: &Device,
    config: &SimulationConfig,
    contracts: &[OptionContract],
) -> Result<Vec<OptionEstimate>, EngineError> {
    let plan = SimulationPlan::new(config, contracts.len());
    let batch = MonteCarloEngine::new(device).initialize(plan, contracts)?;
    let (estimates, finalized) = batch.run()?.finalize();
    finalized.close();
    Ok(estimates)
}
