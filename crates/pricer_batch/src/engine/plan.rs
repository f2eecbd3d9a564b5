//! Per-batch simulation plan.

use crate::mc::{LaunchShape, ReductionStrategy, SimulationConfig};
use crate::rng::Sampler;

/// Everything the orchestrator needs to size and launch one batch.
///
/// The reduction strategy, and with it the scratch size (`accumN`) and the
/// launch geometry, is fixed when the plan is built from the batch shape.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::engine::SimulationPlan;
/// use pricer_batch::mc::{ReductionStrategy, SimulationConfig};
///
/// let config = SimulationConfig::builder().path_count(1 << 20).build().unwrap();
///
/// let plan = SimulationPlan::new(&config, 8);
/// assert_eq!(plan.strategy(), ReductionStrategy::TwoPhase { blocks_per_option: 64 });
/// assert_eq!(plan.accumulators_per_option(), 64 * 256);
/// assert_eq!(plan.scratch_len(), 64 * 256 * 8);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationPlan {
    option_count: usize,
    path_count: u64,
    n_steps: usize,
    seed: u64,
    sampler: Sampler,
    confidence_multiplier: f64,
    strategy: ReductionStrategy,
    option_offset: usize,
}

impl SimulationPlan {
    /// Plans a batch of `option_count` options under `config`.
    pub fn new(config: &SimulationConfig, option_count: usize) -> Self {
        Self {
            option_count,
            path_count: config.path_count(),
            n_steps: config.n_steps(),
            seed: config.seed(),
            sampler: config.sampler(),
            confidence_multiplier: config.confidence_multiplier(),
            strategy: config.strategy_for(option_count),
            option_offset: 0,
        }
    }

    /// Numbers the options of this batch from `offset` when drawing samples.
    ///
    /// A slice of a larger batch priced with the offset of its first option
    /// sees exactly the samples it would see as part of the whole batch.
    #[inline]
    pub fn with_option_offset(mut self, offset: usize) -> Self {
        self.option_offset = offset;
        self
    }

    /// Options in the batch.
    #[inline]
    pub fn option_count(&self) -> usize {
        self.option_count
    }

    /// Paths per option.
    #[inline]
    pub fn path_count(&self) -> u64 {
        self.path_count
    }

    /// Time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Seed of the uniform source.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform source.
    #[inline]
    pub fn sampler(&self) -> Sampler {
        self.sampler
    }

    /// Confidence multiplier `z_c`.
    #[inline]
    pub fn confidence_multiplier(&self) -> f64 {
        self.confidence_multiplier
    }

    /// Reduction strategy of the batch.
    #[inline]
    pub fn strategy(&self) -> ReductionStrategy {
        self.strategy
    }

    /// Stream index of the first option.
    #[inline]
    pub fn option_offset(&self) -> usize {
        self.option_offset
    }

    /// Partial accumulators per option (`accumN`).
    #[inline]
    pub fn accumulators_per_option(&self) -> usize {
        self.strategy.accumulators_per_option()
    }

    /// Scratch accumulators the batch needs.
    #[inline]
    pub fn scratch_len(&self) -> usize {
        self.strategy.scratch_len(self.option_count)
    }

    /// Geometry of the simulation launch.
    #[inline]
    pub fn launch_shape(&self) -> LaunchShape {
        self.strategy.launch_shape(self.option_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_phase_plan_needs_no_scratch() {
        let config = SimulationConfig::builder().path_count(4096).build().unwrap();
        let plan = SimulationPlan::new(&config, 2048);
        assert_eq!(plan.strategy(), ReductionStrategy::OnePhase);
        assert_eq!(plan.scratch_len(), 0);
        assert_eq!(plan.launch_shape().groups, 2048);
        assert_eq!(plan.option_offset(), 0);
    }

    #[test]
    fn test_plan_copies_config() {
        let config = SimulationConfig::builder()
            .path_count(50_000)
            .n_steps(4)
            .seed(9)
            .sampler(Sampler::Sobol)
            .confidence_multiplier(2.58)
            .build()
            .unwrap();
        let plan = SimulationPlan::new(&config, 32).with_option_offset(64);
        assert_eq!(plan.path_count(), 50_000);
        assert_eq!(plan.n_steps(), 4);
        assert_eq!(plan.seed(), 9);
        assert_eq!(plan.sampler(), Sampler::Sobol);
        assert_eq!(plan.confidence_multiplier(), 2.58);
        assert_eq!(plan.option_offset(), 64);
        // 50_000 / 32 < 8192
        assert_eq!(plan.strategy(), ReductionStrategy::OnePhase);
    }
}
