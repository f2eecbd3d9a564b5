//! Batch simulation configuration.
//!
//! This module provides the configuration type and builder for batch Monte
//! Carlo pricing runs.

use super::error::ConfigError;
use super::estimate::DEFAULT_CONFIDENCE_MULTIPLIER;
use super::strategy::ReductionStrategy;
use crate::rng::{Sampler, SOBOL_MAX_DIMENSIONS};

/// Minimum number of paths per option (the sample variance needs two).
pub const MIN_PATHS: u64 = 2;

/// Maximum number of paths per option.
pub const MAX_PATHS: u64 = 1 << 30;

/// Maximum number of time steps per path.
pub const MAX_STEPS: usize = 10_000;

/// Monte Carlo simulation configuration.
///
/// Immutable configuration shared by every option of a batch. Use
/// [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::mc::SimulationConfig;
/// use pricer_batch::rng::Sampler;
///
/// let config = SimulationConfig::builder()
///     .path_count(262_144)
///     .seed(42)
///     .sampler(Sampler::Sobol)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.path_count(), 262_144);
/// assert_eq!(config.n_steps(), 1);
/// assert_eq!(config.confidence_multiplier(), 1.96);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Paths simulated per option.
    path_count: u64,
    /// Time steps per path.
    n_steps: usize,
    /// Seed of the uniform source.
    seed: u64,
    /// Uniform source.
    sampler: Sampler,
    /// Normal quantile scaling the standard error.
    confidence_multiplier: f64,
    /// Forced reduction strategy, if any.
    strategy: Option<ReductionStrategy>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of paths per option.
    #[inline]
    pub fn path_count(&self) -> u64 {
        self.path_count
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the uniform source.
    #[inline]
    pub fn sampler(&self) -> Sampler {
        self.sampler
    }

    /// Returns the confidence multiplier `z_c`.
    #[inline]
    pub fn confidence_multiplier(&self) -> f64 {
        self.confidence_multiplier
    }

    /// Returns the forced reduction strategy, if any.
    #[inline]
    pub fn strategy(&self) -> Option<ReductionStrategy> {
        self.strategy
    }

    /// Strategy used for a batch of `option_count` options.
    #[inline]
    pub fn strategy_for(&self, option_count: usize) -> ReductionStrategy {
        self.strategy
            .unwrap_or_else(|| ReductionStrategy::select(self.path_count, option_count))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `path_count` is below 2 or above [`MAX_PATHS`]
    /// - `n_steps` is 0 or above [`MAX_STEPS`]
    /// - a Sobol sampler is asked for more than
    ///   [`SOBOL_MAX_DIMENSIONS`](crate::rng::SOBOL_MAX_DIMENSIONS) steps
    /// - `confidence_multiplier` is not finite and positive
    /// - a forced two-phase strategy has zero blocks per option
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PATHS..=MAX_PATHS).contains(&self.path_count) {
            return Err(ConfigError::InvalidPathCount(self.path_count));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if self.sampler == Sampler::Sobol && self.n_steps > SOBOL_MAX_DIMENSIONS {
            return Err(ConfigError::TooManySobolDimensions {
                requested: self.n_steps,
                max: SOBOL_MAX_DIMENSIONS,
            });
        }
        if !self.confidence_multiplier.is_finite() || self.confidence_multiplier <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "confidence_multiplier",
                value: format!("must be finite and positive, got {}", self.confidence_multiplier),
            });
        }
        if let Some(ReductionStrategy::TwoPhase {
            blocks_per_option: 0,
        }) = self.strategy
        {
            return Err(ConfigError::InvalidParameter {
                name: "strategy",
                value: "two-phase strategy needs at least one block per option".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// `path_count` is required; every other field has a default.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    path_count: Option<u64>,
    n_steps: Option<usize>,
    seed: u64,
    sampler: Sampler,
    confidence_multiplier: Option<f64>,
    strategy: Option<ReductionStrategy>,
}

impl SimulationConfigBuilder {
    /// Sets the number of paths per option.
    #[inline]
    pub fn path_count(mut self, path_count: u64) -> Self {
        self.path_count = Some(path_count);
        self
    }

    /// Sets the number of time steps per path (default 1).
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the seed (default 0).
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the uniform source (default pseudo-random).
    #[inline]
    pub fn sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets the confidence multiplier (default 1.96).
    #[inline]
    pub fn confidence_multiplier(mut self, multiplier: f64) -> Self {
        self.confidence_multiplier = Some(multiplier);
        self
    }

    /// Forces a reduction strategy instead of selecting one per batch.
    #[inline]
    pub fn strategy(mut self, strategy: ReductionStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `path_count` is not set or any field is
    /// invalid (see [`SimulationConfig::validate`]).
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let path_count = self.path_count.ok_or(ConfigError::InvalidParameter {
            name: "path_count",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            path_count,
            n_steps: self.n_steps.unwrap_or(1),
            seed: self.seed,
            sampler: self.sampler,
            confidence_multiplier: self
                .confidence_multiplier
                .unwrap_or(DEFAULT_CONFIDENCE_MULTIPLIER),
            strategy: self.strategy,
        };

        config.validate()?;
        Ok(config)
    }
}
