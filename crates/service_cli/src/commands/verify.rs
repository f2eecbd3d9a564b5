//! Verify command implementation
//!
//! Self-check of an installation: inverse CND accuracy, agreement of the two
//! reduction strategies on the same samples, and convergence to
//! Black-Scholes on a random batch.

use pricer_batch::mc::ReductionStrategy;
use pricer_batch::validation::compare_with_black_scholes;
use pricer_core::math::distributions::{inverse_norm_cdf, norm_cdf};
use tracing::{info, warn};

use super::{build_devices, price_on};
use crate::config::CliConfig;
use crate::input::generate_random;
use crate::{CliError, Result};

/// Largest tolerated `|Φ(Φ⁻¹(p)) - p| / min(p, 1 - p)`.
const INVERSE_CND_TOLERANCE: f64 = 1e-6;
/// Largest tolerated relative gap between one- and two-phase estimates.
const STRATEGY_TOLERANCE: f64 = 1e-9;

/// Verify command settings.
#[derive(Debug, Clone)]
pub struct VerifyArgs {
    /// Options in the random batch
    pub options: usize,
    /// Largest accepted L1 relative error against Black-Scholes
    pub tolerance: f64,
}

impl Default for VerifyArgs {
    fn default() -> Self {
        Self {
            options: 128,
            tolerance: 1e-2,
        }
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifySummary {
    pub inverse_cnd_error: f64,
    pub strategy_deviation: f64,
    pub relative_l1: f64,
    pub within_confidence: f64,
}

fn inverse_cnd_error() -> f64 {
    let n = 100_000;
    (1..n)
        .map(|i| {
            let p = i as f64 / n as f64;
            (norm_cdf(inverse_norm_cdf(p)) - p).abs() / p.min(1.0 - p)
        })
        .fold(0.0, f64::max)
}

/// Runs every check and returns the measured figures.
pub fn check(config: &CliConfig, args: &VerifyArgs) -> Result<VerifySummary> {
    let inverse_cnd_error = inverse_cnd_error();

    let contracts = generate_random(args.options, config.seed);
    let devices = build_devices(config)?;

    let one_phase = config
        .simulation_builder()
        .strategy(ReductionStrategy::OnePhase)
        .build()?;
    let two_phase = config
        .simulation_builder()
        .strategy(ReductionStrategy::two_phase_for(contracts.len()))
        .build()?;

    let a = price_on(&devices, &one_phase, &contracts)?;
    let b = price_on(&devices, &two_phase, &contracts)?;
    let strategy_deviation = a
        .iter()
        .zip(&b)
        .map(|(x, y)| (x.expected - y.expected).abs() / x.expected.abs().max(1.0))
        .fold(0.0, f64::max);

    let comparison = compare_with_black_scholes(&contracts, &b)?;

    Ok(VerifySummary {
        inverse_cnd_error,
        strategy_deviation,
        relative_l1: comparison.relative_l1,
        within_confidence: comparison.within_confidence,
    })
}

/// Run the verify command
pub fn run(config: &CliConfig, args: &VerifyArgs) -> Result<()> {
    info!(options = args.options, paths = config.paths, "running self-check");
    let summary = check(config, args)?;

    println!("inverse CND round trip   {:.3e}", summary.inverse_cnd_error);
    println!("one/two-phase deviation  {:.3e}", summary.strategy_deviation);
    println!("L1 error vs Black-Scholes {:.3e}", summary.relative_l1);
    println!(
        "within confidence         {:.1}%",
        summary.within_confidence * 100.0
    );

    if summary.inverse_cnd_error > INVERSE_CND_TOLERANCE {
        return Err(CliError::VerificationFailed(format!(
            "inverse CND round trip error {:.3e} exceeds {:.0e}",
            summary.inverse_cnd_error, INVERSE_CND_TOLERANCE
        )));
    }
    if summary.strategy_deviation > STRATEGY_TOLERANCE {
        return Err(CliError::VerificationFailed(format!(
            "reduction strategies disagree by {:.3e}",
            summary.strategy_deviation
        )));
    }
    if summary.relative_l1 > args.tolerance {
        warn!(relative_l1 = summary.relative_l1, "batch did not converge");
        return Err(CliError::VerificationFailed(format!(
            "L1 relative error {:.3e} exceeds {:.0e}",
            summary.relative_l1, args.tolerance
        )));
    }

    info!("self-check passed");
    Ok(())
}
