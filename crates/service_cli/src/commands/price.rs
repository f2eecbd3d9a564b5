//! Price command implementation
//!
//! Prices a batch of European options loaded from CSV or generated at random.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use pricer_batch::validation::compare_with_black_scholes;
use tracing::info;

use super::{build_devices, price_on};
use crate::config::CliConfig;
use crate::input::{generate_random, load_csv};
use crate::report::PricingReport;
use crate::{CliError, Result};

/// Where the batch comes from and where the report goes.
#[derive(Debug, Clone, Default)]
pub struct PriceArgs {
    /// CSV file of options
    pub input: Option<PathBuf>,
    /// Number of random options to generate instead of reading a file
    pub random: Option<usize>,
    /// Report file (stdout when absent)
    pub output: Option<PathBuf>,
    /// Add a Black-Scholes comparison
    pub compare: bool,
}

/// Run the price command
pub fn run(config: &CliConfig, args: &PriceArgs) -> Result<()> {
    let contracts = match (&args.input, args.random) {
        (Some(path), None) => load_csv(path)?,
        (None, Some(n)) => generate_random(n, config.seed),
        _ => {
            return Err(CliError::InvalidArgument(
                "exactly one of --input or --random is required".to_string(),
            ))
        }
    };

    let simulation = config.simulation_config()?;
    let devices = build_devices(config)?;
    info!(
        options = contracts.len(),
        paths = simulation.path_count(),
        steps = simulation.n_steps(),
        sampler = %simulation.sampler(),
        devices = devices.len(),
        "pricing batch"
    );

    let start = Instant::now();
    let estimates = price_on(&devices, &simulation, &contracts)?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "pricing complete");

    let comparison = if args.compare {
        Some(compare_with_black_scholes(&contracts, &estimates)?)
    } else {
        None
    };

    let report = PricingReport::new(
        simulation.path_count(),
        simulation.n_steps(),
        simulation.sampler().to_string(),
        &contracts,
        &estimates,
        comparison.as_ref(),
    );

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            report.write(config.format, std::io::BufWriter::new(file))?;
            info!(path = %path.display(), "report written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            report.write(config.format, &mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
