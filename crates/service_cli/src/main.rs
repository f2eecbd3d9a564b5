//! mcbatch - Monte Carlo batch pricing of European options
//!
//! Command-line front end of the batch engine.
//!
//! # Commands
//!
//! - `mcbatch price --input options.csv` - Price a batch read from CSV
//! - `mcbatch price --random 4096 --compare` - Price a random batch and compare
//!   with Black-Scholes
//! - `mcbatch verify` - Self-check of accuracy and reduction consistency
//!
//! Settings come from defaults, a TOML file (`--config`), `MCBATCH_*`
//! environment variables and flags, in increasing priority.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricer_batch::rng::Sampler;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod input;
mod report;

pub use error::{CliError, Result};

use commands::price::PriceArgs;
use commands::verify::VerifyArgs;
use config::{build_config, CliArgs, LogLevel, OutputFormat};

/// Monte Carlo batch pricer for European options
#[derive(Parser)]
#[command(name = "mcbatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Monte Carlo paths per option
    #[arg(short, long, global = true)]
    paths: Option<u64>,

    /// Random seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Time steps per path
    #[arg(long, global = true)]
    steps: Option<usize>,

    /// Uniform sampler (pseudo, sobol)
    #[arg(long, global = true)]
    sampler: Option<Sampler>,

    /// Worker threads per device (0 = one per CPU)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    /// Devices to split the batch across
    #[arg(short, long, global = true)]
    devices: Option<usize>,

    /// Confidence multiplier of the reported interval
    #[arg(long, global = true)]
    confidence: Option<f64>,

    /// Output format (table, json, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a batch of options
    Price {
        /// CSV file with columns spot,strike,expiry,rate,volatility[,type]
        #[arg(short, long, conflicts_with = "random")]
        input: Option<PathBuf>,

        /// Generate this many random options instead of reading a file
        #[arg(short, long)]
        random: Option<usize>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compare each estimate with its Black-Scholes price
        #[arg(long)]
        compare: bool,
    },

    /// Check accuracy and reduction consistency on a random batch
    Verify {
        /// Options in the random batch
        #[arg(long, default_value = "128")]
        options: usize,

        /// Largest accepted L1 relative error against Black-Scholes
        #[arg(long, default_value = "0.01")]
        tolerance: f64,
    },
}

impl Cli {
    fn config_args(&self) -> CliArgs {
        let log_level = match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level),
            (None, true) => Some(LogLevel::Debug),
            (None, false) => None,
        };
        CliArgs {
            config_file: self.config.clone(),
            paths: self.paths,
            seed: self.seed,
            steps: self.steps,
            sampler: self.sampler,
            threads: self.threads,
            devices: self.devices,
            confidence_multiplier: self.confidence,
            log_level,
            format: self.format,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.config_args())?;

    init_tracing(config.log_level.as_filter_str());
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Price {
            input,
            random,
            output,
            compare,
        } => commands::price::run(
            &config,
            &PriceArgs {
                input,
                random,
                output,
                compare,
            },
        ),
        Commands::Verify { options, tolerance } => {
            commands::verify::run(&config, &VerifyArgs { options, tolerance })
        }
    }
}
