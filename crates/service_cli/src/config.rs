//! CLI configuration management
//!
//! Settings are layered, later sources overriding earlier ones:
//! defaults, then a TOML file, then `MCBATCH_*` environment variables, then
//! command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_batch::mc::{SimulationConfig, SimulationConfigBuilder};
use pricer_batch::rng::Sampler;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable for the path count.
pub const ENV_PATHS: &str = "MCBATCH_PATHS";
/// Environment variable for the seed.
pub const ENV_SEED: &str = "MCBATCH_SEED";
/// Environment variable for worker threads per device.
pub const ENV_THREADS: &str = "MCBATCH_THREADS";
/// Environment variable for the log level.
pub const ENV_LOG_LEVEL: &str = "MCBATCH_LOG_LEVEL";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown output format name.
    #[error("Invalid output format: {0}. Must be one of: table, json, csv")]
    InvalidFormat(String),

    /// Unparsable value.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Paths per option
    pub paths: u64,
    /// Seed of the uniform source
    pub seed: u64,
    /// Time steps per path
    pub steps: usize,
    /// Uniform source
    pub sampler: Sampler,
    /// Worker threads per device (0 = one per CPU)
    pub threads: usize,
    /// Number of devices the batch is split across
    pub devices: usize,
    /// Confidence multiplier
    pub confidence_multiplier: f64,
    /// Log level
    pub log_level: LogLevel,
    /// Report format
    pub format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            paths: 262_144,
            seed: 0,
            steps: 1,
            sampler: Sampler::Pseudo,
            threads: 0,
            devices: 1,
            confidence_multiplier: 1.96,
            log_level: LogLevel::Info,
            format: OutputFormat::Table,
        }
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override settings from `MCBATCH_*` variables found through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PATHS) {
            self.paths = parse_env(ENV_PATHS, value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.seed = parse_env(ENV_SEED, value)?;
        }
        if let Some(value) = lookup(ENV_THREADS) {
            self.threads = parse_env(ENV_THREADS, value)?;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&value)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(paths) = cli.paths {
            self.paths = paths;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(steps) = cli.steps {
            self.steps = steps;
        }
        if let Some(sampler) = cli.sampler {
            self.sampler = sampler;
        }
        if let Some(threads) = cli.threads {
            self.threads = threads;
        }
        if let Some(devices) = cli.devices {
            self.devices = devices;
        }
        if let Some(multiplier) = cli.confidence_multiplier {
            self.confidence_multiplier = multiplier;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
    }

    /// Validate the settings the engine does not check itself
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devices == 0 {
            return Err(ConfigError::InvalidValue {
                name: "devices",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Engine configuration builder preloaded with these settings
    pub fn simulation_builder(&self) -> SimulationConfigBuilder {
        SimulationConfig::builder()
            .path_count(self.paths)
            .seed(self.seed)
            .n_steps(self.steps)
            .sampler(self.sampler)
            .confidence_multiplier(self.confidence_multiplier)
    }

    /// Engine configuration for these settings
    pub fn simulation_config(&self) -> Result<SimulationConfig, pricer_batch::mc::ConfigError> {
        self.simulation_builder().build()
    }
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Path count override
    pub paths: Option<u64>,
    /// Seed override
    pub seed: Option<u64>,
    /// Step count override
    pub steps: Option<usize>,
    /// Sampler override
    pub sampler: Option<Sampler>,
    /// Threads per device override
    pub threads: Option<usize>,
    /// Device count override
    pub devices: Option<usize>,
    /// Confidence multiplier override
    pub confidence_multiplier: Option<f64>,
    /// Log level override
    pub log_level: Option<LogLevel>,
    /// Output format override
    pub format: Option<OutputFormat>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    build_config_with_env(cli, |name| std::env::var(name).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    config.apply_env(lookup)?;
    config.merge_with_cli(cli);
    config.validate()?;
    Ok(config)
}
