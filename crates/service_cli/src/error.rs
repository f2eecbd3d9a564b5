//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `mcbatch` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed option row in an input file.
    #[error("Invalid option at row {row}: {message}")]
    InvalidInput {
        /// 1-based data row (header excluded).
        row: usize,
        /// What is wrong with it.
        message: String,
    },

    /// A self-check did not pass.
    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    /// CLI configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Simulation configuration rejected by the engine.
    #[error("Simulation configuration: {0}")]
    Simulation(#[from] pricer_batch::mc::ConfigError),

    /// Pricing engine error.
    #[error("Engine error: {0}")]
    Engine(#[from] pricer_batch::EngineError),

    /// CSV read or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialisation error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
