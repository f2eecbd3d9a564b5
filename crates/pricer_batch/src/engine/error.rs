//! Error types for the batch pricing engine.

use pricer_core::analytical::AnalyticalError;
use thiserror::Error;

use crate::mc::{ConfigError, ContractError};

/// Errors raised while preparing, running or validating a batch.
///
/// Every variant aborts the whole batch: no partial estimates are returned
/// and any device resources of the batch are released before the error
/// reaches the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The batch holds more options than the device table can.
    #[error("batch of {requested} options exceeds device capacity of {capacity}")]
    CapacityExceeded {
        /// Options in the batch.
        requested: usize,
        /// Device table capacity.
        capacity: usize,
    },

    /// An option contract failed validation.
    #[error("option {index} is invalid: {source}")]
    InvalidContract {
        /// Position of the option in the batch.
        index: usize,
        /// What is wrong with it.
        #[source]
        source: ContractError,
    },

    /// The plan was built for a different number of options.
    #[error("plan expects {expected} options, got {actual}")]
    OptionCountMismatch {
        /// Option count of the plan.
        expected: usize,
        /// Contracts supplied.
        actual: usize,
    },

    /// The device already hosts a live batch.
    #[error("device {device} already hosts a live batch")]
    DeviceBusy {
        /// Device id.
        device: usize,
    },

    /// Device (thread pool) construction failed.
    #[error("device initialisation failed: {0}")]
    Device(String),

    /// Device memory could not be reserved.
    #[error("failed to allocate {elements} elements of device memory")]
    Allocation {
        /// Elements requested.
        elements: usize,
    },

    /// A kernel aborted while running.
    #[error("kernel '{kernel}' failed: {message}")]
    LaunchFailed {
        /// Kernel name.
        kernel: &'static str,
        /// Panic message of the failing worker.
        message: String,
    },

    /// A multi-device run was given no devices.
    #[error("no devices available")]
    NoDevices,

    /// Invalid simulation configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Closed-form pricing failed.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::CapacityExceeded {
            requested: 2049,
            capacity: 2048,
        };
        assert_eq!(
            err.to_string(),
            "batch of 2049 options exceeds device capacity of 2048"
        );

        let err = EngineError::InvalidContract {
            index: 3,
            source: ContractError::NonPositiveSpot(0.0),
        };
        assert_eq!(err.to_string(), "option 3 is invalid: spot must be positive, got 0");

        let err = EngineError::LaunchFailed {
            kernel: "reduce_partials",
            message: "boom".to_string(),
        };
        assert!(err.to_string().contains("reduce_partials"));
    }

    #[test]
    fn test_from_config_error() {
        let err: EngineError = ConfigError::InvalidPathCount(0).into();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(err.to_string().contains("Invalid path count 0"));
    }
}
