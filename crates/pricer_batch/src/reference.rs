//! Serial reference pricer.
//!
//! Prices a batch on the calling thread with one accumulator per option,
//! reading each option's paths in order from the same uniform source the
//! parallel engine uses. The parallel kernels only reorder the summation, so
//! the two agree up to floating-point rounding.

use crate::engine::EngineError;
use crate::mc::{
    accumulate_paths, Accumulator, OptionContract, OptionEstimate, SimulationConfig,
};
use crate::rng::{ShockSource, UniformSource};

/// Prices `contracts` serially.
///
/// `option_offset` numbers the options the same way
/// [`SimulationPlan::with_option_offset`](crate::engine::SimulationPlan::with_option_offset)
/// does.
///
/// # Errors
///
/// Returns `EngineError::InvalidContract` for the first invalid contract.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::mc::{OptionContract, SimulationConfig};
/// use pricer_batch::reference::price_reference;
///
/// let config = SimulationConfig::builder().path_count(10_000).seed(3).build().unwrap();
/// let contracts = [OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2)];
/// let estimates = price_reference(&config, &contracts, 0).unwrap();
/// assert!((estimates[0].expected - 10.45).abs() < 5.0 * estimates[0].confidence);
/// ```
pub fn price_reference(
    config: &SimulationConfig,
    contracts: &[OptionContract],
    option_offset: usize,
) -> Result<Vec<OptionEstimate>, EngineError> {
    let source = ShockSource::new(config.sampler(), config.seed(), config.n_steps())?;
    let mut buffer = vec![0.0; config.n_steps()];

    contracts
        .iter()
        .enumerate()
        .map(|(index, contract)| -> Result<OptionEstimate, EngineError> {
            contract
                .validate()
                .map_err(|source| EngineError::InvalidContract { index, source })?;
            let params = contract.derive();
            if params.deterministic {
                return Ok(OptionEstimate::deterministic(&params));
            }
            let mut acc = Accumulator::new();
            let mut cursor = source.cursor(option_offset + index, 0, config.n_steps());
            accumulate_paths(
                &params,
                &mut cursor,
                config.path_count(),
                &mut buffer,
                &mut acc,
            );
            Ok(OptionEstimate::from_accumulator(
                &acc,
                config.path_count(),
                params.discount,
                config.confidence_multiplier(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_contract_reports_index() {
        let config = SimulationConfig::builder().path_count(10).build().unwrap();
        let contracts = [
            OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2),
            OptionContract::call(-1.0, 100.0, 1.0, 0.05, 0.2),
        ];
        assert!(matches!(
            price_reference(&config, &contracts, 0),
            Err(EngineError::InvalidContract { index: 1, .. })
        ));
    }

    #[test]
    fn test_offset_selects_stream() {
        let config = SimulationConfig::builder().path_count(500).seed(8).build().unwrap();
        let contract = OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2);
        let pair = price_reference(&config, &[contract, contract], 0).unwrap();
        let second = price_reference(&config, &[contract], 1).unwrap();
        assert_eq!(pair[1], second[0]);
        assert_ne!(pair[0], second[0]);
    }
}
