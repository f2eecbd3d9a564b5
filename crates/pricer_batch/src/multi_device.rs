//! Pricing one batch across several devices.
//!
//! The batch is cut into contiguous slices of near-equal size, one per
//! device, with the remainder going to the leading devices. Each slice is
//! priced with the global index of its first option as stream offset, so the
//! estimates match a single-device run up to summation order.

use std::ops::Range;

use rayon::prelude::*;
use tracing::debug;

use crate::engine::{Device, EngineError, MonteCarloEngine, SimulationPlan, MAX_OPTIONS};
use crate::mc::{chunk_range, OptionContract, OptionEstimate, SimulationConfig};

/// Contiguous index ranges of `option_count` options over `device_count`
/// devices. Devices left without options get an empty range.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::multi_device::split_batch;
///
/// assert_eq!(split_batch(10, 3), vec![0..4, 4..7, 7..10]);
/// ```
pub fn split_batch(option_count: usize, device_count: usize) -> Vec<Range<usize>> {
    (0..device_count)
        .map(|device| {
            let range = chunk_range(option_count as u64, device_count, device);
            range.start as usize..range.end as usize
        })
        .collect()
}

/// Prices `contracts` across `devices` and returns the estimates in input
/// order.
///
/// # Errors
///
/// - `NoDevices` if `devices` is empty
/// - `CapacityExceeded` if any slice exceeds [`MAX_OPTIONS`]; checked before
///   any device is touched
/// - any error of the per-device lifecycle; the first one aborts the batch
pub fn price_across_devices(
    devices: &[Device],
    config: &SimulationConfig,
    contracts: &[OptionContract],
) -> Result<Vec<OptionEstimate>, EngineError> {
    if devices.is_empty() {
        return Err(EngineError::NoDevices);
    }

    let slices = split_batch(contracts.len(), devices.len());
    let largest = slices.iter().map(|s| s.len()).max().unwrap_or(0);
    if largest > MAX_OPTIONS {
        return Err(EngineError::CapacityExceeded {
            requested: largest,
            capacity: MAX_OPTIONS,
        });
    }
    debug!(
        devices = devices.len(),
        options = contracts.len(),
        "splitting batch across devices"
    );

    let per_device = devices
        .par_iter()
        .zip(slices)
        .filter(|(_, slice)| !slice.is_empty())
        .map(|(device, slice)| -> Result<Vec<OptionEstimate>, EngineError> {
            let plan = SimulationPlan::new(config, slice.len()).with_option_offset(slice.start);
            let batch = MonteCarloEngine::new(device).initialize(plan, &contracts[slice])?;
            let (estimates, finalized) = batch.run()?.finalize();
            finalized.close();
            Ok(estimates)
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(per_device.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_batch_remainder_to_leading_devices() {
        assert_eq!(split_batch(7, 3), vec![0..3, 3..5, 5..7]);
        assert_eq!(split_batch(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
        assert_eq!(split_batch(0, 2), vec![0..0, 0..0]);
    }

    #[test]
    fn test_no_devices() {
        let config = SimulationConfig::builder().path_count(10).build().unwrap();
        assert!(matches!(
            price_across_devices(&[], &config, &[]),
            Err(EngineError::NoDevices)
        ));
    }

    #[test]
    fn test_slice_capacity_checked_up_front() {
        let devices = vec![Device::new(0, 1).unwrap(), Device::new(1, 1).unwrap()];
        let config = SimulationConfig::builder().path_count(10).build().unwrap();
        let contracts =
            vec![OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2); 2 * MAX_OPTIONS + 1];
        assert!(matches!(
            price_across_devices(&devices, &config, &contracts),
            Err(EngineError::CapacityExceeded {
                requested,
                capacity: MAX_OPTIONS
            }) if requested == MAX_OPTIONS + 1
        ));
        assert!(devices.iter().all(|d| !d.is_busy()));
    }

    #[test]
    fn test_two_full_devices_accept_twice_the_capacity() {
        let devices = vec![Device::new(0, 1).unwrap(), Device::new(1, 1).unwrap()];
        let config = SimulationConfig::builder().path_count(2).build().unwrap();
        let contracts = vec![OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2); 2 * MAX_OPTIONS];
        let estimates = price_across_devices(&devices, &config, &contracts).unwrap();
        assert_eq!(estimates.len(), 2 * MAX_OPTIONS);
    }
}
