//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod price;
pub mod verify;

use pricer_batch::engine::Device;
use pricer_batch::mc::{OptionContract, OptionEstimate, SimulationConfig};
use pricer_batch::multi_device::price_across_devices;
use pricer_batch::price_batch;
use tracing::debug;

use crate::config::CliConfig;
use crate::Result;

/// Creates the configured devices.
pub(crate) fn build_devices(config: &CliConfig) -> Result<Vec<Device>> {
    let devices = (0..config.devices)
        .map(|id| Device::new(id, config.threads))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(
        devices = devices.len(),
        threads = devices.first().map(Device::threads).unwrap_or(0),
        "devices ready"
    );
    Ok(devices)
}

/// Prices a batch on one device or split across several.
pub(crate) fn price_on(
    devices: &[Device],
    simulation: &SimulationConfig,
    contracts: &[OptionContract],
) -> Result<Vec<OptionEstimate>> {
    let estimates = match devices {
        [device] => price_batch(device, simulation, contracts)?,
        _ => price_across_devices(devices, simulation, contracts)?,
    };
    Ok(estimates)
}
