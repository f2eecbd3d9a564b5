//! Batch lifecycle, capacity limits and degenerate contracts.

use pricer_batch::engine::{
    price_batch, Device, EngineError, MonteCarloEngine, SimulationPlan, MAX_OPTIONS,
};
use pricer_batch::mc::{OptionContract, SimulationConfig};

fn config(paths: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .path_count(paths)
        .seed(7)
        .build()
        .unwrap()
}

fn atm_calls(n: usize) -> Vec<OptionContract> {
    vec![OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2); n]
}

#[test]
fn test_batch_at_capacity_succeeds() {
    let device = Device::new(0, 4).unwrap();
    let estimates = price_batch(&device, &config(16), &atm_calls(MAX_OPTIONS)).unwrap();
    assert_eq!(estimates.len(), MAX_OPTIONS);
    assert!(estimates.iter().all(|e| e.expected.is_finite()));
}

#[test]
fn test_batch_past_capacity_fails_without_side_effects() {
    let device = Device::new(0, 2).unwrap();
    let err = price_batch(&device, &config(16), &atm_calls(MAX_OPTIONS + 1)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::CapacityExceeded {
            requested,
            capacity,
        } if requested == MAX_OPTIONS + 1 && capacity == MAX_OPTIONS
    ));
    assert!(!device.is_busy());

    // The device is immediately usable for a valid batch.
    let estimates = price_batch(&device, &config(16), &atm_calls(3)).unwrap();
    assert_eq!(estimates.len(), 3);
}

#[test]
fn test_zero_volatility_is_exact() {
    let device = Device::new(0, 2).unwrap();
    let (s, x, t, r) = (100.0_f64, 95.0_f64, 2.0_f64, 0.05_f64);
    let contracts = vec![
        OptionContract::call(s, x, t, r, 0.0),
        OptionContract::call(s, x, t, r, 0.2),
        OptionContract::put(s, 120.0, t, r, 0.0),
    ];

    let estimates = price_batch(&device, &config(100_000), &contracts).unwrap();

    let discount = (-r * t).exp();
    assert_eq!(estimates[0].expected, discount * (s * (r * t).exp() - x).max(0.0));
    assert_eq!(estimates[0].confidence, 0.0);
    assert_eq!(estimates[2].expected, discount * (120.0 - s * (r * t).exp()).max(0.0));
    assert_eq!(estimates[2].confidence, 0.0);
    assert!(estimates[1].confidence > 0.0);
}

#[test]
fn test_expired_options_pay_intrinsic() {
    let device = Device::new(0, 1).unwrap();
    let contracts = [
        OptionContract::call(110.0, 100.0, 0.0, 0.05, 0.2),
        OptionContract::put(110.0, 100.0, 0.0, 0.05, 0.2),
    ];
    let estimates = price_batch(&device, &config(1_000), &contracts).unwrap();
    assert_eq!(estimates[0].expected, 10.0);
    assert_eq!(estimates[1].expected, 0.0);
    assert!(estimates.iter().all(|e| e.confidence == 0.0));
}

#[test]
fn test_invalid_contract_aborts_batch() {
    let device = Device::new(0, 1).unwrap();
    let mut contracts = atm_calls(4);
    contracts[2].expiry = -1.0;
    let err = price_batch(&device, &config(100), &contracts).unwrap_err();
    assert!(matches!(err, EngineError::InvalidContract { index: 2, .. }));
    assert!(!device.is_busy());
}

#[test]
fn test_reinitialized_batch_matches_fresh_engine() {
    let device = Device::new(0, 2).unwrap();
    let engine = MonteCarloEngine::new(&device);
    let first_batch = atm_calls(2);
    let second_batch = vec![
        OptionContract::put(20.0, 22.0, 0.5, 0.06, 0.1),
        OptionContract::call(20.0, 18.0, 1.5, 0.06, 0.1),
        OptionContract::call(20.0, 25.0, 3.0, 0.06, 0.1),
    ];
    let cfg = config(30_000);

    let batch = engine
        .initialize(SimulationPlan::new(&cfg, first_batch.len()), &first_batch)
        .unwrap();
    let (_, finalized) = batch.run().unwrap().finalize();
    let batch = finalized
        .reinitialize(SimulationPlan::new(&cfg, second_batch.len()), &second_batch)
        .unwrap();
    assert_eq!(batch.plan().option_count(), 3);
    let (reused, finalized) = batch.run().unwrap().finalize();
    finalized.close();

    let fresh = price_batch(&device, &cfg, &second_batch).unwrap();
    assert_eq!(reused, fresh);
}

#[test]
fn test_empty_batch() {
    let device = Device::new(0, 1).unwrap();
    let estimates = price_batch(&device, &config(100), &[]).unwrap();
    assert!(estimates.is_empty());
    assert!(!device.is_busy());
}
