//! Round-trip accuracy of the inverse CND against the normal CDF.
//!
//! The inverse is accurate to ~1e-9 relative and the CDF to ~1.2e-7
//! relative on the tail mass, so `Φ(Φ⁻¹(p))` must recover `p` to a few
//! parts in 1e-7 of `min(p, 1 - p)` everywhere in (1e-6, 1 - 1e-6).

use pricer_core::math::distributions::{inverse_norm_cdf, norm_cdf};
use proptest::prelude::*;

const ROUND_TRIP_REL_TOL: f64 = 5e-7;

fn round_trip_error(p: f64) -> f64 {
    (norm_cdf(inverse_norm_cdf(p)) - p).abs()
}

fn tolerance(p: f64) -> f64 {
    ROUND_TRIP_REL_TOL * p.min(1.0 - p)
}

#[test]
fn test_round_trip_dense_linear_grid() {
    let n = 100_000;
    for i in 1..n {
        let p = i as f64 / n as f64;
        let err = round_trip_error(p);
        assert!(err <= tolerance(p), "p={} err={}", p, err);
    }
}

#[test]
fn test_round_trip_log_spaced_tails() {
    // 1e-6 .. 0.5 in both tails
    let steps = 2_000;
    let (lo, hi) = (-6.0, 0.5_f64.log10());
    for i in 0..=steps {
        let exponent = lo + (hi - lo) * i as f64 / steps as f64;
        let p = 10f64.powf(exponent);
        for &q in &[p, 1.0 - p] {
            let err = round_trip_error(q);
            assert!(err <= tolerance(q), "p={} err={}", q, err);
        }
    }
}

#[test]
fn test_median_maps_to_zero() {
    assert_eq!(inverse_norm_cdf(0.5_f64), 0.0);
}

#[test]
fn test_symmetry_about_median() {
    for i in 1..500 {
        let p = i as f64 / 1000.0;
        let lower = inverse_norm_cdf(p);
        let upper = inverse_norm_cdf(1.0 - p);
        assert!(
            (lower + upper).abs() <= 1e-8 * lower.abs().max(1.0),
            "p={} lower={} upper={}",
            p,
            lower,
            upper
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn prop_round_trip(p in 1e-6f64..(1.0 - 1e-6)) {
        let err = round_trip_error(p);
        prop_assert!(err <= tolerance(p), "p={} err={}", p, err);
    }

    #[test]
    fn prop_inverse_is_finite_on_open_interval(p in f64::MIN_POSITIVE..1.0) {
        prop_assume!(p < 1.0);
        prop_assert!(inverse_norm_cdf(p).is_finite());
    }
}
