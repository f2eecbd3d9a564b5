//! Terminal price simulation under risk-neutral GBM.

use super::accumulator::Accumulator;
use super::contract::DerivedParams;
use crate::rng::{uniforms_to_shocks, PathCursor};

/// Terminal asset price of one path driven by `shocks`.
///
/// A single shock gives `S · exp(MuByT + VBySqrtT · z)`. With `n` shocks the
/// log price takes `n` equal steps of drift `MuByT / n` and diffusion
/// `VBySqrtT / √n`, which has the same terminal distribution.
#[inline]
pub fn terminal_price(params: &DerivedParams, shocks: &[f64]) -> f64 {
    match shocks {
        [z] => params.spot * (params.mu_by_t + params.v_by_sqrt_t * z).exp(),
        _ => {
            let n = shocks.len() as f64;
            let drift = params.mu_by_t / n;
            let diffusion = params.v_by_sqrt_t / n.sqrt();
            let log_return = shocks
                .iter()
                .fold(0.0, |acc, z| acc + drift + diffusion * z);
            params.spot * log_return.exp()
        }
    }
}

/// Undiscounted payoff of one path.
///
/// Discounting is applied once per option when the estimate is finalised.
#[inline]
pub fn simulate_payoff(params: &DerivedParams, shocks: &[f64]) -> f64 {
    params
        .option_type
        .payoff(terminal_price(params, shocks), params.strike)
}

/// Simulates `count` consecutive paths read from `cursor` into `acc`.
///
/// `buffer` holds one path worth of samples; its length is the step count.
pub fn accumulate_paths<C: PathCursor>(
    params: &DerivedParams,
    cursor: &mut C,
    count: u64,
    buffer: &mut [f64],
    acc: &mut Accumulator,
) {
    for _ in 0..count {
        cursor.next_path(buffer);
        uniforms_to_shocks(buffer);
        acc.accumulate(simulate_payoff(params, buffer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::OptionContract;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_step_formula() {
        let params = OptionContract::call(100.0, 100.0, 1.0, 0.05, 0.2).derive();
        let z = 0.7;
        assert_relative_eq!(
            terminal_price(&params, &[z]),
            100.0 * (0.03_f64 + 0.2 * z).exp(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_multi_step_equals_single_step_on_aggregate_shock() {
        // Σ z_i / √n is the equivalent single-step shock
        let params = OptionContract::call(100.0, 100.0, 2.0, 0.05, 0.3).derive();
        let shocks = [0.4, -1.2, 0.9, 0.1];
        let aggregate = shocks.iter().sum::<f64>() / 2.0;
        assert_relative_eq!(
            terminal_price(&params, &shocks),
            terminal_price(&params, &[aggregate]),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_shock_path_is_forward_drift() {
        let params = OptionContract::put(100.0, 120.0, 1.0, 0.05, 0.2).derive();
        let terminal = terminal_price(&params, &[0.0]);
        assert_relative_eq!(terminal, 100.0 * params.mu_by_t.exp(), max_relative = 1e-15);
        assert_relative_eq!(
            simulate_payoff(&params, &[0.0]),
            120.0 - terminal,
            max_relative = 1e-15
        );
    }

    struct Constant(f64);

    impl PathCursor for Constant {
        fn next_path(&mut self, out: &mut [f64]) {
            out.fill(self.0);
        }
    }

    #[test]
    fn test_accumulate_paths_counts_every_path() {
        let params = OptionContract::call(100.0, 50.0, 1.0, 0.0, 0.2).derive();
        let mut buffer = [0.0; 2];
        let mut acc = Accumulator::new();
        accumulate_paths(&params, &mut Constant(0.5), 10, &mut buffer, &mut acc);

        let payoff = simulate_payoff(&params, &[0.0, 0.0]);
        assert_relative_eq!(acc.sum(), 10.0 * payoff, max_relative = 1e-14);
        assert_relative_eq!(acc.sum_squares(), 10.0 * payoff * payoff, max_relative = 1e-14);
    }
}
