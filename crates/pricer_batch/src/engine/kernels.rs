//! Simulation and reduction kernels.
//!
//! A work-group is one rayon task driving [`LANES_PER_GROUP`] lanes. Lane `l`
//! of an option owns the contiguous path range `chunk_range(N, lanes, l)`,
//! seeks the uniform source once and then reads forward. Lanes keep private
//! accumulators; how those are merged is what distinguishes the kernels.

use rayon::prelude::*;

use crate::mc::{
    accumulate_paths, chunk_range, combine_all, tree_reduce_in_place, Accumulator, DerivedParams,
    LANES_PER_GROUP,
};
use crate::rng::{ShockSource, UniformSource};

/// Read-only inputs shared by every work-group of a launch.
#[derive(Clone, Copy)]
pub(crate) struct KernelArgs<'a> {
    pub table: &'a [DerivedParams],
    pub source: &'a ShockSource,
    pub path_count: u64,
    pub n_steps: usize,
    pub option_offset: usize,
}

impl KernelArgs<'_> {
    /// Accumulates the paths owned by lane `lane` of `lanes` for `option`.
    fn run_lane(
        &self,
        option: usize,
        lanes: usize,
        lane: usize,
        buffer: &mut [f64],
    ) -> Accumulator {
        let mut acc = Accumulator::new();
        let params = &self.table[option];
        if params.deterministic {
            return acc;
        }
        let range = chunk_range(self.path_count, lanes, lane);
        if range.is_empty() {
            return acc;
        }
        let mut cursor = self
            .source
            .cursor(self.option_offset + option, range.start, self.n_steps);
        accumulate_paths(params, &mut cursor, range.end - range.start, buffer, &mut acc);
        acc
    }
}

/// One work-group per option; lanes reduce in-group and write the total.
pub(crate) fn simulate_one_block_per_option(args: KernelArgs<'_>, results: &mut [Accumulator]) {
    results
        .par_iter_mut()
        .enumerate()
        .for_each(|(option, out)| {
            let mut buffer = vec![0.0; args.n_steps];
            let mut lanes = [Accumulator::new(); LANES_PER_GROUP];
            for (lane, slot) in lanes.iter_mut().enumerate() {
                *slot = args.run_lane(option, LANES_PER_GROUP, lane, &mut buffer);
            }
            *out = tree_reduce_in_place(&mut lanes);
        });
}

/// `blocks_per_option` work-groups per option write per-lane partials.
///
/// `scratch` is option-major: option `o` owns
/// `scratch[o * accum_n..(o + 1) * accum_n]` with `accum_n =
/// blocks_per_option * LANES_PER_GROUP`, and block `b` of that option owns
/// the `b`-th run of `LANES_PER_GROUP` slots.
pub(crate) fn simulate_multi_block(
    args: KernelArgs<'_>,
    blocks_per_option: usize,
    scratch: &mut [Accumulator],
) {
    let lanes_per_option = blocks_per_option * LANES_PER_GROUP;
    scratch
        .par_chunks_mut(LANES_PER_GROUP)
        .enumerate()
        .for_each(|(group, slots)| {
            let option = group / blocks_per_option;
            let block = group % blocks_per_option;
            let mut buffer = vec![0.0; args.n_steps];
            for (lane, slot) in slots.iter_mut().enumerate() {
                let global_lane = block * LANES_PER_GROUP + lane;
                *slot = args.run_lane(option, lanes_per_option, global_lane, &mut buffer);
            }
        });
}

/// Second phase: merges each option's `accum_n` partials into its total.
pub(crate) fn reduce_partials(
    scratch: &[Accumulator],
    accum_n: usize,
    results: &mut [Accumulator],
) {
    results
        .par_iter_mut()
        .zip(scratch.par_chunks(accum_n.max(1)))
        .for_each(|(out, partials)| *out = combine_all(partials));
}
