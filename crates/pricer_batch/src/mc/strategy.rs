//! Reduction strategy selection and launch geometry.
//!
//! The strategy is decided once per batch from `(path_count, option_count)`
//! and owns everything that depends on that decision: how many work-groups
//! are launched, how many partial accumulators each option gets and how large
//! the scratch buffer must be.

use std::ops::Range;

/// Lanes per work-group.
pub const LANES_PER_GROUP: usize = 256;

/// Paths-per-option ratio at and above which the two-phase strategy is used.
pub const MULTI_BLOCK_THRESHOLD: u64 = 8192;

/// Work-groups per option for small batches.
pub const BLOCKS_PER_OPTION_FEW: usize = 64;

/// Work-groups per option for large batches.
pub const BLOCKS_PER_OPTION_MANY: usize = 16;

/// Batches with fewer options than this use [`BLOCKS_PER_OPTION_FEW`].
pub const FEW_OPTIONS: usize = 16;

/// How per-option accumulation is split across work-groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReductionStrategy {
    /// One work-group per option; lanes reduce in-group and the group writes
    /// the final accumulator directly.
    OnePhase,
    /// Several work-groups per option write per-lane partials into scratch;
    /// a second launch merges the partials of each option.
    TwoPhase {
        /// Work-groups assigned to each option.
        blocks_per_option: usize,
    },
}

impl ReductionStrategy {
    /// Picks the strategy for a batch shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_batch::mc::ReductionStrategy;
    ///
    /// assert_eq!(ReductionStrategy::select(8_191, 1), ReductionStrategy::OnePhase);
    /// assert_eq!(
    ///     ReductionStrategy::select(1 << 20, 4),
    ///     ReductionStrategy::TwoPhase { blocks_per_option: 64 }
    /// );
    /// assert_eq!(
    ///     ReductionStrategy::select(1 << 20, 64),
    ///     ReductionStrategy::TwoPhase { blocks_per_option: 16 }
    /// );
    /// ```
    pub fn select(path_count: u64, option_count: usize) -> Self {
        let per_option = path_count / option_count.max(1) as u64;
        if per_option < MULTI_BLOCK_THRESHOLD {
            Self::OnePhase
        } else {
            Self::two_phase_for(option_count)
        }
    }

    /// The two-phase strategy with the block count used for `option_count`.
    pub fn two_phase_for(option_count: usize) -> Self {
        let blocks_per_option = if option_count < FEW_OPTIONS {
            BLOCKS_PER_OPTION_FEW
        } else {
            BLOCKS_PER_OPTION_MANY
        };
        Self::TwoPhase { blocks_per_option }
    }

    /// Returns `true` for [`ReductionStrategy::TwoPhase`].
    #[inline]
    pub fn is_two_phase(&self) -> bool {
        matches!(self, Self::TwoPhase { .. })
    }

    /// Work-groups launched per option.
    #[inline]
    pub fn blocks_per_option(&self) -> usize {
        match self {
            Self::OnePhase => 1,
            Self::TwoPhase { blocks_per_option } => *blocks_per_option,
        }
    }

    /// Partial accumulators per option held in scratch (`accumN`).
    ///
    /// Zero for the one-phase strategy, which needs no scratch.
    #[inline]
    pub fn accumulators_per_option(&self) -> usize {
        match self {
            Self::OnePhase => 0,
            Self::TwoPhase { blocks_per_option } => blocks_per_option * LANES_PER_GROUP,
        }
    }

    /// Scratch length for a batch of `option_count` options.
    #[inline]
    pub fn scratch_len(&self, option_count: usize) -> usize {
        self.accumulators_per_option() * option_count
    }

    /// Launch geometry of the simulation kernel.
    pub fn launch_shape(&self, option_count: usize) -> LaunchShape {
        LaunchShape {
            groups: self.blocks_per_option() * option_count,
            lanes_per_group: LANES_PER_GROUP,
        }
    }

    /// Lanes that share the paths of one option.
    #[inline]
    pub fn lanes_per_option(&self) -> usize {
        self.blocks_per_option() * LANES_PER_GROUP
    }
}

impl std::fmt::Display for ReductionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnePhase => write!(f, "one-phase"),
            Self::TwoPhase { blocks_per_option } => {
                write!(f, "two-phase ({} blocks/option)", blocks_per_option)
            }
        }
    }
}

/// Grid geometry of one kernel launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchShape {
    /// Number of work-groups.
    pub groups: usize,
    /// Lanes per work-group.
    pub lanes_per_group: usize,
}

impl LaunchShape {
    /// Total lanes in the grid.
    #[inline]
    pub fn total_lanes(&self) -> usize {
        self.groups * self.lanes_per_group
    }
}

/// Contiguous share of `total` items owned by part `index` of `parts`.
///
/// Shares differ in length by at most one; the first `total % parts` parts
/// get the longer share.
#[inline]
pub fn chunk_range(total: u64, parts: usize, index: usize) -> Range<u64> {
    let parts = parts.max(1) as u64;
    let index = index as u64;
    let base = total / parts;
    let rem = total % parts;
    let start = index * base + index.min(rem);
    let len = base + u64::from(index < rem);
    start..start + len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(
            ReductionStrategy::select(MULTI_BLOCK_THRESHOLD - 1, 1),
            ReductionStrategy::OnePhase
        );
        assert!(ReductionStrategy::select(MULTI_BLOCK_THRESHOLD, 1).is_two_phase());
        // 2048 options x 8191 paths per option stays one-phase
        assert_eq!(
            ReductionStrategy::select(2048 * (MULTI_BLOCK_THRESHOLD - 1), 2048),
            ReductionStrategy::OnePhase
        );
    }

    #[test]
    fn test_blocks_per_option_depends_on_batch_size() {
        assert_eq!(
            ReductionStrategy::two_phase_for(FEW_OPTIONS - 1).blocks_per_option(),
            BLOCKS_PER_OPTION_FEW
        );
        assert_eq!(
            ReductionStrategy::two_phase_for(FEW_OPTIONS).blocks_per_option(),
            BLOCKS_PER_OPTION_MANY
        );
    }

    #[test]
    fn test_scratch_sizing() {
        assert_eq!(ReductionStrategy::OnePhase.scratch_len(2048), 0);
        let two = ReductionStrategy::TwoPhase {
            blocks_per_option: 16,
        };
        assert_eq!(two.accumulators_per_option(), 16 * 256);
        assert_eq!(two.scratch_len(100), 16 * 256 * 100);
    }

    #[test]
    fn test_launch_shape() {
        let shape = ReductionStrategy::OnePhase.launch_shape(10);
        assert_eq!(shape.groups, 10);
        assert_eq!(shape.total_lanes(), 2560);

        let shape = ReductionStrategy::TwoPhase {
            blocks_per_option: 64,
        }
        .launch_shape(3);
        assert_eq!(shape.groups, 192);
    }

    #[test]
    fn test_zero_options_does_not_divide_by_zero() {
        assert!(ReductionStrategy::select(100_000, 0).is_two_phase());
    }

    #[test]
    fn test_chunk_range_covers_everything_once() {
        for (total, parts) in [(0u64, 3usize), (10, 3), (255, 256), (1000, 256), (7, 1)] {
            let mut next = 0;
            for index in 0..parts {
                let range = chunk_range(total, parts, index);
                assert_eq!(range.start, next);
                assert!(range.end - range.start <= total / parts as u64 + 1);
                next = range.end;
            }
            assert_eq!(next, total);
        }
    }
}
