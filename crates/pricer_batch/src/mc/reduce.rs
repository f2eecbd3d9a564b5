//! Generic reductions over partial results.
//!
//! Both reductions only require the merge operation to be associative and
//! commutative; neither makes any promise about the order in which partials
//! are combined beyond being deterministic for a given input length.

/// A partial statistic that can be combined with another over disjoint data.
pub trait Mergeable: Copy {
    /// The neutral element of [`merged`](Self::merged).
    fn identity() -> Self;

    /// Combines two partials.
    fn merged(self, other: Self) -> Self;
}

/// Pairwise tree reduction of `partials`.
///
/// Returns `identity` for an empty slice. The recursion splits the slice in
/// halves, which keeps the rounding error of a floating-point sum at
/// `O(log n)` rather than `O(n)`.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::mc::combine;
///
/// let maxima = [3, 9, 4, 1];
/// assert_eq!(combine(&maxima, i32::MIN, |a, b| a.max(b)), 9);
/// assert_eq!(combine(&[] as &[f64], 0.0, |a, b| a + b), 0.0);
/// ```
pub fn combine<T, F>(partials: &[T], identity: T, merge: F) -> T
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    fn pairwise<T: Copy, F: Fn(T, T) -> T>(partials: &[T], merge: &F) -> T {
        match partials.len() {
            1 => partials[0],
            2 => merge(partials[0], partials[1]),
            n => {
                let (left, right) = partials.split_at(n / 2);
                merge(pairwise(left, merge), pairwise(right, merge))
            }
        }
    }

    if partials.is_empty() {
        identity
    } else {
        pairwise(partials, &merge)
    }
}

/// [`combine`] for [`Mergeable`] partials.
#[inline]
pub fn combine_all<T: Mergeable>(partials: &[T]) -> T {
    combine(partials, T::identity(), T::merged)
}

/// Work-group style tree reduction that overwrites `values`.
///
/// Each round folds the upper half of the live range onto the lower half,
/// the way lanes of a work-group reduce through shared memory. The result
/// ends up in `values[0]` and is also returned.
pub fn tree_reduce_in_place<T: Mergeable>(values: &mut [T]) -> T {
    let mut live = values.len();
    if live == 0 {
        return T::identity();
    }
    while live > 1 {
        let half = live.div_ceil(2);
        for i in 0..live / 2 {
            values[i] = values[i].merged(values[i + half]);
        }
        live = half;
    }
    values[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::Accumulator;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_combine_single_and_empty() {
        assert_eq!(combine(&[7u64], 0, |a, b| a + b), 7);
        assert_eq!(combine(&[] as &[u64], 0, |a, b| a + b), 0);
    }

    #[test]
    fn test_tree_reduce_non_power_of_two() {
        let mut values: Vec<Accumulator> = (1..=7)
            .map(|i| Accumulator::from_parts(i as f64, (i * i) as f64))
            .collect();
        let total = tree_reduce_in_place(&mut values);
        assert_eq!(total.sum(), 28.0);
        assert_eq!(total.sum_squares(), 140.0);
        assert_eq!(values[0], total);
    }

    #[test]
    fn test_tree_reduce_empty_is_identity() {
        let mut values: Vec<Accumulator> = Vec::new();
        assert_eq!(tree_reduce_in_place(&mut values), Accumulator::new());
    }

    proptest! {
        #[test]
        fn prop_reductions_agree_with_serial_sum(
            xs in proptest::collection::vec(-1e3f64..1e3, 0..300),
        ) {
            let serial: f64 = xs.iter().sum();
            let pairwise = combine(&xs, 0.0, |a, b| a + b);

            let mut lanes: Vec<Accumulator> =
                xs.iter().map(|&x| Accumulator::from_parts(x, x * x)).collect();
            let tree = tree_reduce_in_place(&mut lanes);
            let merged = combine_all(
                &xs.iter().map(|&x| Accumulator::from_parts(x, x * x)).collect::<Vec<_>>(),
            );

            assert_relative_eq!(pairwise, serial, epsilon = 1e-8, max_relative = 1e-10);
            assert_relative_eq!(tree.sum(), serial, epsilon = 1e-8, max_relative = 1e-10);
            assert_relative_eq!(merged.sum(), serial, epsilon = 1e-8, max_relative = 1e-10);
        }

        #[test]
        fn prop_integer_combine_is_exact(xs in proptest::collection::vec(0u32..1000, 0..500)) {
            let expected: u64 = xs.iter().map(|&x| u64::from(x)).sum();
            let widened: Vec<u64> = xs.iter().map(|&x| u64::from(x)).collect();
            prop_assert_eq!(combine(&widened, 0, |a, b| a + b), expected);
        }
    }
}
