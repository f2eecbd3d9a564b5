//! Sobol low-discrepancy sequences.
//!
//! Direction numbers follow the Joe-Kuo construction for the first
//! [`SOBOL_MAX_DIMENSIONS`] dimensions. Points are generated in Gray-code
//! order (Antonov-Saleev), so advancing by one point costs a single XOR per
//! dimension and seeking to an arbitrary index costs one XOR per set bit.
//!
//! The origin is skipped: index 0 is never emitted, and path `p` of a batch
//! maps to sequence index `p + 1`.

use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::source::{PathCursor, UniformSource};
use crate::mc::error::ConfigError;

/// Largest dimension supported by the built-in direction numbers.
pub const SOBOL_MAX_DIMENSIONS: usize = 10;

const SOBOL_BITS: usize = 32;
const SCALE: f64 = 1.0 / 4_294_967_296.0;

/// `(degree, polynomial, initial m_k)` for dimensions 2..=10.
const JOE_KUO: [(usize, u32, &[u32]); SOBOL_MAX_DIMENSIONS - 1] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
];

/// Trait for low-discrepancy sequences used in quasi-Monte Carlo methods.
pub trait LowDiscrepancySequence {
    /// Returns the dimensionality of the sequence.
    fn dimension(&self) -> usize;

    /// Advances the sequence and returns the next point.
    ///
    /// The returned slice holds `dimension()` values in (0, 1).
    fn next_point(&mut self) -> &[f64];

    /// Resets the sequence to its initial state.
    fn reset(&mut self);

    /// Skips ahead by `n` points in the sequence.
    fn skip(&mut self, n: usize);
}

/// Direction numbers `v[dim][bit]`.
#[derive(Debug)]
struct DirectionTable {
    v: Vec<[u32; SOBOL_BITS]>,
}

impl DirectionTable {
    fn new(dimension: usize) -> Self {
        let mut v = Vec::with_capacity(dimension);

        let mut first = [0u32; SOBOL_BITS];
        for (k, slot) in first.iter_mut().enumerate() {
            *slot = 1 << (SOBOL_BITS - 1 - k);
        }
        v.push(first);

        for &(degree, poly, m) in JOE_KUO.iter().take(dimension.saturating_sub(1)) {
            let mut dir = [0u32; SOBOL_BITS];
            for k in 0..degree {
                dir[k] = m[k] << (SOBOL_BITS - 1 - k);
            }
            for k in degree..SOBOL_BITS {
                let mut value = dir[k - degree] ^ (dir[k - degree] >> degree);
                for i in 1..degree {
                    if (poly >> (degree - 1 - i)) & 1 == 1 {
                        value ^= dir[k - i];
                    }
                }
                dir[k] = value;
            }
            v.push(dir);
        }

        Self { v }
    }

    /// Raw integer coordinates of the point at `index`.
    fn point_at(&self, index: u64, out: &mut [u32]) {
        let gray = index ^ (index >> 1);
        for (x, dir) in out.iter_mut().zip(&self.v) {
            let mut acc = 0u32;
            let mut bits = gray;
            let mut k = 0;
            while bits != 0 && k < SOBOL_BITS {
                if bits & 1 == 1 {
                    acc ^= dir[k];
                }
                bits >>= 1;
                k += 1;
            }
            *x = acc;
        }
    }
}

/// Sobol sequence generator with an optional digital shift.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::rng::{LowDiscrepancySequence, SobolSequence};
///
/// let mut sobol = SobolSequence::new(2).unwrap();
/// assert_eq!(sobol.next_point(), &[0.5 + 0.5 / 4_294_967_296.0; 2][..]);
/// ```
#[derive(Clone, Debug)]
pub struct SobolSequence {
    table: Arc<DirectionTable>,
    shifts: Vec<u32>,
    /// Index of the next point to emit.
    index: u64,
    /// Raw coordinates of the point at `index`.
    state: Vec<u32>,
    buffer: Vec<f64>,
}

impl SobolSequence {
    /// Creates an unshifted sequence of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManySobolDimensions` if `dimension` is zero or
    /// exceeds [`SOBOL_MAX_DIMENSIONS`].
    pub fn new(dimension: usize) -> Result<Self, ConfigError> {
        check_dimension(dimension)?;
        Ok(Self::from_table(
            Arc::new(DirectionTable::new(dimension)),
            vec![0; dimension],
            1,
        ))
    }

    fn from_table(table: Arc<DirectionTable>, shifts: Vec<u32>, start: u64) -> Self {
        let dimension = shifts.len();
        let mut sequence = Self {
            table,
            shifts,
            index: start,
            state: vec![0; dimension],
            buffer: vec![0.0; dimension],
        };
        sequence.seek(start);
        sequence
    }

    fn seek(&mut self, index: u64) {
        self.index = index;
        self.table.point_at(index, &mut self.state);
    }

    /// Returns the index of the next point to be emitted.
    #[inline]
    pub fn position(&self) -> u64 {
        self.index
    }

    fn emit_into(&mut self, out: &mut [f64]) {
        for ((u, &x), &shift) in out.iter_mut().zip(&self.state).zip(&self.shifts) {
            *u = ((x ^ shift) as f64 + 0.5) * SCALE;
        }
        self.index += 1;
        let bit = (self.index.trailing_zeros() as usize).min(SOBOL_BITS - 1);
        for (x, dir) in self.state.iter_mut().zip(&self.table.v) {
            *x ^= dir[bit];
        }
    }
}

impl LowDiscrepancySequence for SobolSequence {
    fn dimension(&self) -> usize {
        self.state.len()
    }

    fn next_point(&mut self) -> &[f64] {
        let mut buffer = std::mem::take(&mut self.buffer);
        self.emit_into(&mut buffer);
        self.buffer = buffer;
        &self.buffer
    }

    fn reset(&mut self) {
        self.seek(1);
    }

    fn skip(&mut self, n: usize) {
        self.seek(self.index + n as u64);
    }
}

fn check_dimension(dimension: usize) -> Result<(), ConfigError> {
    if dimension == 0 || dimension > SOBOL_MAX_DIMENSIONS {
        return Err(ConfigError::TooManySobolDimensions {
            requested: dimension,
            max: SOBOL_MAX_DIMENSIONS,
        });
    }
    Ok(())
}

/// Randomised quasi-Monte Carlo uniform source.
///
/// Every option sees the same Sobol points, XOR-shifted by a random digital
/// shift drawn from the ChaCha8 stream of that option. The shift keeps the
/// low-discrepancy structure while decorrelating options and making the
/// estimator unbiased.
#[derive(Clone, Debug)]
pub struct SobolSource {
    table: Arc<DirectionTable>,
    dimension: usize,
    seed: u64,
}

impl SobolSource {
    /// Creates a source for paths of `dimension` time steps.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManySobolDimensions` if `dimension` is zero or
    /// exceeds [`SOBOL_MAX_DIMENSIONS`].
    pub fn new(dimension: usize, seed: u64) -> Result<Self, ConfigError> {
        check_dimension(dimension)?;
        Ok(Self {
            table: Arc::new(DirectionTable::new(dimension)),
            dimension,
            seed,
        })
    }

    /// Digital shift of each dimension for `option`.
    fn shifts(&self, option: usize) -> Vec<u32> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(option as u64);
        (0..self.dimension).map(|_| rng.next_u32()).collect()
    }
}

/// Sequential reader over the shifted Sobol points of one option.
#[derive(Clone, Debug)]
pub struct SobolCursor {
    sequence: SobolSequence,
}

impl PathCursor for SobolCursor {
    #[inline]
    fn next_path(&mut self, out: &mut [f64]) {
        self.sequence.emit_into(out);
    }
}

impl UniformSource for SobolSource {
    type Cursor = SobolCursor;

    fn cursor(&self, option: usize, first_path: u64, _n_steps: usize) -> Self::Cursor {
        SobolCursor {
            sequence: SobolSequence::from_table(
                Arc::clone(&self.table),
                self.shifts(option),
                first_path + 1,
            ),
        }
    }
}
