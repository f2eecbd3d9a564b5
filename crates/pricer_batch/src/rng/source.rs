//! Uniform sample sources consumed by the simulation kernels.
//!
//! A source hands out [`PathCursor`]s positioned at an arbitrary path of an
//! arbitrary option. Kernels only ever read forward from a cursor, so sources
//! can implement cheap sequential reads while still supporting the random
//! access needed to split an option's paths across work-groups.
//!
//! [`ShockSource`] is the closed set of sources the engine can be configured
//! with; it dispatches statically so the inner path loop stays monomorphic.

use super::prng::{PseudoRandomCursor, PseudoRandomSource};
use super::qmc::{SobolCursor, SobolSource};
use crate::mc::error::ConfigError;

/// Sequential reader of per-path uniform samples.
pub trait PathCursor {
    /// Writes the uniforms of the next path into `out`, one per time step.
    ///
    /// Every value lies strictly inside (0, 1).
    fn next_path(&mut self, out: &mut [f64]);
}

/// Random-access source of per-path uniform samples.
///
/// Implementations must be pure functions of `(option, path, step)` for a
/// fixed configuration.
pub trait UniformSource: Send + Sync {
    /// Cursor type returned by [`cursor`](Self::cursor).
    type Cursor: PathCursor;

    /// Returns a cursor positioned at `first_path` of `option`, for paths of
    /// `n_steps` time steps.
    fn cursor(&self, option: usize, first_path: u64, n_steps: usize) -> Self::Cursor;
}

/// Sample generator choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Sampler {
    /// Counter-based ChaCha8 pseudo-random numbers.
    #[default]
    Pseudo,
    /// Digitally shifted Sobol points.
    Sobol,
}

impl std::str::FromStr for Sampler {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pseudo" | "prng" | "chacha" => Ok(Sampler::Pseudo),
            "sobol" | "qmc" => Ok(Sampler::Sobol),
            _ => Err(ConfigError::InvalidParameter {
                name: "sampler",
                value: format!("unknown sampler '{}', expected pseudo or sobol", s),
            }),
        }
    }
}

impl std::fmt::Display for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sampler::Pseudo => write!(f, "pseudo"),
            Sampler::Sobol => write!(f, "sobol"),
        }
    }
}

/// The configured uniform source of a batch.
#[derive(Clone, Debug)]
pub enum ShockSource {
    /// Counter-based pseudo-random source.
    Pseudo(PseudoRandomSource),
    /// Shifted Sobol source.
    Sobol(SobolSource),
}

impl ShockSource {
    /// Builds the source for `sampler`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooManySobolDimensions` when a Sobol source is
    /// requested for more steps than it has direction numbers for.
    pub fn new(sampler: Sampler, seed: u64, n_steps: usize) -> Result<Self, ConfigError> {
        match sampler {
            Sampler::Pseudo => Ok(Self::Pseudo(PseudoRandomSource::from_seed(seed))),
            Sampler::Sobol => Ok(Self::Sobol(SobolSource::new(n_steps, seed)?)),
        }
    }

    /// Returns which sampler backs this source.
    pub fn sampler(&self) -> Sampler {
        match self {
            Self::Pseudo(_) => Sampler::Pseudo,
            Self::Sobol(_) => Sampler::Sobol,
        }
    }
}

/// Cursor over a [`ShockSource`].
#[derive(Clone, Debug)]
pub enum ShockCursor {
    /// Pseudo-random cursor.
    Pseudo(PseudoRandomCursor),
    /// Sobol cursor.
    Sobol(SobolCursor),
}

impl PathCursor for ShockCursor {
    #[inline]
    fn next_path(&mut self, out: &mut [f64]) {
        match self {
            Self::Pseudo(cursor) => cursor.next_path(out),
            Self::Sobol(cursor) => cursor.next_path(out),
        }
    }
}

impl UniformSource for ShockSource {
    type Cursor = ShockCursor;

    fn cursor(&self, option: usize, first_path: u64, n_steps: usize) -> Self::Cursor {
        match self {
            Self::Pseudo(source) => {
                ShockCursor::Pseudo(source.cursor(option, first_path, n_steps))
            }
            Self::Sobol(source) => ShockCursor::Sobol(source.cursor(option, first_path, n_steps)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_parse_and_display() {
        assert_eq!("Sobol".parse::<Sampler>().unwrap(), Sampler::Sobol);
        assert_eq!("pseudo".parse::<Sampler>().unwrap(), Sampler::Pseudo);
        assert!("halton".parse::<Sampler>().is_err());
        assert_eq!(Sampler::Sobol.to_string(), "sobol");
        assert_eq!(Sampler::default(), Sampler::Pseudo);
    }

    #[test]
    fn test_shock_source_reports_sampler() {
        let source = ShockSource::new(Sampler::Sobol, 1, 2).unwrap();
        assert_eq!(source.sampler(), Sampler::Sobol);
        let source = ShockSource::new(Sampler::Pseudo, 1, 2).unwrap();
        assert_eq!(source.sampler(), Sampler::Pseudo);
    }

    #[test]
    fn test_sobol_source_rejects_too_many_steps() {
        let result = ShockSource::new(Sampler::Sobol, 1, 1_000);
        assert!(matches!(
            result,
            Err(ConfigError::TooManySobolDimensions { .. })
        ));
    }
}
