//! Random number generation for the batch engine.
//!
//! This module provides:
//! - [`PricerRng`]: seeded sequential generator for host-side sampling
//! - [`PseudoRandomSource`]: counter-based ChaCha8 source for the kernels
//! - [`SobolSequence`] and [`SobolSource`]: low-discrepancy points
//! - [`ShockSource`]: the configured source, chosen by [`Sampler`]
//! - [`shock_from_uniform`]: uniform to standard normal conversion
//!
//! # Reproducibility
//!
//! Every uniform consumed by a kernel is a pure function of
//! `(seed, option, path, step)`. How the paths of an option are split across
//! work-groups or devices never changes the samples each path sees.

mod prng;
mod qmc;
mod shock;
mod source;

pub use prng::{PricerRng, PseudoRandomCursor, PseudoRandomSource};
pub use qmc::{
    LowDiscrepancySequence, SobolCursor, SobolSequence, SobolSource, SOBOL_MAX_DIMENSIONS,
};
pub use shock::{shock_from_uniform, uniforms_to_shocks};
pub use source::{PathCursor, Sampler, ShockCursor, ShockSource, UniformSource};
