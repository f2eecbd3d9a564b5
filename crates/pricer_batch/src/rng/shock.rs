//! Conversion of uniform samples into standard normal shocks.

use pricer_core::math::distributions::inverse_norm_cdf;

/// Smallest uniform passed to the inverse CND.
const UNIFORM_FLOOR: f64 = f64::MIN_POSITIVE;
/// Largest uniform passed to the inverse CND (the last `f64` below 1).
const UNIFORM_CEIL: f64 = 1.0 - f64::EPSILON / 2.0;

/// Maps a uniform sample to a standard normal shock.
///
/// The sample is clamped into the open unit interval first so that the
/// result is always finite. A NaN sample maps to a zero shock.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::rng::shock_from_uniform;
///
/// assert_eq!(shock_from_uniform(0.5), 0.0);
/// assert!(shock_from_uniform(0.0).is_finite());
/// assert!(shock_from_uniform(1.0).is_finite());
/// ```
#[inline]
pub fn shock_from_uniform(u: f64) -> f64 {
    if u.is_nan() {
        return 0.0;
    }
    inverse_norm_cdf(u.clamp(UNIFORM_FLOOR, UNIFORM_CEIL))
}

/// Converts a buffer of uniforms into normal shocks in place.
#[inline]
pub fn uniforms_to_shocks(buffer: &mut [f64]) {
    for value in buffer.iter_mut() {
        *value = shock_from_uniform(*value);
    }
}
