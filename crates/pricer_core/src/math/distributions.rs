//! Standard normal distribution functions.
//!
//! This module provides:
//! - `norm_cdf`: Cumulative distribution function (CDF), Φ
//! - `norm_pdf`: Probability density function (PDF), φ
//! - `inverse_norm_cdf`: Inverse CND, Φ⁻¹, used to turn uniform or
//!   quasi-random samples into normal return shocks
//!
//! All functions are generic over `T: Float` so that the precision of a
//! pricing build is chosen by type, not by a separate implementation.

use num_traits::Float;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Central region numerator coefficients (Acklam).
const CENTRAL_NUM: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_69e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];

/// Central region denominator coefficients (Acklam), leading to a trailing `1`.
const CENTRAL_DEN: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];

/// Tail numerator coefficients in `q = sqrt(-2 ln p)` (Acklam).
const TAIL_NUM: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];

/// Tail denominator coefficients in `q` (Acklam), leading to a trailing `1`.
const TAIL_DEN: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];

/// Lower breakpoint between the tail and central segments.
pub const INV_CND_LOW_BREAK: f64 = 0.024_25;

/// Upper breakpoint between the central and tail segments.
pub const INV_CND_HIGH_BREAK: f64 = 1.0 - INV_CND_LOW_BREAK;

/// Chebyshev coefficients of the `erfc` fit, highest order last.
const ERFC_COEFFS: [f64; 10] = [
    -1.265_512_23,
    1.000_023_68,
    0.374_091_96,
    0.096_784_18,
    -0.186_288_06,
    0.278_868_07,
    -1.135_203_98,
    1.488_515_87,
    -0.822_152_23,
    0.170_872_77,
];

/// Converts an `f64` literal into `T`.
///
/// Every `Float` type in use represents these literals, the NaN fallback only
/// guards exotic implementations.
#[inline]
fn lit<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Horner evaluation of `c[0]·x^(n-1) + ... + c[n-1]`.
#[inline]
fn horner<T: Float>(coeffs: &[f64], x: T) -> T {
    coeffs
        .iter()
        .fold(T::zero(), |acc, &c| acc * x + lit::<T>(c))
}

/// Horner evaluation of `c[0]·x^n + ... + c[n-1]·x + 1`.
#[inline]
fn horner_monic_tail<T: Float>(coeffs: &[f64], x: T) -> T {
    horner(coeffs, x) * x + T::one()
}

/// Complementary error function using a Chebyshev fit.
///
/// Fractional error is below 1.2e-7 everywhere, which keeps the normal CDF
/// relatively accurate deep into the tails (unlike absolute-error fits).
///
/// # Mathematical Definition
/// erfc(x) = 1 - erf(x) = (2/√π) ∫_x^∞ e^(-t²) dt
#[inline]
fn erfc_approx<T: Float>(x: T) -> T {
    let one = T::one();
    let z = x.abs();

    // t = 1 / (1 + z/2)
    let t = one / (one + lit::<T>(0.5) * z);

    // Coefficients are stored lowest order first, so fold from the top.
    let poly = ERFC_COEFFS
        .iter()
        .rev()
        .fold(T::zero(), |acc, &c| acc * t + lit::<T>(c));

    let erfc_abs = t * (-z * z + poly).exp();

    // erfc(-x) = 2 - erfc(x)
    if x < T::zero() {
        lit::<T>(2.0) - erfc_abs
    } else {
        erfc_abs
    }
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1) using the complementary error function.
///
/// # Mathematical Definition
/// Φ(x) = (1/2) * erfc(-x / sqrt(2))
///
/// # Accuracy
/// Relative error below 1.2e-7 on `min(Φ(x), 1 - Φ(x))`.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
/// assert!(norm_cdf(-3.0_f64) < 0.01);
/// assert!(norm_cdf(3.0_f64) > 0.99);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let arg = -x / lit::<T>(SQRT_2);
    lit::<T>(0.5) * erfc_approx(arg)
}

/// Standard normal probability density function.
///
/// # Mathematical Definition
/// φ(x) = (1 / sqrt(2π)) * exp(-x² / 2)
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::norm_pdf;
///
/// // φ(0) = 1 / sqrt(2π)
/// assert!((norm_pdf(0.0_f64) - 0.3989422804).abs() < 1e-9);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let exponent = -lit::<T>(0.5) * x * x;
    lit::<T>(FRAC_1_SQRT_2PI) * exponent.exp()
}

/// Inverse of the standard normal CDF, Φ⁻¹.
///
/// Returns `z` such that `norm_cdf(z) == p`, using a segmented rational
/// (minimax) approximation:
///
/// - central segment, `0.02425 <= p <= 0.97575`: rational function in
///   `(p - 0.5)²`, scaled by `p - 0.5`
/// - tail segments: rational function in `q = sqrt(-2 ln d)`, where `d` is
///   the distance from `p` to the nearer boundary
///
/// # Accuracy
/// Relative error below 1.2e-9 over the whole open interval (0, 1).
/// `inverse_norm_cdf(0.5)` is exactly zero.
///
/// # Domain
/// `p = 0` and `p = 1` map to -∞ and +∞; NaN and values outside `[0, 1]`
/// return NaN. Callers feeding simulation kernels clamp first.
///
/// # Examples
/// ```
/// use pricer_core::math::distributions::inverse_norm_cdf;
///
/// assert_eq!(inverse_norm_cdf(0.5_f64), 0.0);
/// assert!((inverse_norm_cdf(0.975_f64) - 1.959_963_985).abs() < 1e-8);
/// assert!((inverse_norm_cdf(0.025_f64) + 1.959_963_985).abs() < 1e-8);
/// ```
#[inline]
pub fn inverse_norm_cdf<T: Float>(p: T) -> T {
    let zero = T::zero();
    let one = T::one();

    if p.is_nan() || p < zero || p > one {
        return T::nan();
    }
    if p == zero {
        return T::neg_infinity();
    }
    if p == one {
        return T::infinity();
    }

    let minus_two = lit::<T>(-2.0);

    if p < lit::<T>(INV_CND_LOW_BREAK) {
        let q = (minus_two * p.ln()).sqrt();
        horner(&TAIL_NUM, q) / horner_monic_tail(&TAIL_DEN, q)
    } else if p <= lit::<T>(INV_CND_HIGH_BREAK) {
        let q = p - lit::<T>(0.5);
        let r = q * q;
        horner(&CENTRAL_NUM, r) * q / horner_monic_tail(&CENTRAL_DEN, r)
    } else {
        let q = (minus_two * (one - p).ln()).sqrt();
        -horner(&TAIL_NUM, q) / horner_monic_tail(&TAIL_DEN, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Reference values from Abramowitz & Stegun Table 26.1
    const CDF_REFERENCE: &[(f64, f64)] = &[
        (-5.0, 2.866_515_718_791_939e-7),
        (-4.0, 3.167_124_183_311_998e-5),
        (-3.0, 1.349_898_031_630_094_6e-3),
        (-2.0, 2.275_013_194_817_921e-2),
        (-1.0, 0.158_655_253_931_457_02),
        (-0.5, 0.308_537_538_725_986_9),
        (0.0, 0.5),
        (0.5, 0.691_462_461_274_013_1),
        (1.0, 0.841_344_746_068_543),
        (2.0, 0.977_249_868_051_820_8),
        (3.0, 0.998_650_101_968_37),
    ];

    #[test]
    fn test_norm_cdf_reference_table() {
        for &(x, expected) in CDF_REFERENCE {
            let got = norm_cdf(x);
            let tail = expected.min(1.0 - expected);
            assert!(
                (got - expected).abs() <= 1.5e-7 * tail,
                "x={} expected={} got={}",
                x,
                expected,
                got
            );
        }
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for i in 0..=60 {
            let x = i as f64 / 10.0;
            let sum = norm_cdf(x) + norm_cdf(-x);
            assert!((sum - 1.0).abs() < 1e-12, "x={} sum={}", x, sum);
        }
    }

    #[test]
    fn test_norm_pdf_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(1.0_f64), 0.241_970_724_519_143_37, epsilon = 1e-12);
        assert_relative_eq!(norm_pdf(-1.0_f64), norm_pdf(1.0_f64), epsilon = 1e-15);
    }

    #[test]
    fn test_inverse_at_median_is_exactly_zero() {
        assert_eq!(inverse_norm_cdf(0.5_f64), 0.0);
        assert_eq!(inverse_norm_cdf(0.5_f32), 0.0);
    }

    #[test]
    fn test_inverse_known_quantiles() {
        // (p, Φ⁻¹(p))
        let quantiles = [
            (0.841_344_746_068_543, 1.0),
            (0.977_249_868_051_820_8, 2.0),
            (0.998_650_101_968_37, 3.0),
            (0.158_655_253_931_457_02, -1.0),
            (0.001, -3.090_232_306_167_813_6),
            (1e-6, -4.753_424_308_822_899),
            (0.999, 3.090_232_306_167_813_6),
        ];
        for &(p, z) in &quantiles {
            let got = inverse_norm_cdf(p);
            assert!(
                (got - z).abs() <= 1e-8 * z.abs().max(1.0),
                "p={} expected={} got={}",
                p,
                z,
                got
            );
        }
    }

    #[test]
    fn test_inverse_segments_meet_at_breakpoints() {
        for &b in &[INV_CND_LOW_BREAK, INV_CND_HIGH_BREAK] {
            let below = inverse_norm_cdf(b - 1e-12);
            let above = inverse_norm_cdf(b + 1e-12);
            assert!((below - above).abs() < 1e-8, "break={} {} {}", b, below, above);
        }
    }

    #[test]
    fn test_inverse_is_monotone() {
        let mut previous = f64::NEG_INFINITY;
        for i in 1..10_000 {
            let p = i as f64 / 10_000.0;
            let z = inverse_norm_cdf(p);
            assert!(z > previous, "not increasing at p={}", p);
            previous = z;
        }
    }

    #[test]
    fn test_inverse_domain_edges() {
        assert_eq!(inverse_norm_cdf(0.0_f64), f64::NEG_INFINITY);
        assert_eq!(inverse_norm_cdf(1.0_f64), f64::INFINITY);
        assert!(inverse_norm_cdf(f64::NAN).is_nan());
        assert!(inverse_norm_cdf(-0.1_f64).is_nan());
        assert!(inverse_norm_cdf(1.1_f64).is_nan());
    }

    #[test]
    fn test_inverse_single_precision() {
        let z = inverse_norm_cdf(0.975_f32);
        assert!((z - 1.959_964_f32).abs() < 1e-4);
    }

    #[test]
    fn test_extreme_tails_stay_finite() {
        let z = inverse_norm_cdf(f64::MIN_POSITIVE);
        assert!(z.is_finite() && z < -37.0);
        let z = inverse_norm_cdf(1.0 - f64::EPSILON / 2.0);
        assert!(z.is_finite() && z > 8.0);
    }
}
