// ============================================================================
// Integral Rounding
// floor / ceil / trunc / round, fractional part and remainders
// ============================================================================

use super::policy::{RoundingPolicy, Ternary};
use super::round::{round_to_bits, round_to_precision};
use crate::numeric::{Float, Precision};

/// Round to an integer under `policy`, keeping at most `precision` bits.
///
/// When the integer part needs more than `precision` bits the result is the
/// nearest representable value in the policy's direction, which is still an
/// integer.
pub(crate) fn to_integral(
    x: &Float,
    precision: Precision,
    policy: RoundingPolicy,
) -> (Float, Ternary) {
    let Some(exponent) = x.exponent() else {
        return (x.clone().retag(precision), Ternary::Exact);
    };
    let keep = exponent.min(precision.bits() as i64);
    round_to_bits(x, keep, policy, precision)
}

/// Largest integer not above `x`.
pub fn floor(x: &Float) -> Float {
    to_integral(x, x.precision(), RoundingPolicy::TowardNegative).0
}

/// Smallest integer not below `x`.
pub fn ceil(x: &Float) -> Float {
    to_integral(x, x.precision(), RoundingPolicy::TowardPositive).0
}

/// Integer part of `x`, rounding toward zero.
pub fn trunc(x: &Float) -> Float {
    to_integral(x, x.precision(), RoundingPolicy::TowardZero).0
}

/// Nearest integer, halfway cases away from zero.
pub fn round(x: &Float) -> Float {
    to_integral(x, x.precision(), RoundingPolicy::NearestTiesAway).0
}

/// Nearest integer, halfway cases to even.
pub fn round_even(x: &Float) -> Float {
    to_integral(x, x.precision(), RoundingPolicy::NearestTiesEven).0
}

/// Fractional part `x - trunc(x)`, carrying the sign of `x`.
///
/// NaN for infinite input.
pub fn frac(x: &Float) -> Float {
    if x.is_infinite() {
        return Float::nan(x.precision());
    }
    // exact: the difference only holds bits of x below the unit position
    x.sub(&trunc(x), x.precision())
}

/// Whether `x` is a finite integer.
pub fn is_integer(x: &Float) -> bool {
    if !x.is_finite() {
        return false;
    }
    match x.exponent() {
        None => true,
        Some(e) => round_to_bits(x, e, RoundingPolicy::TowardZero, x.precision())
            .1
            .is_exact(),
    }
}

/// Whether `x` is an odd integer.
pub fn is_odd_integer(x: &Float) -> bool {
    is_integer(x) && !is_integer(&x.mul_pow2(-1))
}

/// Truncated remainder `x - trunc(x / y) * y`, with the sign of `x`.
///
/// NaN when `y` is zero or `x` is infinite. A finite `x` over an infinite `y`
/// returns `x`. The result is rounded to the precision of `x`.
pub fn rem(x: &Float, y: &Float) -> Float {
    let precision = x.precision();
    match remainder_special(x, y) {
        Some(Special::Nan) => Float::nan(precision),
        Some(Special::Dividend) => x.clone(),
        Some(Special::Divisor) => x.clone(),
        None => {
            let (r, _) = exact_remainder(x, y);
            round_to_precision(&r, precision, RoundingPolicy::NearestTiesEven).0
        },
    }
}

/// Floored remainder `x - floor(x / y) * y`, with the sign of `y`.
///
/// NaN when `y` is zero or `x` is infinite. With an infinite `y`, a finite
/// `x` of the same sign (or zero) is returned unchanged and one of the
/// opposite sign yields `y`.
pub fn modulo(x: &Float, y: &Float) -> Float {
    let precision = x.precision();
    match remainder_special(x, y) {
        Some(Special::Nan) => Float::nan(precision),
        Some(Special::Dividend) => x.clone(),
        Some(Special::Divisor) => y.clone().retag(precision),
        None => {
            let (r, wide) = exact_remainder(x, y);
            let r = if !r.is_zero() && r.is_negative() != y.is_negative() {
                r.add(y, wide)
            } else {
                r
            };
            round_to_precision(&r, precision, RoundingPolicy::NearestTiesEven).0
        },
    }
}

enum Special {
    Nan,
    Dividend,
    Divisor,
}

fn remainder_special(x: &Float, y: &Float) -> Option<Special> {
    if x.is_nan() || y.is_nan() || y.is_zero() || x.is_infinite() {
        return Some(Special::Nan);
    }
    if x.is_zero() {
        return Some(Special::Dividend);
    }
    if y.is_infinite() {
        return if x.is_negative() == y.is_negative() {
            Some(Special::Dividend)
        } else {
            Some(Special::Divisor)
        };
    }
    None
}

/// At most this many unit corrections follow the quotient estimate.
const QUOTIENT_CORRECTIONS: usize = 2;

/// Exact truncated remainder of finite non-zero operands.
///
/// Returns the remainder and the precision it was computed at, wide enough
/// for the result and for adding one more `y` to it.
fn exact_remainder(x: &Float, y: &Float) -> (Float, Precision) {
    let ex = x.exponent().unwrap_or(0);
    let ey = y.exponent().unwrap_or(0);

    if ex < ey {
        // |x| < |y|: the quotient truncates to zero
        return (x.clone(), x.precision());
    }

    let px = x.precision().bits() as i64;
    let py = y.precision().bits() as i64;
    if ex - ey > px + py + 64 {
        scaled_remainder(x, y, ex, ey)
    } else {
        direct_remainder(x, y, ex, ey)
    }
}

/// `x - trunc(x / y) * y` with the quotient formed explicitly.
fn direct_remainder(x: &Float, y: &Float, ex: i64, ey: i64) -> (Float, Precision) {
    let quotient_bits = (ex - ey + 2) as usize;
    let wide = Precision::saturating(
        quotient_bits
            .saturating_add(x.precision().bits())
            .saturating_add(y.precision().bits())
            .saturating_add(8)
            .min(Precision::MAX_BITS),
    );

    let quotient = x.div(y, Precision::saturating(quotient_bits.saturating_add(64)));
    let q = to_integral(&quotient, wide, RoundingPolicy::TowardZero).0;
    let mut r = x.sub(&q.mul(y, wide), wide);

    // the quotient may be off by one unit when x / y sits next to an integer
    let step = if x.is_negative() == y.is_negative() {
        y.clone()
    } else {
        y.neg()
    };
    for _ in 0..QUOTIENT_CORRECTIONS {
        if !r.is_zero() && r.is_negative() != x.is_negative() {
            r = r.add(&step, wide);
        } else if r.abs() >= y.abs() {
            r = r.sub(&step, wide);
        } else {
            break;
        }
    }

    (r, wide)
}

/// Remainder for quotients too wide to form.
///
/// With integer mantissas `|x| = mx 2^t` and `|y| = my 2^s`, `t > s`:
/// `|x| rem |y| = 2^s ((mx mod my) (2^(t-s) mod my) mod my)`, every factor
/// below `my` so each product is exact at twice the width of `y`.
fn scaled_remainder(x: &Float, y: &Float, ex: i64, ey: i64) -> (Float, Precision) {
    let px = x.precision().bits();
    let py = y.precision().bits();
    let t = ex - px as i64;
    let s = ey - py as i64;
    let wi = Precision::saturating(2 * py + 8);

    let mx = x.abs().mul_pow2(-t);
    let my = y.abs().mul_pow2(-s);
    let base = integer_rem(&mx, &my);
    let power = pow2_mod(t - s, &my, wi);
    let r = integer_rem(&base.mul(&power, wi), &my).mul_pow2(s);

    let r = if x.is_negative() { r.neg() } else { r };
    (r.retag(wi), wi)
}

/// `a mod m` for non-negative integers with a short quotient.
fn integer_rem(a: &Float, m: &Float) -> Float {
    match (a.exponent(), m.exponent()) {
        (Some(ea), Some(em)) if ea >= em => direct_remainder(a, m, ea, em).0,
        _ => a.clone(),
    }
}

/// `2^k mod m` by left-to-right binary exponentiation.
fn pow2_mod(k: i64, m: &Float, wi: Precision) -> Float {
    let one = Float::one(wi);
    if *m == one {
        return Float::zero(wi);
    }

    let k = k.unsigned_abs();
    let mut acc = one;
    for bit in (0..u64::BITS - k.leading_zeros()).rev() {
        acc = integer_rem(&acc.mul(&acc, wi), m);
        if (k >> bit) & 1 == 1 {
            acc = integer_rem(&acc.mul_pow2(1), m);
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: f64) -> Float {
        Float::from_f64(v, Precision::DOUBLE)
    }

    #[test]
    fn test_negative_fraction() {
        assert_eq!(floor(&f(-3.7)).to_f64(), -4.0);
        assert_eq!(ceil(&f(-3.7)).to_f64(), -3.0);
        assert_eq!(trunc(&f(-3.7)).to_f64(), -3.0);
        assert_eq!(round(&f(-3.7)).to_f64(), -4.0);
    }

    #[test]
    fn test_small_magnitudes() {
        assert_eq!(floor(&f(0.3)).to_f64(), 0.0);
        assert_eq!(floor(&f(-0.3)).to_f64(), -1.0);
        assert_eq!(ceil(&f(0.3)).to_f64(), 1.0);
        assert!(ceil(&f(-0.3)).is_zero());
        assert!(trunc(&f(0.999)).is_zero());
    }

    #[test]
    fn test_halfway_cases() {
        assert_eq!(round(&f(2.5)).to_f64(), 3.0);
        assert_eq!(round_even(&f(2.5)).to_f64(), 2.0);
        assert_eq!(round_even(&f(3.5)).to_f64(), 4.0);
        assert_eq!(round(&f(-0.5)).to_f64(), -1.0);
        assert!(round_even(&f(0.5)).is_zero());
    }

    #[test]
    fn test_integers_unchanged() {
        for v in [0.0, 1.0, -7.0, 1e15] {
            assert_eq!(floor(&f(v)).to_f64(), v);
            assert_eq!(ceil(&f(v)).to_f64(), v);
        }
        assert!(is_integer(&f(42.0)));
        assert!(!is_integer(&f(42.5)));
        assert!(is_odd_integer(&f(-3.0)));
        assert!(!is_odd_integer(&f(4.0)));
        assert!(!is_integer(&Float::infinity(false, Precision::DOUBLE)));
    }

    #[test]
    fn test_frac() {
        assert_eq!(frac(&f(3.25)).to_f64(), 0.25);
        assert_eq!(frac(&f(-3.25)).to_f64(), -0.25);
        assert!(frac(&Float::infinity(true, Precision::DOUBLE)).is_nan());
    }

    #[test]
    fn test_specials() {
        let nan = Float::nan(Precision::DOUBLE);
        assert!(floor(&nan).is_nan());
        let inf = Float::infinity(false, Precision::DOUBLE);
        assert!(ceil(&inf).is_infinite());
    }

    #[test]
    fn test_rem_sign_follows_dividend() {
        assert_eq!(rem(&f(7.0), &f(3.0)).to_f64(), 1.0);
        assert_eq!(rem(&f(-7.0), &f(3.0)).to_f64(), -1.0);
        assert_eq!(rem(&f(7.0), &f(-3.0)).to_f64(), 1.0);
        assert_eq!(rem(&f(5.5), &f(2.0)).to_f64(), 1.5);
        assert_eq!(rem(&f(1.0), &f(3.0)).to_f64(), 1.0);
    }

    #[test]
    fn test_modulo_sign_follows_divisor() {
        assert_eq!(modulo(&f(7.0), &f(3.0)).to_f64(), 1.0);
        assert_eq!(modulo(&f(-7.0), &f(3.0)).to_f64(), 2.0);
        assert_eq!(modulo(&f(7.0), &f(-3.0)).to_f64(), -2.0);
        assert_eq!(modulo(&f(-7.0), &f(-3.0)).to_f64(), -1.0);
        assert!(modulo(&f(6.0), &f(3.0)).is_zero());
    }

    #[test]
    fn test_remainder_by_zero_is_nan() {
        assert!(rem(&f(1.0), &f(0.0)).is_nan());
        assert!(modulo(&f(1.0), &f(0.0)).is_nan());
        assert!(rem(&Float::infinity(false, Precision::DOUBLE), &f(2.0)).is_nan());
    }

    #[test]
    fn test_remainder_by_infinity() {
        let inf = Float::infinity(false, Precision::DOUBLE);
        assert_eq!(rem(&f(-1.5), &inf).to_f64(), -1.5);
        assert_eq!(modulo(&f(1.5), &inf).to_f64(), 1.5);
        assert!(modulo(&f(-1.5), &inf).is_infinite());
    }

    #[test]
    fn test_remainder_of_huge_exponent_gap() {
        // 2^(2^26 + 200) is 1 more than a multiple of 3
        let x = Float::one(Precision::DOUBLE).mul_pow2((1 << 26) + 200);
        assert_eq!(rem(&x, &f(3.0)).to_f64(), 1.0);
        assert_eq!(rem(&x.neg(), &f(3.0)).to_f64(), -1.0);
        assert_eq!(modulo(&x.neg(), &f(3.0)).to_f64(), 2.0);
        assert_eq!(modulo(&x, &f(-3.0)).to_f64(), -2.0);
    }

    #[test]
    fn test_scaled_remainder_matches_direct() {
        // gap 1001 takes the modular route, gap 100 the direct one
        let three = f(3.0);
        let far = Float::one(Precision::DOUBLE).mul_pow2(1000);
        let near = Float::one(Precision::DOUBLE).mul_pow2(100);
        assert_eq!(rem(&far, &three).to_f64(), 1.0);
        assert_eq!(rem(&far.mul_pow2(1), &three).to_f64(), 2.0);
        assert_eq!(rem(&near, &three).to_f64(), 1.0);

        // non-integer divisor: 2^1000 rem 0.75 = 2^-2 (2^1002 mod 3)
        assert_eq!(rem(&far, &f(0.75)).to_f64(), 0.25);
        // 7 * 2^1000 rem 10 = 7 * 2^1000 mod 10 = 2 (2^1000 ends in 6)
        let seven = Float::from_i64(7, Precision::DOUBLE).mul_pow2(1000);
        assert_eq!(rem(&seven, &f(10.0)).to_f64(), 2.0);
    }

    #[test]
    fn test_rem_large_quotient() {
        // 2^80 mod 3 = 1
        let x = Float::one(Precision::DOUBLE).mul_pow2(80);
        assert_eq!(rem(&x, &f(3.0)).to_f64(), 1.0);
    }
}
