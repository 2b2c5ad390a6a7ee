// ============================================================================
// Power Kernels
// x^n by binary exponentiation; x^y = exp(y ln x) otherwise
// ============================================================================

use super::exp;
use super::log;
use super::series::bit_length;
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use crate::rounding::{is_integer, is_odd_integer};
use crate::solvers::newton;

/// Signed zero or infinity for `0^n` and `inf^n`, sign carried by odd `n`.
fn signed(negative: bool, infinite: bool, precision: Precision) -> Float {
    let value = if infinite {
        Float::infinity(false, precision)
    } else {
        Float::zero(precision)
    };
    if negative {
        value.neg()
    } else {
        value
    }
}

/// `x^n` for a machine integer exponent.
pub(crate) fn powi(x: &Float, n: i64, precision: Precision, config: &KernelConfig) -> Float {
    if n == 0 {
        return Float::one(precision);
    }
    if x.is_nan() {
        return Float::nan(precision);
    }
    let odd = n % 2 != 0;
    let carries_sign = odd && x.is_negative();
    if x.is_zero() {
        return signed(carries_sign, n < 0, precision);
    }
    if x.is_infinite() {
        return signed(carries_sign, n > 0, precision);
    }

    let magnitude = n.unsigned_abs();
    let wp = config.working_precision(precision, bit_length(magnitude) + 8);
    let value = newton::pow_u64(x, magnitude, wp);
    if n < 0 {
        Float::one(wp).div(&value, wp)
    } else {
        value
    }
}

/// Special cases of `x^y` in the usual floating-point conventions.
fn pow_special(x: &Float, y: &Float, precision: Precision) -> Option<Float> {
    let one = Float::one(precision);
    if y.is_zero() || *x == one {
        return Some(one);
    }
    if x.is_nan() || y.is_nan() {
        return Some(Float::nan(precision));
    }

    if y.is_infinite() {
        let magnitude = x.abs();
        if magnitude == one {
            return Some(one);
        }
        let grows = (magnitude > one) != y.is_negative();
        return Some(signed(false, grows, precision));
    }

    let odd = is_odd_integer(y);
    if x.is_zero() {
        return Some(signed(odd && x.is_negative(), y.is_negative(), precision));
    }
    if x.is_infinite() {
        return Some(signed(odd && x.is_negative(), y.is_positive(), precision));
    }
    if x.is_negative() && !is_integer(y) {
        return Some(Float::nan(precision));
    }
    None
}

/// `x^y`.
///
/// Integer `y` below `2^63` uses binary exponentiation, `y = 1/2` the square root, and
/// everything else `exp(y ln|x|)` with the sign restored for odd `y`.
pub(crate) fn pow(x: &Float, y: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(value) = pow_special(x, y, precision) {
        return value;
    }

    if let Some(n) = y.to_i64_exact() {
        return powi(x, n, precision, config);
    }
    if *y == Float::one(precision).mul_pow2(-1) {
        return newton::sqrt(x, precision, config);
    }

    // y ln|x| needs the integer bits of both factors on top of wp
    let ex = x.exponent().unwrap_or(0);
    let ey = y.exponent().unwrap_or(0);
    let wp = config.working_precision(precision, 8);
    let wl = wp.widened(ey.max(0) as usize + bit_length(ex.unsigned_abs()) + 8);
    let product = y.mul(&log::ln(&x.abs(), wl, config), wl);
    let value = exp::exp(&product, wp, config);

    if x.is_negative() && is_odd_integer(y) {
        value.neg()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_support::*;

    fn cfg() -> KernelConfig {
        KernelConfig::default()
    }

    #[test]
    fn test_powi() {
        let d = Precision::DOUBLE;
        assert_eq!(powi(&f(3.0), 5, d, &cfg()), f(243.0));
        assert_eq!(powi(&f(-2.0), 3, d, &cfg()), f(-8.0));
        assert_eq!(powi(&f(2.0), -2, d, &cfg()), f(0.25));
        assert_eq!(powi(&f(7.5), 0, d, &cfg()), Float::one(d));
        assert!(powi(&Float::nan(d), 2, d, &cfg()).is_nan());
    }

    #[test]
    fn test_powi_zero_and_infinity() {
        let d = Precision::DOUBLE;
        let neg_zero = f(0.0).neg();
        let inf = Float::infinity(false, d);
        let r = powi(&neg_zero, -3, d, &cfg());
        assert!(r.is_infinite() && r.is_negative());
        assert!(powi(&neg_zero, -2, d, &cfg()).is_positive());
        assert!(powi(&inf.neg(), 3, d, &cfg()).is_negative());
        assert!(powi(&inf, -1, d, &cfg()).is_zero());
    }

    #[test]
    fn test_pow_matches_f64() {
        let d = Precision::DOUBLE;
        for (x, y) in [(2.0, 0.5), (10.0, -1.5), (0.3, 2.7), (7.0, 1.0 / 3.0), (1.5, 100.0)] {
            assert_near_f64(&pow(&f(x), &f(y), d, &cfg()), f64::powf(x, y));
        }
    }

    #[test]
    fn test_pow_special_values() {
        let d = Precision::DOUBLE;
        let inf = Float::infinity(false, d);
        assert_eq!(pow(&Float::nan(d), &f(0.0), d, &cfg()), Float::one(d));
        assert_eq!(pow(&f(1.0), &Float::nan(d), d, &cfg()), Float::one(d));
        assert!(pow(&f(-2.0), &f(0.5), d, &cfg()).is_nan());
        assert_eq!(pow(&f(-2.0), &f(3.0), d, &cfg()), f(-8.0));
        assert!(pow(&f(0.5), &inf, d, &cfg()).is_zero());
        assert!(pow(&f(2.0), &inf, d, &cfg()).is_infinite());
        assert!(pow(&f(2.0), &inf.neg(), d, &cfg()).is_zero());
        assert_eq!(pow(&f(-1.0), &inf, d, &cfg()), Float::one(d));
        assert!(pow(&f(0.0), &f(-1.0), d, &cfg()).is_infinite());
        assert!(pow(&inf.neg(), &f(-3.0), d, &cfg()).is_zero());
    }

    #[test]
    fn test_pow_odd_integer_beyond_double_range() {
        let wp = p(64);
        let one = Float::one(wp);
        let odd = one.mul_pow2(55).add(&one, p(128));
        let even = one.mul_pow2(55);
        assert_eq!(pow(&one.neg(), &odd, wp, &cfg()), one.neg());
        assert_eq!(pow(&one.neg(), &even, wp, &cfg()), one);

        // -(1 + 2^-56)^(2^55 + 1) is close to -sqrt(e)
        let x = one.add(&one.mul_pow2(-56), p(128)).neg();
        let r = pow(&x, &odd, p(128), &cfg());
        assert!(r.is_negative());
        assert_near_f64(&r, -0.5f64.exp());
    }

    #[test]
    fn test_pow_odd_integer_above_i64() {
        // 2^70 + 1 takes the exp/ln route and keeps the sign rule
        let wp = p(128);
        let one = Float::one(wp);
        let odd = one.mul_pow2(70).add(&one, wp);
        assert_eq!(pow(&one.neg(), &odd, wp, &cfg()), one.neg());
    }

    #[test]
    fn test_pow_exact_square_root() {
        let d = Precision::DOUBLE;
        assert_eq!(pow(&f(9.0), &f(0.5), d, &cfg()), f(3.0));
    }

    #[test]
    fn test_pow_exponent_identity() {
        let wp = p(160);
        let x = Float::from_f64(1.75, wp);
        let a = Float::from_f64(0.375, wp);
        let b = Float::from_f64(2.25, wp);
        let whole = pow(&x, &a.add(&b, wp), wp, &cfg());
        let split = pow(&x, &a, wp, &cfg()).mul(&pow(&x, &b, wp, &cfg()), wp);
        assert_bits(&whole, &split, 150);
    }
}
