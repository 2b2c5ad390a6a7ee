// ============================================================================
// Inverse Trigonometric Kernels
// atan by half-angle reduction and Taylor series; atan2, asin, acos on top
// ============================================================================

use super::constants;
use super::series::{isqrt, sum_series};
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use crate::solvers::newton;

/// `atan(a)` for `|a| <= 1` at `wp`.
///
/// Each half-angle step `a <- a / (1 + sqrt(1 + a^2))` halves the angle,
/// then `a - a^3/3 + a^5/5 - ...` is summed and the result doubled back.
fn atan_reduced(a: &Float, wp: Precision, config: &KernelConfig) -> Float {
    let target = (config.max_reduction_steps as usize).min(isqrt(wp.bits()) / 2 + 1) as i64;
    let halvings = match a.exponent() {
        Some(e) => (target + e).clamp(0, target),
        None => return a.clone(),
    };

    let wh = wp.widened(halvings as usize + 4);
    let one = Float::one(wh);
    let mut a = a.clone();
    for _ in 0..halvings {
        let hyp = newton::root_wp(&one.add(&a.mul(&a, wh), wh), 2, wh, config);
        a = a.div(&one.add(&hyp, wh), wh);
    }

    let a2 = a.mul(&a, wh).neg();
    let mut power = a.clone();
    let sum = sum_series(a, wh, config.max_series_terms, "atan", |k, _| {
        power = power.mul(&a2, wh);
        power.div_u64(2 * k + 1, wh)
    });
    sum.mul_pow2(halvings)
}

/// Arctangent at working precision.
pub(crate) fn atan(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if x.is_nan() || x.is_zero() {
        return x.clone();
    }
    let wp = config.working_precision(precision, 8);
    if x.is_infinite() {
        let half_pi = constants::pi(wp).mul_pow2(-1);
        return if x.is_negative() { half_pi.neg() } else { half_pi };
    }

    let magnitude = x.abs();
    let one = Float::one(wp);
    let value = if magnitude > one {
        // atan |x| = pi/2 - atan(1/|x|), result above pi/4 so no cancellation
        let inverse = one.div(&magnitude, wp);
        let half_pi = constants::pi(wp).mul_pow2(-1);
        half_pi.sub(&atan_reduced(&inverse, wp, config), wp)
    } else {
        atan_reduced(&magnitude, wp, config)
    };

    if x.is_negative() {
        value.neg()
    } else {
        value
    }
}

/// Two-argument arctangent of `y / x`, in `(-pi, pi]`.
///
/// Follows the usual conventions for zeros and infinities. A zero `x` is
/// treated as positive zero.
pub(crate) fn atan2(y: &Float, x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if y.is_nan() || x.is_nan() {
        return Float::nan(precision);
    }
    let wp = config.working_precision(precision, 8);
    let pi = || constants::pi(wp);
    let signed = |value: Float| if y.is_negative() { value.neg() } else { value };

    if y.is_zero() {
        return if x.is_negative() { signed(pi()) } else { y.clone() };
    }
    if x.is_zero() {
        return signed(pi().mul_pow2(-1));
    }
    if y.is_infinite() {
        let angle = if !x.is_infinite() {
            pi().mul_pow2(-1)
        } else if x.is_negative() {
            pi().mul_u64(3, wp).mul_pow2(-2)
        } else {
            pi().mul_pow2(-2)
        };
        return signed(angle);
    }
    if x.is_infinite() {
        return if x.is_negative() {
            signed(pi())
        } else {
            signed(Float::zero(precision))
        };
    }

    let ratio = y.div(x, wp.widened(8));
    let base = atan(&ratio, wp, config);
    if x.is_positive() {
        base
    } else if y.is_negative() {
        base.sub(&pi(), wp)
    } else {
        base.add(&pi(), wp)
    }
}

/// Arcsine: `atan(x / sqrt((1 - x)(1 + x)))`.
pub(crate) fn asin(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if x.is_nan() || x.is_zero() {
        return x.clone();
    }
    let wp = config.working_precision(precision, 8);
    let one = Float::one(wp);
    let magnitude = x.abs();
    if magnitude > one {
        return Float::nan(precision);
    }
    if magnitude == one {
        let half_pi = constants::pi(wp).mul_pow2(-1);
        return if x.is_negative() { half_pi.neg() } else { half_pi };
    }

    let wide = wp.widened(8).max(x.precision().widened(2));
    let complement = one.sub(x, wide).mul(&one.add(x, wide), wide);
    let denominator = newton::root_wp(&complement, 2, wide, config);
    atan(&x.div(&denominator, wide), wp, config)
}

/// Arccosine: `2 atan(sqrt((1 - x) / (1 + x)))`, free of cancellation near
/// `x = 1`.
pub(crate) fn acos(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if x.is_nan() {
        return Float::nan(precision);
    }
    let wp = config.working_precision(precision, 8);
    let one = Float::one(wp);
    if x.abs() > one {
        return Float::nan(precision);
    }
    if *x == one {
        return Float::zero(precision);
    }
    if *x == one.neg() {
        return constants::pi(wp);
    }
    if x.is_zero() {
        return constants::pi(wp).mul_pow2(-1);
    }

    let wide = wp.widened(8).max(x.precision().widened(2));
    let ratio = one.sub(x, wide).div(&one.add(x, wide), wide);
    let root = newton::root_wp(&ratio, 2, wide, config);
    atan(&root, wp, config).mul_pow2(1)
}
