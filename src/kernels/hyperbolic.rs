// ============================================================================
// Hyperbolic Kernels
// sinh / cosh / tanh from e^x and e^-x; inverses through the logarithm
// ============================================================================

use super::exp::{self, ExpPlan, ExpReduction};
use super::log;
use super::series::sum_series;
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use crate::solvers::newton;
use std::f64::consts::LN_2;

/// A hyperbolic function either resolved up front or waiting on the pair
/// `e^x`, `e^-x` from one shared reduction.
pub(crate) enum HyperbolicPlan {
    /// Resolved without the exponential pair
    Done(Float),
    /// Evaluate `e^x` and `e^-x`, then combine at `precision`
    Pair {
        reduction: ExpReduction,
        precision: Precision,
    },
}

impl HyperbolicPlan {
    /// Evaluate `e^x` then `e^-x`, one after the other.
    pub fn evaluate(self, config: &KernelConfig, combine: fn(&Float, &Float, Precision) -> Float) -> Float {
        match self {
            HyperbolicPlan::Done(value) => value,
            HyperbolicPlan::Pair { reduction, precision } => {
                let positive = reduction.evaluate(config);
                let negative = reduction.negated().evaluate(config);
                combine(&positive, &negative, precision)
            },
        }
    }
}

fn pair_plan(x: &Float, wp: Precision, config: &KernelConfig, overflow: Float) -> HyperbolicPlan {
    match exp::plan(x, wp, config) {
        ExpPlan::Reduced(reduction) => HyperbolicPlan::Pair {
            reduction,
            precision: wp,
        },
        ExpPlan::Done(_) => HyperbolicPlan::Done(overflow),
    }
}

/// `(e^x - e^-x) / 2`.
pub(crate) fn combine_sinh(positive: &Float, negative: &Float, wp: Precision) -> Float {
    positive.sub(negative, wp).mul_pow2(-1)
}

/// `(e^x + e^-x) / 2`.
pub(crate) fn combine_cosh(positive: &Float, negative: &Float, wp: Precision) -> Float {
    positive.add(negative, wp).mul_pow2(-1)
}

/// Plan `sinh x`. Arguments below one half use the odd Taylor series
/// directly, which avoids the cancellation in `e^x - e^-x`.
pub(crate) fn plan_sinh(x: &Float, precision: Precision, config: &KernelConfig) -> HyperbolicPlan {
    if !x.is_finite() || x.is_zero() {
        return HyperbolicPlan::Done(x.clone());
    }
    let wp = config.working_precision(precision, 8);

    if x.exponent().is_some_and(|e| e < 0) {
        let x2 = x.mul(x, wp);
        let series = sum_series(x.clone(), wp, config.max_series_terms, "sinh", |k, t| {
            t.mul(&x2, wp).div_u64((2 * k) * (2 * k + 1), wp)
        });
        return HyperbolicPlan::Done(series);
    }

    let overflow = Float::infinity(x.is_negative(), precision);
    pair_plan(x, wp, config, overflow)
}

/// Plan `cosh x`.
pub(crate) fn plan_cosh(x: &Float, precision: Precision, config: &KernelConfig) -> HyperbolicPlan {
    if x.is_nan() {
        return HyperbolicPlan::Done(Float::nan(precision));
    }
    if x.is_infinite() {
        return HyperbolicPlan::Done(Float::infinity(false, precision));
    }
    if x.is_zero() {
        return HyperbolicPlan::Done(Float::one(precision));
    }
    let wp = config.working_precision(precision, 8);
    pair_plan(x, wp, config, Float::infinity(false, precision))
}

/// Hyperbolic sine at working precision.
pub(crate) fn sinh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    plan_sinh(x, precision, config).evaluate(config, combine_sinh)
}

/// Hyperbolic cosine at working precision.
pub(crate) fn cosh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    plan_cosh(x, precision, config).evaluate(config, combine_cosh)
}

/// Hyperbolic tangent.
///
/// Beyond `|x| > (wp + 8) ln2 / 2` the result is `±(1 - 2^-(wp+4))`, a value
/// strictly inside `(-1, 1)` that rounds the way the true result does.
pub(crate) fn tanh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if x.is_nan() || x.is_zero() {
        return x.clone();
    }
    let wp = config.working_precision(precision, 8);
    let one = Float::one(wp);
    if x.is_infinite() {
        return if x.is_negative() { one.neg() } else { one };
    }

    let saturation = (wp.bits() + 8) as f64 * LN_2 / 2.0;
    if x.to_f64().abs() > saturation {
        let wide = wp.widened(8);
        let below_one = Float::one(wide).sub(&Float::one(wide).mul_pow2(-(wp.bits() as i64 + 4)), wide);
        return if x.is_negative() { below_one.neg() } else { below_one };
    }

    let s = sinh(x, wp, config);
    let c = cosh(x, wp, config);
    s.div(&c, wp)
}

/// `±ln(|x| + sqrt(x^2 + 1))`.
pub(crate) fn asinh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if !x.is_finite() || x.is_zero() {
        return x.clone();
    }
    let wp = config.working_precision(precision, 8);
    let ex = x.exponent().unwrap_or(0);
    let half = (wp.bits() / 2) as i64;
    let magnitude = x.abs();

    let value = if ex < -half {
        // x^3/6 is below 2^-wp relative to x
        let cube = magnitude.mul(&magnitude, wp).mul(&magnitude, wp);
        magnitude.sub(&cube.div_u64(6, wp), wp)
    } else if ex > half + 2 {
        // sqrt(x^2 + 1) = |x| to working precision, so asinh = ln(2|x|)
        log::ln(&magnitude.mul_pow2(1), wp, config)
    } else {
        // ln(1 + ~|x|) for small |x| needs -ex extra bits
        let w = wp.widened((-ex).max(0) as usize);
        let one = Float::one(w);
        let hyp = newton::root_wp(&magnitude.mul(&magnitude, w).add(&one, w), 2, w, config);
        log::ln(&magnitude.add(&hyp, w), w, config)
    };

    if x.is_negative() {
        value.neg()
    } else {
        value
    }
}

/// `ln(x + sqrt((x - 1)(x + 1)))` for `x >= 1`.
pub(crate) fn acosh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if x.is_nan() {
        return Float::nan(precision);
    }
    let one = Float::one(precision);
    if *x < one {
        return Float::nan(precision);
    }
    if *x == one {
        return Float::zero(precision);
    }
    if x.is_infinite() {
        return x.clone();
    }

    let wp = config.working_precision(precision, 8);
    let ex = x.exponent().unwrap_or(0);
    if ex > (wp.bits() / 2) as i64 + 2 {
        return log::ln(&x.mul_pow2(1), wp, config);
    }

    let wide = wp.max(x.precision()).widened(2);
    let gap = x.sub(&Float::one(wide), wide);
    // acosh(1 + d) ~ sqrt(2d): ln(1 + sqrt(2d)) needs -ed/2 extra bits
    let extra = (-gap.exponent().unwrap_or(0)).max(0) as usize / 2 + 8;
    let w = wp.widened(extra).max(wide);
    let product = gap.mul(&x.add(&Float::one(w), w), w);
    let root = newton::root_wp(&product, 2, w, config);
    log::ln(&x.add(&root, w), w, config)
}

/// `ln((1 + x) / (1 - x)) / 2` for `|x| < 1`.
pub(crate) fn atanh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if x.is_nan() || x.is_zero() {
        return x.clone();
    }
    let one = Float::one(precision);
    let magnitude = x.abs();
    if magnitude > one {
        return Float::nan(precision);
    }
    if magnitude == one {
        return Float::infinity(x.is_negative(), precision);
    }

    let wp = config.working_precision(precision, 8);
    let ex = x.exponent().unwrap_or(0);
    if ex < -((wp.bits() / 2) as i64) {
        let cube = x.mul(x, wp).mul(x, wp);
        return x.add(&cube.div_u64(3, wp), wp);
    }

    let w = wp.widened((-ex).max(0) as usize);
    let wide = w.max(x.precision()).widened(2);
    let unit = Float::one(wide);
    let ratio = unit.add(x, wide).div(&unit.sub(x, wide), w);
    log::ln(&ratio, w, config).mul_pow2(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_support::*;

    fn cfg() -> KernelConfig {
        KernelConfig::default()
    }

    #[test]
    fn test_matches_f64() {
        let d = Precision::DOUBLE;
        for v in [-5.0, -0.7, -1e-9, 0.25, 0.5, 1.0, 3.0, 20.0] {
            assert_near_f64(&sinh(&f(v), d, &cfg()), v.sinh());
            assert_near_f64(&cosh(&f(v), d, &cfg()), v.cosh());
            assert_near_f64(&tanh(&f(v), d, &cfg()), v.tanh());
            assert_near_f64(&asinh(&f(v), d, &cfg()), v.asinh());
        }
        for v in [1.0000001, 1.5, 10.0, 1e10] {
            assert_near_f64(&acosh(&f(v), d, &cfg()), v.acosh());
        }
        for v in [-0.999, -0.3, 1e-7, 0.5, 0.9] {
            assert_near_f64(&atanh(&f(v), d, &cfg()), v.atanh());
        }
    }

    #[test]
    fn test_special_values() {
        let d = Precision::DOUBLE;
        let inf = Float::infinity(false, d);
        assert!(sinh(&inf.neg(), d, &cfg()).is_negative());
        assert!(cosh(&inf.neg(), d, &cfg()).is_positive());
        assert_eq!(cosh(&f(0.0), d, &cfg()), Float::one(d));
        assert_eq!(tanh(&inf, d, &cfg()), Float::one(d));
        assert!(acosh(&f(0.5), d, &cfg()).is_nan());
        assert!(acosh(&f(1.0), d, &cfg()).is_zero());
        assert!(atanh(&f(1.5), d, &cfg()).is_nan());
        let pole = atanh(&f(-1.0), d, &cfg());
        assert!(pole.is_infinite() && pole.is_negative());
    }

    #[test]
    fn test_tanh_saturates_inside_unit_interval() {
        let d = Precision::DOUBLE;
        let t = tanh(&f(400.0), d, &cfg());
        assert!(t < Float::one(d));
        assert_eq!(t.with_precision(d), Float::one(d));
    }

    #[test]
    fn test_overflow() {
        let d = Precision::DOUBLE;
        let huge = Float::one(d).mul_pow2(40);
        assert!(sinh(&huge, d, &cfg()).is_infinite());
        let neg = sinh(&huge.neg(), d, &cfg());
        assert!(neg.is_infinite() && neg.is_negative());
        assert!(cosh(&huge.neg(), d, &cfg()).is_infinite());
    }

    #[test]
    fn test_inverse_round_trip() {
        let wp = p(160);
        let x = Float::from_f64(0.8125, wp);
        assert_bits(&asinh(&sinh(&x, wp, &cfg()), wp, &cfg()), &x, 150);
        assert_bits(&atanh(&tanh(&x, wp, &cfg()), wp, &cfg()), &x, 140);
        let big = Float::from_f64(2.5, wp);
        assert_bits(&acosh(&cosh(&big, wp, &cfg()), wp, &cfg()), &big, 150);
    }
}
