// ============================================================================
// Exponential Kernels
// exp(x) = 2^k * (e^(r / 2^s))^(2^s) with x = k ln2 + r
// ============================================================================

use super::constants;
use super::series::{bit_length, isqrt, report_exhausted, SeriesLane};
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use crate::rounding::is_integer;
use astro_float::EXPONENT_MAX;
use std::f64::consts::LN_2;

/// Largest `|x|` for which `e^x` neither overflows nor underflows.
///
/// The bound is symmetric so that `x` and `-x` are always reduced alike.
fn range_limit() -> f64 {
    EXPONENT_MAX as f64 * LN_2
}

/// Reduced form of an exponential argument.
///
/// Holds everything needed to finish `e^x`: the scaled remainder `r / 2^s`,
/// the squaring count `s`, the power of two `k` and the working precision.
#[derive(Debug, Clone)]
pub(crate) struct ExpReduction {
    k: i64,
    scaled: Float,
    squarings: u32,
    precision: Precision,
}

/// Outcome of planning an exponential.
pub(crate) enum ExpPlan {
    /// Special case resolved without series work
    Done(Float),
    /// Finite argument reduced and ready for summation
    Reduced(ExpReduction),
}

impl ExpReduction {
    /// Reduction of `-x`, given this reduction of `x`.
    ///
    /// Every step of the reduction is odd in `x`, so this equals planning
    /// `-x` from scratch.
    pub fn negated(&self) -> Self {
        Self {
            k: -self.k,
            scaled: self.scaled.neg(),
            squarings: self.squarings,
            precision: self.precision,
        }
    }

    /// Series lane for `e^(r / 2^s)`, starting at the constant term.
    pub fn lane(&self) -> SeriesLane {
        SeriesLane::new(Float::one(self.precision))
    }

    /// Add the next Taylor term `t_k = t_(k-1) * r / k`.
    pub fn step(&self, lane: &mut SeriesLane) -> bool {
        let wp = self.precision;
        lane.advance(wp, |k, t| t.mul(&self.scaled, wp).div_u64(k, wp))
    }

    /// Square `s` times and scale by `2^k`.
    pub fn reconstruct(&self, sum: Float) -> Float {
        let wp = self.precision;
        let mut value = sum;
        for _ in 0..self.squarings {
            value = value.mul(&value, wp);
        }
        value.mul_pow2(self.k)
    }

    /// Run the series to completion and reconstruct.
    pub fn evaluate(&self, config: &KernelConfig) -> Float {
        let mut lane = self.lane();
        for _ in 0..config.max_series_terms {
            if !self.step(&mut lane) {
                break;
            }
        }
        report_exhausted(&lane, "exp", config.max_series_terms);
        self.reconstruct(lane.finish())
    }
}

/// Plan `e^x` for a result at `precision`.
pub(crate) fn plan(x: &Float, precision: Precision, config: &KernelConfig) -> ExpPlan {
    if x.is_nan() {
        return ExpPlan::Done(Float::nan(precision));
    }
    if x.is_infinite() {
        return ExpPlan::Done(if x.is_negative() {
            Float::zero(precision)
        } else {
            Float::infinity(false, precision)
        });
    }
    if x.is_zero() {
        return ExpPlan::Done(Float::one(precision));
    }

    let estimate = x.to_f64();
    if estimate > range_limit() {
        return ExpPlan::Done(Float::infinity(false, precision));
    }
    if estimate < -range_limit() {
        return ExpPlan::Done(Float::zero(precision));
    }

    let wp = config.working_precision(precision, 8);
    let k = (estimate / LN_2).round() as i64;

    // x - k ln2 cancels about bit_length(k) leading bits
    let wr = wp.widened(bit_length(k.unsigned_abs()) + 4);
    let remainder = if k == 0 {
        x.clone()
    } else {
        let k_ln2 = constants::ln2(wr).mul(&Float::from_i64(k, wr), wr);
        x.sub(&k_ln2, wr)
    };

    let target = (config.max_reduction_steps as usize).min(isqrt(wp.bits())) as i64;
    let squarings = match remainder.exponent() {
        Some(e) => (target + e).clamp(0, target),
        None => 0,
    };
    let ws = wr.widened(squarings as usize);

    ExpPlan::Reduced(ExpReduction {
        k,
        scaled: remainder.mul_pow2(-squarings),
        squarings: squarings as u32,
        precision: ws,
    })
}

/// `e^x` at working precision for a result at `precision`.
pub(crate) fn exp(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    match plan(x, precision, config) {
        ExpPlan::Done(value) => value,
        ExpPlan::Reduced(reduction) => reduction.evaluate(config),
    }
}

/// `2^x`. Integer arguments are exact.
pub(crate) fn exp2(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if !x.is_finite() || x.is_zero() {
        return exp(x, precision, config);
    }

    let ex = x.exponent().unwrap_or(0);
    if ex <= 40 && is_integer(x) {
        let n = x.to_f64() as i64;
        return Float::one(precision).mul_pow2(n);
    }

    let wp = config.working_precision(precision, 8 + ex.max(0) as usize);
    let y = x.mul(&constants::ln2(wp), wp);
    exp(&y, precision, config)
}
