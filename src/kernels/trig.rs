// ============================================================================
// Trigonometric Kernels
// Quadrant reduction by pi/2, triple-angle reduction, Taylor series
// ============================================================================

use super::constants;
use super::series::{isqrt, report_exhausted, SeriesLane};
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use crate::rounding::{modulo, round_even};
use tracing::debug;

/// Reduced form of a trigonometric argument.
///
/// `x = n pi/2 + r` with `|r| <= pi/4`, then `a = r / 3^s`. Sine and cosine
/// of `a` come from their Taylor series; `s` triple-angle steps recover
/// `sin r` and `cos r`, and the quadrant `n mod 4` maps those back to `x`.
#[derive(Debug, Clone)]
pub(crate) struct TrigReduction {
    quadrant: u8,
    angle: Float,
    angle_squared: Float,
    triplings: u32,
    precision: Precision,
}

impl TrigReduction {
    /// Reduce `x` (finite, non-zero) for a result at working precision `wp`.
    pub fn new(x: &Float, wp: Precision, config: &KernelConfig) -> Self {
        let ex = x.exponent().unwrap_or(0);
        if ex > config.max_reduction_exponent {
            debug!(exponent = ex, limit = config.max_reduction_exponent, "argument too large for accurate pi/2 reduction");
        }
        let extra = ex.clamp(0, config.max_reduction_exponent) as usize;

        // pi/2 needs as many extra bits as x has integer bits
        let mut wr = wp.widened(extra + 8);
        let (mut quadrant, mut remainder) = reduce_quadrant(x, wr);

        // x close to a multiple of pi/2 cancels further leading bits
        if let Some(er) = remainder.exponent() {
            let lost = ex.max(0) - er;
            if ex >= 0 && lost > 8 {
                wr = wr.widened(lost.min(config.max_reduction_exponent) as usize);
                (quadrant, remainder) = reduce_quadrant(x, wr);
            }
        }

        let target = (config.max_reduction_steps as usize).min(isqrt(wp.bits()) / 2 + 1) as i64;
        let triplings = match remainder.exponent() {
            // each tripling divides by 3, about 1.58 bits
            Some(e) => (target + e * 2 / 3).clamp(0, target),
            None => 0,
        };

        // the triple-angle formulas amplify error by at most 16x per step
        let wt = wr.widened(4 * triplings as usize + 8);
        let mut angle = remainder;
        for _ in 0..triplings {
            angle = angle.div_u64(3, wt);
        }
        let angle_squared = angle.mul(&angle, wt);

        Self {
            quadrant,
            angle,
            angle_squared,
            triplings: triplings as u32,
            precision: wt,
        }
    }

    /// Quadrant of `x`: `n mod 4`.
    #[inline]
    pub fn quadrant(&self) -> u8 {
        self.quadrant
    }

    /// Series lane for `sin a`.
    pub fn sin_lane(&self) -> SeriesLane {
        SeriesLane::new(self.angle.clone())
    }

    /// Series lane for `cos a`.
    pub fn cos_lane(&self) -> SeriesLane {
        SeriesLane::new(Float::one(self.precision))
    }

    /// Next sine term: `-t a^2 / ((2k)(2k+1))`.
    pub fn step_sin(&self, lane: &mut SeriesLane) -> bool {
        let wp = self.precision;
        lane.advance(wp, |k, t| {
            t.mul(&self.angle_squared, wp)
                .div_u64((2 * k) * (2 * k + 1), wp)
                .neg()
        })
    }

    /// Next cosine term: `-t a^2 / ((2k-1)(2k))`.
    pub fn step_cos(&self, lane: &mut SeriesLane) -> bool {
        let wp = self.precision;
        lane.advance(wp, |k, t| {
            t.mul(&self.angle_squared, wp)
                .div_u64((2 * k - 1) * (2 * k), wp)
                .neg()
        })
    }

    /// `sin r` from `sin a` via `sin 3t = s (3 - 4 s^2)`.
    pub fn finish_sin(&self, lane: SeriesLane) -> Float {
        let wp = self.precision;
        let three = Float::from_i64(3, wp);
        let mut s = lane.finish();
        for _ in 0..self.triplings {
            let s2 = s.mul(&s, wp);
            s = s.mul(&three.sub(&s2.mul_pow2(2), wp), wp);
        }
        s
    }

    /// `cos r` from `cos a` via `cos 3t = c (4 c^2 - 3)`.
    pub fn finish_cos(&self, lane: SeriesLane) -> Float {
        let wp = self.precision;
        let three = Float::from_i64(3, wp);
        let mut c = lane.finish();
        for _ in 0..self.triplings {
            let c2 = c.mul(&c, wp);
            c = c.mul(&c2.mul_pow2(2).sub(&three, wp), wp);
        }
        c
    }

    /// Run a single lane to completion.
    fn run<F>(&self, mut lane: SeriesLane, config: &KernelConfig, label: &'static str, step: F) -> SeriesLane
    where
        F: Fn(&Self, &mut SeriesLane) -> bool,
    {
        let cap = config.max_series_terms;
        for _ in 0..cap {
            if !step(self, &mut lane) {
                break;
            }
        }
        report_exhausted(&lane, label, cap);
        lane
    }

    /// `sin r`.
    pub fn sin_r(&self, config: &KernelConfig) -> Float {
        let lane = self.run(self.sin_lane(), config, "sin", Self::step_sin);
        self.finish_sin(lane)
    }

    /// `cos r`.
    pub fn cos_r(&self, config: &KernelConfig) -> Float {
        let lane = self.run(self.cos_lane(), config, "cos", Self::step_cos);
        self.finish_cos(lane)
    }

    /// `tan x` from `sin r` and `cos r`.
    pub fn tan_from(&self, sin_r: &Float, cos_r: &Float) -> Float {
        let wp = self.precision;
        if self.quadrant % 2 == 0 {
            sin_r.div(cos_r, wp)
        } else {
            cos_r.div(sin_r, wp).neg()
        }
    }
}

/// `(n mod 4, x - n pi/2)` with `n = round(x / (pi/2))`, computed at `wr`.
fn reduce_quadrant(x: &Float, wr: Precision) -> (u8, Float) {
    if x.exponent().map_or(true, |e| e < 0) {
        return (0, x.clone());
    }
    let half_pi = constants::pi(wr).mul_pow2(-1);
    let n = round_even(&x.div(&half_pi, wr));
    let quadrant = modulo(&n, &Float::from_i64(4, wr)).to_f64() as u8;
    (quadrant, x.sub(&n.mul(&half_pi, wr), wr))
}

/// Working precision shared by sine, cosine and tangent.
pub(crate) fn working_precision(precision: Precision, config: &KernelConfig) -> Precision {
    config.working_precision(precision, 8)
}

/// Results that need no reduction: NaN, infinities and zero.
pub(crate) fn special(x: &Float, precision: Precision, zero_value: Float) -> Option<Float> {
    if !x.is_finite() {
        return Some(Float::nan(precision));
    }
    if x.is_zero() {
        return Some(zero_value);
    }
    None
}

/// Sine at working precision.
pub(crate) fn sin(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(value) = special(x, precision, x.clone()) {
        return value;
    }
    let reduction = TrigReduction::new(x, working_precision(precision, config), config);
    match reduction.quadrant() {
        0 => reduction.sin_r(config),
        1 => reduction.cos_r(config),
        2 => reduction.sin_r(config).neg(),
        _ => reduction.cos_r(config).neg(),
    }
}

/// Cosine at working precision.
pub(crate) fn cos(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(value) = special(x, precision, Float::one(precision)) {
        return value;
    }
    let reduction = TrigReduction::new(x, working_precision(precision, config), config);
    match reduction.quadrant() {
        0 => reduction.cos_r(config),
        1 => reduction.sin_r(config).neg(),
        2 => reduction.cos_r(config).neg(),
        _ => reduction.sin_r(config),
    }
}

/// Tangent as `sin / cos`, one series after the other.
pub(crate) fn tan(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(value) = special(x, precision, x.clone()) {
        return value;
    }
    let reduction = TrigReduction::new(x, working_precision(precision, config), config);
    let sin_r = reduction.sin_r(config);
    let cos_r = reduction.cos_r(config);
    reduction.tan_from(&sin_r, &cos_r)
}
