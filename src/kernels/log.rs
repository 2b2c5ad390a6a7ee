// ============================================================================
// Logarithm Kernels
// ln(x) = e ln2 + 2^(s+1) atanh((m' - 1) / (m' + 1)), m' = m^(1/2^s)
// ============================================================================

use super::constants;
use super::series::{bit_length, isqrt, sum_series};
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use crate::rounding::is_integer;
use crate::solvers::newton;

/// Special cases shared by every logarithm base.
fn log_special(x: &Float, precision: Precision) -> Option<Float> {
    if x.is_nan() || x.is_negative() {
        return Some(Float::nan(precision));
    }
    if x.is_zero() {
        return Some(Float::infinity(true, precision));
    }
    if x.is_infinite() {
        return Some(Float::infinity(false, precision));
    }
    if *x == Float::one(precision) {
        return Some(Float::zero(precision));
    }
    None
}

/// `2 atanh(z) = 2 (z + z^3/3 + z^5/5 + ...)`.
fn two_atanh_series(z: &Float, wp: Precision, config: &KernelConfig) -> Float {
    let z2 = z.mul(z, wp);
    let mut power = z.clone();
    let sum = sum_series(z.clone(), wp, config.max_series_terms, "atanh", |k, _| {
        power = power.mul(&z2, wp);
        power.div_u64(2 * k + 1, wp)
    });
    sum.mul_pow2(1)
}

/// `ln m` for `m` in `[sqrt(1/2), sqrt(2))`.
///
/// Square roots bring `|m - 1|` below `2^-target`, the target growing with
/// the working precision so the series length stays bounded.
fn ln_centered(m: &Float, wp: Precision, config: &KernelConfig) -> Float {
    let one = Float::one(wp);
    let target = (config.max_reduction_steps as usize).min(isqrt(wp.bits())) as i64;
    let mut m = m.clone();
    let mut halvings = 0u32;
    while halvings < config.max_reduction_steps {
        let gap = m.sub(&one, wp);
        match gap.exponent() {
            Some(e) if e > -target => {
                m = newton::root_wp(&m, 2, wp, config);
                halvings += 1;
            },
            _ => break,
        }
    }

    // no cancellation: m - 1 is formed directly, not as ln m - 0
    let z = m.sub(&one, wp).div(&m.add(&one, wp), wp);
    two_atanh_series(&z, wp, config).mul_pow2(i64::from(halvings))
}

/// Natural logarithm at working precision.
pub(crate) fn ln(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(special) = log_special(x, precision) {
        return special;
    }

    let wp = config.working_precision(precision, 8 + config.max_reduction_steps as usize);
    let Some((mut m, mut e)) = x.frexp() else {
        return Float::nan(precision);
    };
    // m in [0.5, 1): move it to [sqrt(1/2), sqrt(2)) so |ln m| <= ln2 / 2
    if m.to_f64() < std::f64::consts::FRAC_1_SQRT_2 {
        m = m.mul_pow2(1);
        e -= 1;
    }

    let ln_m = ln_centered(&m, wp, config);
    if e == 0 {
        return ln_m;
    }
    let we = wp.widened(bit_length(e.unsigned_abs()));
    let e_ln2 = constants::ln2(we).mul(&Float::from_i64(e, we), we);
    e_ln2.add(&ln_m, we)
}

/// Base-2 logarithm. Exact powers of two give exact integers.
pub(crate) fn log2(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(special) = log_special(x, precision) {
        return special;
    }
    if let Some((m, e)) = x.frexp() {
        if m.to_f64() == 0.5 && m == Float::one(precision).mul_pow2(-1) {
            return Float::from_i64(e - 1, Precision::EXTENDED);
        }
    }

    let wp = config.working_precision(precision, 8);
    ln(x, wp, config).div(&constants::ln2(wp), wp)
}

/// Base-10 logarithm. Exact powers of ten give exact integers.
pub(crate) fn log10(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(special) = log_special(x, precision) {
        return special;
    }

    let wp = config.working_precision(precision, 8);
    let value = ln(x, wp, config).div(&constants::ln10(wp), wp);

    if let Some(k) = exact_power_of_ten(x, &value) {
        return Float::from_i64(k, Precision::EXTENDED);
    }
    value
}

/// `Some(k)` when `x == 10^k` exactly for a non-negative integer `k`.
fn exact_power_of_ten(x: &Float, estimate: &Float) -> Option<i64> {
    if !is_integer(x) {
        return None;
    }
    let k = estimate.to_f64().round();
    if !(0.0..=4000.0).contains(&k) {
        return None;
    }
    let k = k as u64;

    // 10^k = 5^k 2^k needs about 2.33 k bits
    let bits = Precision::saturating((k as usize) * 7 / 3 + 8);
    let mut power = Float::one(bits);
    for _ in 0..k {
        power = power.mul_u64(10, bits);
    }
    (power == *x).then_some(k as i64)
}
