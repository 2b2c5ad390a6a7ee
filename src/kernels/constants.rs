// ============================================================================
// Mathematical Constants
// pi, ln 2, ln 10 and e at arbitrary working precision
// ============================================================================

use super::series::{bit_length, sum_series};
use crate::numeric::{Float, Precision};

/// Guard bits carried by every constant above the precision it is asked for.
const CONSTANT_GUARD: usize = 16;

/// Term cap for a series gaining `bits_per_term` bits per term.
fn term_cap(precision: Precision, bits_per_term: usize) -> usize {
    precision.bits() / bits_per_term.max(1) + 16
}

/// `atan(1/n) = sum (-1)^k / ((2k+1) n^(2k+1))`.
fn atan_inv(n: u64, wp: Precision) -> Float {
    let n2 = n * n;
    let mut power = Float::one(wp).div_u64(n, wp);
    let cap = term_cap(wp, bit_length(n2) - 1);
    sum_series(power.clone(), wp, cap, "atan_inv", |k, _| {
        power = power.div_u64(n2, wp).neg();
        power.div_u64(2 * k + 1, wp)
    })
}

/// `atanh(1/n) = sum 1 / ((2k+1) n^(2k+1))`.
fn atanh_inv(n: u64, wp: Precision) -> Float {
    let n2 = n * n;
    let mut power = Float::one(wp).div_u64(n, wp);
    let cap = term_cap(wp, bit_length(n2) - 1);
    sum_series(power.clone(), wp, cap, "atanh_inv", |k, _| {
        power = power.div_u64(n2, wp);
        power.div_u64(2 * k + 1, wp)
    })
}

/// pi by Machin's formula: `16 atan(1/5) - 4 atan(1/239)`.
pub(crate) fn pi(precision: Precision) -> Float {
    let wp = precision.widened(CONSTANT_GUARD);
    let a = atan_inv(5, wp).mul_pow2(4);
    let b = atan_inv(239, wp).mul_pow2(2);
    a.sub(&b, wp)
}

/// `ln 2 = 2 atanh(1/3)`.
pub(crate) fn ln2(precision: Precision) -> Float {
    let wp = precision.widened(CONSTANT_GUARD);
    atanh_inv(3, wp).mul_pow2(1)
}

/// `ln 10 = 3 ln 2 + 2 atanh(1/9)`, since `10 = 2^3 * 1.25` and
/// `1.25 = (1 + 1/9) / (1 - 1/9)`.
pub(crate) fn ln10(precision: Precision) -> Float {
    let wp = precision.widened(CONSTANT_GUARD);
    let three_ln2 = ln2(wp).mul_u64(3, wp);
    three_ln2.add(&atanh_inv(9, wp).mul_pow2(1), wp)
}

/// Euler's number by `sum 1/k!`.
pub(crate) fn e(precision: Precision) -> Float {
    let wp = precision.widened(CONSTANT_GUARD);
    // log2(k!) grows faster than k, so wp terms always suffice
    let cap = wp.bits() + 16;
    sum_series(Float::one(wp), wp, cap, "e", |k, t| t.div_u64(k, wp))
}
