// ============================================================================
// Newton-Raphson Root Solvers
// g <- ((n-1) g + S / g^(n-1)) / n, seeded from a double estimate
// ============================================================================

use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};
use tracing::debug;

/// Largest `n * p` for which a candidate root is raised back to the power to
/// check for exactness.
const EXACT_CHECK_BITS: usize = 1 << 16;

/// `x^k` by binary exponentiation at `precision`.
pub(crate) fn pow_u64(x: &Float, mut k: u64, precision: Precision) -> Float {
    let mut result = Float::one(precision);
    let mut base = x.clone();
    while k > 0 {
        if k & 1 == 1 {
            result = result.mul(&base, precision);
        }
        k >>= 1;
        if k > 0 {
            base = base.mul(&base, precision);
        }
    }
    result
}

/// Double-precision seed for `x^(1/n)`, `x` finite and positive.
///
/// With `x = m 2^e` the seed is `2^((log2 m + r) / n) * 2^q` where
/// `e = q n + r`, which never overflows a double.
fn seed(x: &Float, n: u64, precision: Precision) -> Float {
    let Some((m, e)) = x.frexp() else {
        return Float::one(precision);
    };
    let n_i = n as i64;
    let q = e.div_euclid(n_i);
    let r = e.rem_euclid(n_i);
    let fraction = ((m.to_f64().log2() + r as f64) / n as f64).exp2();
    Float::from_f64(fraction, precision).mul_pow2(q)
}

/// Positive `n`-th root of a finite positive `x` at working precision `wp`.
///
/// Iterates until the step drops below `|g| 2^-(wp-4)` or the configured cap
/// is reached; the cap is not an error.
pub(crate) fn root_wp(x: &Float, n: u64, wp: Precision, config: &KernelConfig) -> Float {
    if n == 1 {
        return x.clone();
    }

    let mut guess = seed(x, n, wp);
    let threshold = wp.bits() as i64 - 4;

    for _ in 0..config.max_newton_iterations {
        let power = pow_u64(&guess, n - 1, wp);
        let next = guess
            .mul_u64(n - 1, wp)
            .add(&x.div(&power, wp), wp)
            .div_u64(n, wp);

        let step = next.sub(&guess, wp);
        guess = next;

        let converged = match (step.exponent(), guess.exponent()) {
            (None, _) => true,
            (Some(s), Some(g)) => s < g - threshold,
            (Some(_), None) => false,
        };
        if converged {
            return guess;
        }
    }

    debug!(degree = n, cap = config.max_newton_iterations, "newton iteration hit its cap before converging");
    guess
}

/// `x^(1/n)` with special cases, for a result at `precision`.
///
/// Degree `n <= 0` and even roots of negative numbers are NaN; odd roots of
/// negative numbers are negated roots of `|x|`. Perfect powers return the
/// exact root.
pub(crate) fn root(x: &Float, n: i64, precision: Precision, config: &KernelConfig) -> Float {
    if n <= 0 || x.is_nan() {
        return Float::nan(precision);
    }
    if n == 1 || x.is_zero() {
        return x.clone();
    }
    let odd = n % 2 == 1;
    if x.is_negative() && !odd {
        return Float::nan(precision);
    }
    if x.is_infinite() {
        return x.clone();
    }

    let n = n as u64;
    let magnitude = x.abs();
    let wp = config.working_precision(precision, 8);
    let mut value = root_wp(&magnitude, n, wp, config);

    if let Some(exact) = exact_root(&magnitude, &value, n, precision) {
        value = exact;
    }

    if x.is_negative() {
        value.neg()
    } else {
        value
    }
}

/// The root rounded to `precision`, if raising it back to `n` gives `x`.
fn exact_root(x: &Float, approx: &Float, n: u64, precision: Precision) -> Option<Float> {
    let bits = (n as usize).checked_mul(precision.bits())?;
    if bits > EXACT_CHECK_BITS {
        return None;
    }
    let candidate = approx.with_precision(precision);
    let power = pow_u64(&candidate, n, Precision::saturating(bits + 1));
    (power == *x).then_some(candidate)
}

/// Square root.
pub(crate) fn sqrt(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    root(x, 2, precision, config)
}

/// Cube root.
pub(crate) fn cbrt(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    root(x, 3, precision, config)
}
