// ============================================================================
// Free Functions
// Every operation on the process-global engine
// ============================================================================
//
// The first call populates the global dispatch table; later calls read it
// without synchronization.

use crate::engine::MathEngine;
use crate::numeric::{Float, Precision};
use crate::polynomial::ChebyshevSegment;
use crate::rounding::{RoundingPolicy, Ternary};

pub use crate::rounding::{ceil, floor, frac, modulo, rem, round, round_even, round_to_precision, trunc};

macro_rules! unary_functions {
    ($($name:ident, $rounded:ident;)*) => {
        $(
            #[doc = concat!("`", stringify!($name), "(x)` on the global engine. See [`MathEngine::", stringify!($name), "`].")]
            pub fn $name(x: &Float, precision: Option<Precision>) -> Float {
                MathEngine::global().$name(x, precision)
            }

            #[doc = concat!("`", stringify!($name), "(x)` under `policy`. See [`MathEngine::", stringify!($rounded), "`].")]
            pub fn $rounded(x: &Float, precision: Option<Precision>, policy: RoundingPolicy) -> (Float, Ternary) {
                MathEngine::global().$rounded(x, precision, policy)
            }
        )*
    };
}

unary_functions! {
    sin, sin_rounded;
    cos, cos_rounded;
    tan, tan_rounded;
    asin, asin_rounded;
    acos, acos_rounded;
    atan, atan_rounded;
    sinh, sinh_rounded;
    cosh, cosh_rounded;
    tanh, tanh_rounded;
    asinh, asinh_rounded;
    acosh, acosh_rounded;
    atanh, atanh_rounded;
    exp, exp_rounded;
    exp2, exp2_rounded;
    ln, ln_rounded;
    log2, log2_rounded;
    log10, log10_rounded;
    sqrt, sqrt_rounded;
    cbrt, cbrt_rounded;
}

/// `atan2(y, x)` on the global engine.
pub fn atan2(y: &Float, x: &Float, precision: Option<Precision>) -> Float {
    MathEngine::global().atan2(y, x, precision)
}

/// `atan2(y, x)` under `policy`.
pub fn atan2_rounded(y: &Float, x: &Float, precision: Option<Precision>, policy: RoundingPolicy) -> (Float, Ternary) {
    MathEngine::global().atan2_rounded(y, x, precision, policy)
}

/// `x^y` on the global engine.
pub fn pow(x: &Float, y: &Float, precision: Option<Precision>) -> Float {
    MathEngine::global().pow(x, y, precision)
}

/// `x^y` under `policy`.
pub fn pow_rounded(x: &Float, y: &Float, precision: Option<Precision>, policy: RoundingPolicy) -> (Float, Ternary) {
    MathEngine::global().pow_rounded(x, y, precision, policy)
}

/// `x^n` on the global engine.
pub fn powi(x: &Float, n: i64, precision: Option<Precision>) -> Float {
    MathEngine::global().powi(x, n, precision)
}

/// `x^n` under `policy`.
pub fn powi_rounded(x: &Float, n: i64, precision: Option<Precision>, policy: RoundingPolicy) -> (Float, Ternary) {
    MathEngine::global().powi_rounded(x, n, precision, policy)
}

/// `n`-th root on the global engine.
pub fn root(x: &Float, n: i64, precision: Option<Precision>) -> Float {
    MathEngine::global().root(x, n, precision)
}

/// `n`-th root under `policy`.
pub fn root_rounded(x: &Float, n: i64, precision: Option<Precision>, policy: RoundingPolicy) -> (Float, Ternary) {
    MathEngine::global().root_rounded(x, n, precision, policy)
}

/// Chebyshev series value on the global engine.
pub fn chebyshev(coefficients: &[Float], t: &Float, precision: Option<Precision>) -> Float {
    MathEngine::global().chebyshev(coefficients, t, precision)
}

/// Chebyshev series value under `policy`.
pub fn chebyshev_rounded(
    coefficients: &[Float],
    t: &Float,
    precision: Option<Precision>,
    policy: RoundingPolicy,
) -> (Float, Ternary) {
    MathEngine::global().chebyshev_rounded(coefficients, t, precision, policy)
}

/// Chebyshev series derivative on the global engine.
pub fn chebyshev_derivative(coefficients: &[Float], t: &Float, precision: Option<Precision>) -> Float {
    MathEngine::global().chebyshev_derivative(coefficients, t, precision)
}

/// Chebyshev series derivative under `policy`.
pub fn chebyshev_derivative_rounded(
    coefficients: &[Float],
    t: &Float,
    precision: Option<Precision>,
    policy: RoundingPolicy,
) -> (Float, Ternary) {
    MathEngine::global().chebyshev_derivative_rounded(coefficients, t, precision, policy)
}

/// Per-component Chebyshev values on the global engine.
pub fn chebyshev_components(series: &[&[Float]], t: &Float, precision: Option<Precision>) -> Vec<Float> {
    MathEngine::global().chebyshev_components(series, t, precision)
}

/// Per-component Chebyshev values under `policy`.
pub fn chebyshev_components_rounded(
    series: &[&[Float]],
    t: &Float,
    precision: Option<Precision>,
    policy: RoundingPolicy,
) -> Vec<(Float, Ternary)> {
    MathEngine::global().chebyshev_components_rounded(series, t, precision, policy)
}

/// Segment components at `time` on the global engine.
pub fn position(segment: &ChebyshevSegment, time: &Float, precision: Option<Precision>) -> Vec<Float> {
    MathEngine::global().position(segment, time, precision)
}

/// Segment rates at `time` on the global engine.
pub fn velocity(segment: &ChebyshevSegment, time: &Float, precision: Option<Precision>) -> Vec<Float> {
    MathEngine::global().velocity(segment, time, precision)
}

/// `pi` at `precision`.
pub fn pi(precision: Precision) -> Float {
    MathEngine::global().pi(precision)
}

/// `ln 2` at `precision`.
pub fn ln2(precision: Precision) -> Float {
    MathEngine::global().ln2(precision)
}

/// Euler's number at `precision`.
pub fn e(precision: Precision) -> Float {
    MathEngine::global().e(precision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{dispatch_state, DispatchState};

    fn f(v: f64) -> Float {
        Float::from_f64(v, Precision::DOUBLE)
    }

    #[test]
    fn test_free_functions_populate_dispatch() {
        let _ = sin(&f(1.0), None);
        assert_eq!(dispatch_state(), DispatchState::Populated);
    }

    #[test]
    fn test_free_functions_match_engine() {
        let engine = MathEngine::global();
        let x = f(0.75);
        assert_eq!(tan(&x, None), engine.tan(&x, None));
        assert_eq!(pow(&x, &f(2.5), None), engine.pow(&x, &f(2.5), None));
        assert_eq!(root(&x, 5, None), engine.root(&x, 5, None));
    }

    #[test]
    fn test_nan_propagates() {
        let nan = Float::nan(Precision::DOUBLE);
        assert!(exp(&nan, None).is_nan());
        assert!(atan2(&nan, &f(1.0), None).is_nan());
        assert!(chebyshev(&[f(1.0), f(2.0)], &nan, None).is_nan());
    }

    #[test]
    fn test_integral_reexports() {
        assert_eq!(floor(&f(-3.7)), f(-4.0));
        assert_eq!(ceil(&f(-3.7)), f(-3.0));
        assert_eq!(trunc(&f(-3.7)), f(-3.0));
    }
}
