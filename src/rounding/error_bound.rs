// ============================================================================
// Error Bounds
// Units-in-last-place and absolute error tracking across chained operations
// ============================================================================

use super::policy::RoundingPolicy;
use crate::numeric::{Float, Precision};

/// Precision used for error arithmetic. Error magnitudes only need a few
/// significant bits; the wide exponent range is what matters.
const BOUND_PRECISION: Precision = Precision::EXTENDED;

/// Unit in the last place of `x` at `precision`: `2^(e - p)` where
/// `2^(e-1) <= |x| < 2^e`.
///
/// `None` for zero, NaN and infinities.
pub fn ulp(x: &Float, precision: Precision) -> Option<Float> {
    let exponent = x.exponent()?;
    Some(Float::half_power(
        false,
        exponent - precision.bits() as i64 + 1,
        precision,
    ))
}

/// Bound on the error of a computed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBound {
    /// Error in units in the last place of the bounded value
    Ulps(f64),
    /// Error as an absolute magnitude
    Absolute(Float),
}

impl ErrorBound {
    /// A bound of zero: the value is exact.
    pub fn exact() -> Self {
        ErrorBound::Ulps(0.0)
    }

    /// Bound introduced by rounding one result under `policy`.
    pub fn rounding(policy: RoundingPolicy) -> Self {
        ErrorBound::Ulps(policy.max_error_ulps())
    }

    /// Absolute magnitude of the bound for `value` at `precision`.
    ///
    /// A ULP bound on zero converts to zero: zero has no last place.
    pub fn to_absolute(&self, value: &Float, precision: Precision) -> Float {
        match self {
            ErrorBound::Absolute(err) => err.abs().retag(BOUND_PRECISION),
            ErrorBound::Ulps(count) => match ulp(value, precision) {
                Some(unit) => unit.mul(&Float::from_f64(count.abs(), BOUND_PRECISION), BOUND_PRECISION),
                None => Float::zero(BOUND_PRECISION),
            },
        }
    }

    /// The bound in ULPs of `value` at `precision`.
    ///
    /// A non-zero absolute bound on zero is infinitely many ULPs.
    pub fn to_ulps(&self, value: &Float, precision: Precision) -> f64 {
        match self {
            ErrorBound::Ulps(count) => count.abs(),
            ErrorBound::Absolute(err) => match ulp(value, precision) {
                Some(unit) => err.abs().div(&unit, BOUND_PRECISION).to_f64(),
                None if err.is_zero() => 0.0,
                None => f64::INFINITY,
            },
        }
    }

    /// Sum of two independent bounds on the same value.
    pub fn combine(&self, other: &Self, value: &Float, precision: Precision) -> Self {
        match (self, other) {
            (ErrorBound::Ulps(a), ErrorBound::Ulps(b)) => ErrorBound::Ulps(a.abs() + b.abs()),
            _ => ErrorBound::Absolute(
                self.to_absolute(value, precision)
                    .add(&other.to_absolute(value, precision), BOUND_PRECISION),
            ),
        }
    }

    /// Bound on `result = a + b` rounded to `precision` under `policy`.
    ///
    /// Absolute input errors add; the final rounding contributes half an ULP
    /// of the result for nearest policies and one ULP otherwise.
    pub fn propagate_add(
        a: (&Float, &ErrorBound),
        b: (&Float, &ErrorBound),
        result: &Float,
        precision: Precision,
        policy: RoundingPolicy,
    ) -> Self {
        let inputs = a
            .1
            .to_absolute(a.0, precision)
            .add(&b.1.to_absolute(b.0, precision), BOUND_PRECISION);
        let rounding = Self::rounding(policy).to_absolute(result, precision);
        ErrorBound::Absolute(inputs.add(&rounding, BOUND_PRECISION))
    }

    /// Bound on `result = a * b` rounded to `precision` under `policy`.
    ///
    /// Relative input errors add (plus their product); the sum is expressed in
    /// ULPs of the result and the final rounding term is added on top.
    pub fn propagate_mul(
        a: (&Float, &ErrorBound),
        b: (&Float, &ErrorBound),
        result: &Float,
        precision: Precision,
        policy: RoundingPolicy,
    ) -> Self {
        let rel_a = relative(a.0, a.1, precision);
        let rel_b = relative(b.0, b.1, precision);
        let (Some(rel_a), Some(rel_b)) = (rel_a, rel_b) else {
            // an exact zero factor makes the product exact up to rounding
            return if a.0.is_zero() && a.1.to_absolute(a.0, precision).is_zero()
                || b.0.is_zero() && b.1.to_absolute(b.0, precision).is_zero()
            {
                Self::rounding(policy)
            } else {
                ErrorBound::Ulps(f64::INFINITY)
            };
        };

        let relative_total = rel_a
            .add(&rel_b, BOUND_PRECISION)
            .add(&rel_a.mul(&rel_b, BOUND_PRECISION), BOUND_PRECISION);
        let absolute = relative_total.mul(&result.abs(), BOUND_PRECISION);
        let ulps = ErrorBound::Absolute(absolute).to_ulps(result, precision);
        ErrorBound::Ulps(ulps + policy.max_error_ulps())
    }

    /// Whether `exact` lies within this bound of `approx`.
    pub fn contains(&self, approx: &Float, exact: &Float, precision: Precision) -> bool {
        if approx.is_nan() || exact.is_nan() {
            return false;
        }
        if approx.is_infinite() || exact.is_infinite() {
            return approx == exact;
        }
        let wide = approx.precision().max(exact.precision()).widened(precision.bits());
        let distance = approx.sub(exact, wide).abs();
        distance <= self.to_absolute(approx, precision)
    }
}

/// Relative error `|err| / |value|`, `None` for a zero value.
fn relative(value: &Float, bound: &ErrorBound, precision: Precision) -> Option<Float> {
    if value.is_zero() || !value.is_finite() {
        return None;
    }
    Some(
        bound
            .to_absolute(value, precision)
            .div(&value.abs(), BOUND_PRECISION),
    )
}
