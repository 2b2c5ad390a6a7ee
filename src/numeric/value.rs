// ============================================================================
// Float
// Arbitrary-precision value backed by astro-float's BigFloat
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::precision::Precision;
use crate::rounding::{round_to_precision, RoundingPolicy};
use astro_float::{
    BigFloat, Consts, Exponent, Radix, RoundingMode, Sign, Word, EXPONENT_MAX, EXPONENT_MIN,
    INF_NEG, INF_POS, NAN, WORD_BIT_SIZE,
};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

/// Rounding used for the collaborator's basic operations.
///
/// Only intermediate results at working precision go through it; results
/// returned to callers are rounded by [`crate::rounding`].
const BASIC_RM: RoundingMode = RoundingMode::ToEven;

/// Borrowed view of a finite, non-zero value's mantissa.
///
/// `value = 0.m × 2^exponent` with the mantissa words stored least
/// significant first and the top bit of the last word set.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawMantissa<'a> {
    pub words: &'a [Word],
    pub negative: bool,
    pub exponent: i64,
    pub inexact: bool,
}

/// Arbitrary-precision binary floating-point value.
///
/// A `Float` carries the precision it was produced at. Public operations
/// never mutate a value once returned; every result is a fresh `Float`.
#[derive(Clone, Debug)]
pub struct Float {
    inner: BigFloat,
    precision: Precision,
}

impl Float {
    #[inline]
    fn wrap(inner: BigFloat, precision: Precision) -> Self {
        Self { inner, precision }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Positive zero.
    pub fn zero(precision: Precision) -> Self {
        Self::wrap(BigFloat::from_word(0, precision.bits()), precision)
    }

    /// One.
    pub fn one(precision: Precision) -> Self {
        Self::wrap(BigFloat::from_word(1, precision.bits()), precision)
    }

    /// Not-a-number, the result of every domain error.
    pub fn nan(precision: Precision) -> Self {
        Self::wrap(NAN.clone(), precision)
    }

    /// Positive or negative infinity.
    pub fn infinity(negative: bool, precision: Precision) -> Self {
        let inner = if negative { INF_NEG.clone() } else { INF_POS.clone() };
        Self::wrap(inner, precision)
    }

    /// Create from an unsigned integer, rounded to `precision`.
    pub fn from_u64(value: u64, precision: Precision) -> Self {
        // Assembled from two halves so the construction does not depend on
        // the collaborator's word size.
        let wide = Precision::EXTENDED.widened(64);
        let high = Self::wrap(BigFloat::from_f64((value >> 32) as f64, wide.bits()), wide);
        let low = Self::wrap(BigFloat::from_f64((value & 0xffff_ffff) as f64, wide.bits()), wide);
        let exact = high.mul_pow2(32).add(&low, wide);
        round_to_precision(&exact, precision, RoundingPolicy::NearestTiesEven).0
    }

    /// Create from a signed integer, rounded to `precision`.
    pub fn from_i64(value: i64, precision: Precision) -> Self {
        let magnitude = Self::from_u64(value.unsigned_abs(), precision);
        if value < 0 {
            magnitude.neg()
        } else {
            magnitude
        }
    }

    /// Create from a double, rounded to `precision`.
    ///
    /// NaN and infinities map to the corresponding special values.
    pub fn from_f64(value: f64, precision: Precision) -> Self {
        let exact = Self::wrap(
            BigFloat::from_f64(value, Precision::EXTENDED.bits()),
            Precision::EXTENDED,
        );
        round_to_precision(&exact, precision, RoundingPolicy::NearestTiesEven).0
    }

    /// Parse a decimal string such as `"-1.25e-3"`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the text is not a number.
    pub fn parse(text: &str, precision: Precision) -> NumericResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NumericError::InvalidInput);
        }

        let mut consts = Consts::new().map_err(|_| NumericError::InvalidInput)?;
        let parsed = BigFloat::parse(text, Radix::Dec, precision.bits(), BASIC_RM, &mut consts);

        if parsed.is_nan() && !text.eq_ignore_ascii_case("nan") {
            return Err(NumericError::InvalidInput);
        }
        Ok(Self::wrap(parsed, precision))
    }

    /// Convert from `rust_decimal::Decimal`, rounded to `precision`.
    ///
    /// Intended for API boundaries where values arrive as decimals.
    pub fn from_decimal(value: rust_decimal::Decimal, precision: Precision) -> Self {
        let wide = Precision::saturating(192);
        let magnitude = value.mantissa().unsigned_abs();
        let high = Self::from_u64((magnitude >> 64) as u64, wide);
        let low = Self::from_u64(magnitude as u64, wide);
        let mut numerator = high.mul_pow2(64).add(&low, wide);
        if value.is_sign_negative() {
            numerator = numerator.neg();
        }

        let ten = Self::from_u64(10, wide);
        let mut divisor = Self::one(wide);
        for _ in 0..value.scale() {
            divisor = divisor.mul(&ten, wide);
        }

        let quotient = numerator.div(&divisor, precision.widened(64));
        round_to_precision(&quotient, precision, RoundingPolicy::NearestTiesEven).0
    }

    // ========================================================================
    // Precision
    // ========================================================================

    /// The precision this value was produced at.
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Rebind to another precision, rounding to nearest (ties to even).
    pub fn with_precision(&self, precision: Precision) -> Self {
        round_to_precision(self, precision, RoundingPolicy::NearestTiesEven).0
    }

    /// Replace the precision tag of a value already known to fit.
    #[inline]
    pub(crate) fn retag(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    // ========================================================================
    // Arithmetic (collaborator primitives)
    // ========================================================================

    /// `self + rhs` at `precision`.
    #[inline]
    pub fn add(&self, rhs: &Self, precision: Precision) -> Self {
        Self::wrap(self.inner.add(&rhs.inner, precision.bits(), BASIC_RM), precision)
    }

    /// `self - rhs` at `precision`.
    #[inline]
    pub fn sub(&self, rhs: &Self, precision: Precision) -> Self {
        Self::wrap(self.inner.sub(&rhs.inner, precision.bits(), BASIC_RM), precision)
    }

    /// `self * rhs` at `precision`.
    #[inline]
    pub fn mul(&self, rhs: &Self, precision: Precision) -> Self {
        Self::wrap(self.inner.mul(&rhs.inner, precision.bits(), BASIC_RM), precision)
    }

    /// `self / rhs` at `precision`.
    #[inline]
    pub fn div(&self, rhs: &Self, precision: Precision) -> Self {
        Self::wrap(self.inner.div(&rhs.inner, precision.bits(), BASIC_RM), precision)
    }

    /// `self * n` at `precision`.
    #[inline]
    pub fn mul_u64(&self, n: u64, precision: Precision) -> Self {
        self.mul(&Self::from_u64(n, Precision::EXTENDED), precision)
    }

    /// `self / n` at `precision`.
    #[inline]
    pub fn div_u64(&self, n: u64, precision: Precision) -> Self {
        self.div(&Self::from_u64(n, Precision::EXTENDED), precision)
    }

    /// `self * 2^k`, exact unless the exponent range is exceeded.
    pub fn mul_pow2(&self, k: i64) -> Self {
        match self.raw_mantissa() {
            Some(raw) => Self::from_raw(
                raw.words,
                raw.negative,
                raw.exponent.saturating_add(k),
                raw.inexact,
                self.precision,
            ),
            None => self.clone(),
        }
    }

    /// Negation.
    #[inline]
    pub fn neg(&self) -> Self {
        Self::wrap(BigFloat::neg(&self.inner), self.precision)
    }

    /// Absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Self::wrap(self.inner.abs(), self.precision)
    }

    // ========================================================================
    // Classification
    // ========================================================================

    /// Check if value is NaN.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.inner.is_nan()
    }

    /// Check if value is positive or negative infinity.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.inner.is_inf()
    }

    /// Check if value is neither NaN nor infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        !self.is_nan() && !self.is_infinite()
    }

    /// Check if value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.is_nan() && self.inner.is_zero()
    }

    /// Check if value is strictly below zero (including negative infinity).
    pub fn is_negative(&self) -> bool {
        if self.is_nan() || self.is_zero() {
            return false;
        }
        if self.is_infinite() {
            return self.inner.is_inf_neg();
        }
        self.inner.is_negative()
    }

    /// Check if value is strictly above zero (including positive infinity).
    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.is_nan() && !self.is_zero() && !self.is_negative()
    }

    /// Sign as -1, 0 or +1. NaN reports 0.
    pub fn signum(&self) -> i32 {
        if self.is_negative() {
            -1
        } else if self.is_positive() {
            1
        } else {
            0
        }
    }

    // ========================================================================
    // Mantissa / exponent decomposition
    // ========================================================================

    /// Binary exponent `e` such that `2^(e-1) <= |self| < 2^e`.
    ///
    /// `None` for zero, NaN and infinities.
    pub fn exponent(&self) -> Option<i64> {
        self.raw_mantissa().map(|raw| raw.exponent)
    }

    /// Split into `(mantissa, exponent)` with `0.5 <= |mantissa| < 1` and
    /// `self = mantissa * 2^exponent`.
    pub fn frexp(&self) -> Option<(Self, i64)> {
        let exponent = self.exponent()?;
        Some((self.mul_pow2(-exponent), exponent))
    }

    /// Rebuild `mantissa * 2^exponent`.
    #[inline]
    pub fn ldexp(mantissa: &Self, exponent: i64) -> Self {
        mantissa.mul_pow2(exponent)
    }

    /// Nearest double, ties to even. Results in the subnormal range are
    /// rounded a second time by the final scaling.
    ///
    /// Used only to seed iterations and pick reductions.
    pub fn to_f64(&self) -> f64 {
        if self.is_nan() {
            return f64::NAN;
        }
        if self.is_infinite() {
            return if self.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }

        let (rounded, _) = round_to_precision(self, Precision::DOUBLE, RoundingPolicy::NearestTiesEven);
        if rounded.is_infinite() {
            return if self.is_negative() {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }
        match rounded.raw_mantissa() {
            None => 0.0,
            Some(raw) => {
                // at most 53 significant bits, so every partial sum is exact
                let mut fraction = 0.0;
                let mut scale = 1.0;
                for &word in raw.words.iter().rev() {
                    scale /= 2f64.powi(WORD_BIT_SIZE as i32);
                    fraction += word as f64 * scale;
                }
                let magnitude = scale_by_pow2(fraction, raw.exponent);
                if raw.negative {
                    -magnitude
                } else {
                    magnitude
                }
            },
        }
    }

    /// The value as an `i64` when it is an integer of magnitude below `2^63`.
    pub fn to_i64_exact(&self) -> Option<i64> {
        if self.is_zero() {
            return Some(0);
        }
        let raw = self.raw_mantissa()?;
        if !(1..=63).contains(&raw.exponent) {
            return None;
        }

        // the leading `exponent` mantissa bits are the integer part
        let mut remaining = raw.exponent as usize;
        let mut magnitude: u64 = 0;
        for &word in raw.words.iter().rev() {
            let word = word as u64;
            if remaining == 0 {
                if word != 0 {
                    return None;
                }
                continue;
            }
            let take = remaining.min(WORD_BIT_SIZE);
            let dropped = WORD_BIT_SIZE - take;
            if dropped > 0 && word & ((1u64 << dropped) - 1) != 0 {
                return None;
            }
            magnitude = (magnitude << take) | (word >> dropped);
            remaining -= take;
        }
        magnitude <<= remaining;

        let value = magnitude as i64;
        Some(if raw.negative { -value } else { value })
    }

    pub(crate) fn raw_mantissa(&self) -> Option<RawMantissa<'_>> {
        if !self.is_finite() || self.is_zero() {
            return None;
        }
        self.inner
            .as_raw_parts()
            .map(|(words, _bits, sign, exponent, inexact)| RawMantissa {
                words,
                negative: matches!(sign, Sign::Neg),
                exponent: i64::from(exponent),
                inexact,
            })
    }

    /// Rebuild from a normalized mantissa. Out-of-range exponents overflow to
    /// infinity or underflow to zero.
    pub(crate) fn from_raw(
        words: &[Word],
        negative: bool,
        exponent: i64,
        inexact: bool,
        precision: Precision,
    ) -> Self {
        if exponent > i64::from(EXPONENT_MAX) {
            return Self::infinity(negative, precision);
        }
        if exponent <= i64::from(EXPONENT_MIN) {
            return Self::zero(precision);
        }

        let sign = if negative { Sign::Neg } else { Sign::Pos };
        let inner = BigFloat::from_raw_parts(
            words,
            words.len() * WORD_BIT_SIZE,
            sign,
            exponent as Exponent,
            inexact,
        );
        Self::wrap(inner, precision)
    }

    /// `±2^(exponent - 1)`, i.e. the value whose mantissa is exactly one half.
    pub(crate) fn half_power(negative: bool, exponent: i64, precision: Precision) -> Self {
        let top: Word = 1 << (WORD_BIT_SIZE - 1);
        Self::from_raw(&[top], negative, exponent, false, precision)
    }
}

/// `value * 2^e` in double arithmetic without intermediate overflow.
fn scale_by_pow2(mut value: f64, exponent: i64) -> f64 {
    let mut e = exponent.clamp(-1200, 1200);
    while e > 0 {
        let step = e.min(1000);
        value *= 2f64.powi(step as i32);
        e -= step;
    }
    while e < 0 {
        let step = (-e).min(1000);
        value /= 2f64.powi(step as i32);
        e += step;
    }
    value
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.partial_cmp(other), Some(Ordering::Equal))
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        self.inner.cmp(&other.inner).map(|c| c.cmp(&0))
    }
}

impl Neg for &Float {
    type Output = Float;

    fn neg(self) -> Self::Output {
        Float::neg(self)
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(bits: usize) -> Precision {
        Precision::new(bits).unwrap()
    }

    #[test]
    fn test_integer_construction() {
        let x = Float::from_i64(-12345, p(64));
        assert_eq!(x.to_f64(), -12345.0);
        assert!(x.is_negative());
        assert_eq!(x.signum(), -1);

        let big = Float::from_u64(u64::MAX, p(64));
        assert_eq!(big.exponent(), Some(64));
    }

    #[test]
    fn test_from_u64_rounds_to_precision() {
        // 2^64 - 1 needs 64 bits; at 8 bits it rounds up to 2^64
        let x = Float::from_u64(u64::MAX, p(8));
        assert_eq!(x.exponent(), Some(65));
        assert_eq!(x.precision().bits(), 8);
    }

    #[test]
    fn test_from_f64_roundtrip() {
        let x = Float::from_f64(0.1, Precision::DOUBLE);
        assert_eq!(x.to_f64(), 0.1);
        assert!(Float::from_f64(f64::NAN, Precision::DOUBLE).is_nan());
        assert!(Float::from_f64(f64::NEG_INFINITY, Precision::DOUBLE).is_negative());
    }

    #[test]
    fn test_frexp_ldexp() {
        let x = Float::from_i64(12, p(64));
        let (m, e) = x.frexp().unwrap();
        assert_eq!(e, 4);
        assert_eq!(m.to_f64(), 0.75);
        assert_eq!(Float::ldexp(&m, e), x);
        assert!(Float::zero(p(64)).frexp().is_none());
    }

    #[test]
    fn test_basic_arithmetic() {
        let a = Float::from_i64(7, p(64));
        let b = Float::from_i64(2, p(64));
        assert_eq!(a.add(&b, p(64)).to_f64(), 9.0);
        assert_eq!(a.sub(&b, p(64)).to_f64(), 5.0);
        assert_eq!(a.mul(&b, p(64)).to_f64(), 14.0);
        assert_eq!(a.div(&b, p(64)).to_f64(), 3.5);
        assert_eq!(a.mul_pow2(-3).to_f64(), 0.875);
    }

    #[test]
    fn test_comparison_and_nan() {
        let a = Float::from_i64(1, p(64));
        let b = Float::from_i64(2, p(64));
        let nan = Float::nan(p(64));
        assert!(a < b);
        assert!(b > a);
        assert_eq!(a.partial_cmp(&nan), None);
        assert!(nan != nan);
        assert_eq!(nan.signum(), 0);
    }

    #[test]
    fn test_parse() {
        let x = Float::parse("1.5", p(64)).unwrap();
        assert_eq!(x.to_f64(), 1.5);
        assert_eq!(Float::parse("abc", p(64)).unwrap_err(), NumericError::InvalidInput);
        assert_eq!(Float::parse("   ", p(64)).unwrap_err(), NumericError::InvalidInput);
    }

    #[test]
    fn test_from_decimal() {
        let d = rust_decimal::Decimal::new(-12345, 2); // -123.45
        let x = Float::from_decimal(d, Precision::DOUBLE);
        assert_eq!(x.to_f64(), -123.45);
    }

    #[test]
    fn test_to_f64_rounds_on_lower_bits() {
        // 1 + 2^-53 + 2^-100 lies just above the midpoint of two doubles
        let wp = p(128);
        let one = Float::one(wp);
        let x = one
            .add(&one.mul_pow2(-53), wp)
            .add(&one.mul_pow2(-100), wp);
        assert_eq!(x.to_f64(), 1.0 + f64::EPSILON);
        assert_eq!(x.neg().to_f64(), -(1.0 + f64::EPSILON));
    }

    #[test]
    fn test_parse_rounds_once_at_target_precision() {
        for text in ["0.1", "-2.675", "6.02214076e23", "123456789.987654321"] {
            let x = Float::parse(text, Precision::DOUBLE).unwrap();
            assert_eq!(x.precision(), Precision::DOUBLE);
            assert_eq!(x.to_f64(), text.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_neg_borrows() {
        let x = Float::from_i64(5, p(64));
        let y = x.neg();
        assert_eq!(y.to_f64(), -5.0);
        assert_eq!(-&y, x);
    }

    #[test]
    fn test_to_i64_exact() {
        let wp = p(128);
        assert_eq!(Float::from_i64(-42, wp).to_i64_exact(), Some(-42));
        assert_eq!(Float::zero(wp).to_i64_exact(), Some(0));
        assert_eq!(Float::from_f64(2.5, wp).to_i64_exact(), None);
        // 2^55 + 1 is beyond the reach of a double
        let big = Float::one(wp).mul_pow2(55).add(&Float::one(wp), wp);
        assert_eq!(big.to_i64_exact(), Some((1i64 << 55) + 1));
        assert_eq!(Float::one(wp).mul_pow2(63).to_i64_exact(), None);
    }

    #[test]
    fn test_to_f64_extremes() {
        let tiny = Float::one(p(64)).mul_pow2(-5000);
        assert_eq!(tiny.to_f64(), 0.0);
        let huge = Float::one(p(64)).mul_pow2(5000);
        assert_eq!(huge.to_f64(), f64::INFINITY);
    }
}
