// ============================================================================
// Precision
// Mantissa bit-width of a value or of a requested result
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::value::Float;
use std::fmt;
use std::num::NonZeroUsize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of mantissa bits, always at least one.
///
/// Public entry points take `Option<Precision>`: `None` means "use the
/// precision of the first operand" and is resolved with [`Precision::resolve`]
/// before any kernel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Precision(NonZeroUsize);

const fn nonzero(bits: usize) -> NonZeroUsize {
    match NonZeroUsize::new(bits) {
        Some(n) => n,
        None => panic!("precision constant must be non-zero"),
    }
}

impl Precision {
    /// Largest precision accepted by [`Precision::new`].
    pub const MAX_BITS: usize = 1 << 26;

    /// IEEE-754 binary64 mantissa width.
    pub const DOUBLE: Self = Self(nonzero(53));

    /// x87 extended mantissa width.
    pub const EXTENDED: Self = Self(nonzero(64));

    /// IEEE-754 binary128 mantissa width.
    pub const QUAD: Self = Self(nonzero(113));

    /// Create a precision of `bits` mantissa bits.
    ///
    /// # Errors
    /// Returns `InvalidPrecision` for zero or for more than [`Self::MAX_BITS`].
    pub fn new(bits: usize) -> NumericResult<Self> {
        if bits > Self::MAX_BITS {
            return Err(NumericError::InvalidPrecision);
        }
        NonZeroUsize::new(bits)
            .map(Self)
            .ok_or(NumericError::InvalidPrecision)
    }

    /// Internal constructor for computed working precisions.
    #[inline]
    pub(crate) fn saturating(bits: usize) -> Self {
        Self(NonZeroUsize::new(bits.max(1)).unwrap_or(NonZeroUsize::MIN))
    }

    /// Mantissa width in bits.
    #[inline]
    pub const fn bits(self) -> usize {
        self.0.get()
    }

    /// This precision widened by `extra` guard bits.
    #[inline]
    pub fn widened(self, extra: usize) -> Self {
        Self::saturating(self.bits().saturating_add(extra))
    }

    /// The larger of two precisions.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Number of significant decimal digits carried by this precision.
    pub fn decimal_digits(self) -> usize {
        (self.bits() as f64 * std::f64::consts::LOG10_2).ceil() as usize
    }

    /// Resolve an optional requested precision against the first operand.
    #[inline]
    pub fn resolve(requested: Option<Self>, first: &Float) -> Self {
        requested.unwrap_or_else(|| first.precision())
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DOUBLE
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}

impl TryFrom<usize> for Precision {
    type Error = NumericError;

    fn try_from(bits: usize) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}
