// ============================================================================
// Rounding Policies
// Directed and nearest rounding modes plus the ternary inexactness indicator
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a value is brought down to a target precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingPolicy {
    /// Round to nearest, ties to even mantissa
    #[default]
    NearestTiesEven,
    /// Round to nearest, ties away from zero
    NearestTiesAway,
    /// Truncate toward zero
    TowardZero,
    /// Round toward positive infinity
    TowardPositive,
    /// Round toward negative infinity
    TowardNegative,
    /// Round away from zero
    AwayFromZero,
}

impl RoundingPolicy {
    /// All policies, in declaration order.
    pub const ALL: [RoundingPolicy; 6] = [
        RoundingPolicy::NearestTiesEven,
        RoundingPolicy::NearestTiesAway,
        RoundingPolicy::TowardZero,
        RoundingPolicy::TowardPositive,
        RoundingPolicy::TowardNegative,
        RoundingPolicy::AwayFromZero,
    ];

    /// Whether the policy rounds to nearest.
    #[inline]
    pub const fn is_nearest(self) -> bool {
        matches!(
            self,
            RoundingPolicy::NearestTiesEven | RoundingPolicy::NearestTiesAway
        )
    }

    /// Worst-case rounding error of one operation, in ULPs.
    #[inline]
    pub const fn max_error_ulps(self) -> f64 {
        if self.is_nearest() {
            0.5
        } else {
            1.0
        }
    }

    /// Decide whether the kept magnitude must be incremented by one unit.
    ///
    /// `round_bit` is the first discarded bit, `sticky` is set when any bit
    /// after it is set, and `lsb` is the last kept bit.
    #[inline]
    pub(crate) fn increments(self, negative: bool, round_bit: bool, sticky: bool, lsb: bool) -> bool {
        let inexact = round_bit || sticky;
        match self {
            RoundingPolicy::NearestTiesEven => round_bit && (sticky || lsb),
            RoundingPolicy::NearestTiesAway => round_bit,
            RoundingPolicy::TowardZero => false,
            RoundingPolicy::TowardPositive => inexact && !negative,
            RoundingPolicy::TowardNegative => inexact && negative,
            RoundingPolicy::AwayFromZero => inexact,
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingPolicy::NearestTiesEven => "nearest (ties to even)",
            RoundingPolicy::NearestTiesAway => "nearest (ties away)",
            RoundingPolicy::TowardZero => "toward zero",
            RoundingPolicy::TowardPositive => "toward +inf",
            RoundingPolicy::TowardNegative => "toward -inf",
            RoundingPolicy::AwayFromZero => "away from zero",
        };
        f.write_str(name)
    }
}

/// Direction of the rounding error: the sign of `rounded - exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(i8)]
pub enum Ternary {
    /// The rounded value is below the exact value
    RoundedDown = -1,
    /// No rounding took place
    Exact = 0,
    /// The rounded value is above the exact value
    RoundedUp = 1,
}

impl Ternary {
    /// Numeric form: -1, 0 or +1.
    #[inline]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Check if the result was exact.
    #[inline]
    pub const fn is_exact(self) -> bool {
        matches!(self, Ternary::Exact)
    }

    /// Indicator for the negated result.
    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Ternary::RoundedDown => Ternary::RoundedUp,
            Ternary::Exact => Ternary::Exact,
            Ternary::RoundedUp => Ternary::RoundedDown,
        }
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        assert_eq!(RoundingPolicy::default(), RoundingPolicy::NearestTiesEven);
    }

    #[test]
    fn test_tie_handling() {
        // exactly half way, even lsb
        assert!(!RoundingPolicy::NearestTiesEven.increments(false, true, false, false));
        // exactly half way, odd lsb
        assert!(RoundingPolicy::NearestTiesEven.increments(false, true, false, true));
        assert!(RoundingPolicy::NearestTiesAway.increments(false, true, false, false));
    }

    #[test]
    fn test_directed_policies_depend_on_sign() {
        assert!(RoundingPolicy::TowardPositive.increments(false, false, true, false));
        assert!(!RoundingPolicy::TowardPositive.increments(true, false, true, false));
        assert!(RoundingPolicy::TowardNegative.increments(true, false, true, false));
        assert!(!RoundingPolicy::TowardZero.increments(true, true, true, true));
        assert!(RoundingPolicy::AwayFromZero.increments(true, false, true, false));
    }

    #[test]
    fn test_exact_never_increments() {
        for policy in RoundingPolicy::ALL {
            assert!(!policy.increments(false, false, false, true));
            assert!(!policy.increments(true, false, false, true));
        }
    }

    #[test]
    fn test_ternary_values() {
        assert_eq!(Ternary::RoundedDown.as_i8(), -1);
        assert_eq!(Ternary::Exact.as_i8(), 0);
        assert_eq!(Ternary::RoundedUp.as_i8(), 1);
        assert_eq!(Ternary::RoundedUp.flipped(), Ternary::RoundedDown);
        assert!(Ternary::Exact.is_exact());
    }

    #[test]
    fn test_rounding_error_per_policy() {
        assert_eq!(RoundingPolicy::NearestTiesAway.max_error_ulps(), 0.5);
        assert_eq!(RoundingPolicy::TowardZero.max_error_ulps(), 1.0);
    }
}
