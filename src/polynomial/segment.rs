// ============================================================================
// Chebyshev Segment
// Ephemeris-style interpolation record over [start, start + span]
// ============================================================================

use crate::numeric::{Float, NumericError, NumericResult, Precision};

/// Chebyshev coefficients for several components (e.g. x, y, z) valid over
/// one time interval.
///
/// Evaluation maps a time to `t = 2 (time - start) / span - 1` in `[-1, 1]`.
/// Times outside the interval extrapolate.
#[derive(Debug, Clone)]
pub struct ChebyshevSegment {
    start: Float,
    span: Float,
    components: Vec<Vec<Float>>,
}

impl ChebyshevSegment {
    /// Create a segment, validating the interval and the component list.
    pub fn new(start: Float, span: Float, components: Vec<Vec<Float>>) -> NumericResult<Self> {
        if !start.is_finite() {
            return Err(NumericError::InvalidSegment("start must be finite"));
        }
        if !span.is_finite() || !span.is_positive() {
            return Err(NumericError::InvalidSegment("span must be finite and positive"));
        }
        if components.is_empty() {
            return Err(NumericError::InvalidSegment("at least one component is required"));
        }
        Ok(Self {
            start,
            span,
            components,
        })
    }

    /// Start of the interval.
    #[inline]
    pub fn start(&self) -> &Float {
        &self.start
    }

    /// Length of the interval.
    #[inline]
    pub fn span(&self) -> &Float {
        &self.span
    }

    /// Number of components.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    /// Borrowed coefficient slices, one per component.
    pub fn components(&self) -> Vec<&[Float]> {
        self.components.iter().map(Vec::as_slice).collect()
    }

    /// Check if `time` lies inside `[start, start + span]`.
    pub fn contains(&self, time: &Float) -> bool {
        let wp = self.start.precision().max(self.span.precision()).max(time.precision());
        let end = self.start.add(&self.span, wp.widened(2));
        *time >= self.start && *time <= end
    }

    /// Chebyshev argument for `time` at precision `wp`.
    pub fn normalize(&self, time: &Float, wp: Precision) -> Float {
        time.sub(&self.start, wp)
            .mul_pow2(1)
            .div(&self.span, wp)
            .sub(&Float::one(wp), wp)
    }

    /// `dt/dtime = 2 / span`, the factor turning a `t` derivative into a rate.
    pub fn velocity_scale(&self, wp: Precision) -> Float {
        Float::from_i64(2, wp).div(&self.span, wp)
    }
}
