// ============================================================================
// Numeric Errors
// Error types for value construction and kernel configuration
// ============================================================================

use std::fmt;

/// Errors raised while constructing values or configuring kernels.
///
/// Mathematical domain errors are not represented here: they produce a NaN
/// result instead of an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Precision of zero bits, or above the supported maximum
    InvalidPrecision,
    /// Input string or value is invalid
    InvalidInput,
    /// Kernel configuration failed validation
    InvalidConfig(&'static str),
    /// Chebyshev segment has an invalid span or no components
    InvalidSegment(&'static str),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::InvalidPrecision => {
                write!(f, "invalid precision: must be between 1 and the supported maximum of bits")
            },
            NumericError::InvalidInput => write!(f, "invalid input: could not parse value"),
            NumericError::InvalidConfig(reason) => write!(f, "invalid kernel configuration: {}", reason),
            NumericError::InvalidSegment(reason) => write!(f, "invalid chebyshev segment: {}", reason),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
