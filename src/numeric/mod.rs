// ============================================================================
// Numeric Module
// Arbitrary-precision values and the precision they are computed at
// ============================================================================
//
// This module provides:
// - Float: binary floating-point value over astro-float's BigFloat
// - Precision: validated mantissa width in bits
// - NumericError: Error types for construction and configuration
//
// Design principles:
// - Every result is a fresh value at an explicitly stated precision
// - Domain errors are NaN values, never panics or Err
// - Fallible construction returns Result

mod errors;
mod precision;
mod value;

pub use errors::{NumericError, NumericResult};
pub use precision::Precision;
pub use value::Float;
