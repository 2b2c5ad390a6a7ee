// ============================================================================
// Rounding Module
// Target-precision rounding, integral rounding and error-bound tracking
// ============================================================================

pub mod error_bound;
pub mod integral;
pub mod policy;
mod round;

pub use error_bound::{ulp, ErrorBound};
pub use integral::{ceil, floor, frac, is_integer, is_odd_integer, modulo, rem, round, round_even, trunc};
pub use policy::{RoundingPolicy, Ternary};
pub use round::round_to_precision;
