// ============================================================================
// arbmath Library
// Arbitrary-precision elementary functions with capability-based dispatch
// ============================================================================

//! # arbmath
//!
//! Elementary and transcendental functions over binary floating-point values
//! whose precision is chosen at runtime.
//!
//! ## Features
//!
//! - **Argument reduction + series kernels** for exp, log, trigonometric,
//!   inverse trigonometric and hyperbolic functions
//! - **Newton-Raphson roots** with exact results for perfect powers
//! - **Clenshaw evaluation** of Chebyshev series and ephemeris segments
//! - **Directed rounding** with a ternary inexactness indicator, applied
//!   exactly once per operation
//! - **Capability-based dispatch**: tuned variants chosen at startup,
//!   bit-identical to the portable kernels
//!
//! ## Example
//!
//! ```rust
//! use arbmath::prelude::*;
//!
//! let p = Precision::new(256).unwrap();
//! let one = Float::one(p);
//!
//! // e to 256 bits, inheriting the precision of the argument
//! let e = arbmath::functions::exp(&one, None);
//! assert_eq!(e.precision(), p);
//!
//! // directed rounding reports the direction of the error
//! let two = Float::from_i64(2, Precision::DOUBLE);
//! let (root, ternary) = arbmath::functions::sqrt_rounded(&two, None, RoundingPolicy::TowardZero);
//! assert_eq!(ternary, Ternary::RoundedDown);
//! assert!(root.mul(&root, Precision::QUAD) < two);
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod functions;
pub mod numeric;
pub mod platform;
pub mod polynomial;
pub mod rounding;
pub mod utils;

mod kernels;
mod solvers;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::KernelConfig;
    pub use crate::dispatch::{DispatchState, DispatchTable, Operation, UnaryOp, Variant};
    pub use crate::engine::{MathEngine, MathEngineBuilder};
    pub use crate::numeric::{Float, NumericError, NumericResult, Precision};
    pub use crate::platform::{Architecture, Capabilities, CpuFeature, SimdLevel};
    pub use crate::polynomial::ChebyshevSegment;
    pub use crate::rounding::{ulp, ErrorBound, RoundingPolicy, Ternary};
}
