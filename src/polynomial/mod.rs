// ============================================================================
// Polynomial Module
// Clenshaw evaluation of Chebyshev series and interpolation segments
// ============================================================================

pub(crate) mod clenshaw;
mod segment;

pub use segment::ChebyshevSegment;
