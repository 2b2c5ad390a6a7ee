// ============================================================================
// Kernels Module
// Argument reduction, series summation and reconstruction per function
// ============================================================================
//
// Every kernel has the shape `fn(&Float, Precision, &KernelConfig) -> Float`
// and returns its result at working precision. Rounding to the requested
// precision happens once, in the engine. Composite kernels call the kernels
// they build on directly, never through the dispatch table.

pub(crate) mod constants;
pub(crate) mod exp;
pub(crate) mod fused;
pub(crate) mod hyperbolic;
pub(crate) mod inverse_trig;
pub(crate) mod log;
pub(crate) mod power;
pub(crate) mod series;
pub(crate) mod trig;

#[cfg(test)]
pub(crate) mod test_support;
