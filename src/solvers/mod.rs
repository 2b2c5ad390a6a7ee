// ============================================================================
// Solvers Module
// Newton-Raphson iteration for square, cube and n-th roots
// ============================================================================

pub(crate) mod newton;
