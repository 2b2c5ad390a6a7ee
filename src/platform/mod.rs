// ============================================================================
// Platform Module
// Capability registry consumed by the dispatch table
//
// Usage:
// ```ignore
// use arbmath::platform::{capabilities, Capabilities, CpuFeature};
//
// if capabilities().has(CpuFeature::WideVectors) { /* ... */ }
// ```
// ============================================================================

mod detector;

pub use detector::{capabilities, Architecture, Capabilities, CpuFeature, SimdLevel};
