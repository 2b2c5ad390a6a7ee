// ============================================================================
// Dispatch Module
// Capability-based selection of kernel variants
//
// Variants:
// - Reference: portable kernels, every slot
// - Fused: tan, sinh, cosh with sibling series in lockstep (wide vectors)
// - Interleaved: multi-component Chebyshev in one pass (wide vectors)
// ============================================================================

mod global;
mod operation;
mod table;

pub use global::{dispatch_state, global_table, DispatchState};
pub use operation::{Operation, UnaryOp, Variant};
pub use table::{DispatchTable, Slot};
