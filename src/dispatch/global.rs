// ============================================================================
// Process-Global Dispatch Table
// Uninitialized -> Detecting -> Populated, exactly once per process
// ============================================================================

use super::table::DispatchTable;
use crate::platform::capabilities;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Lifecycle of the global table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DispatchState {
    /// No caller has asked for the table yet
    Uninitialized = 0,
    /// Capabilities are being detected and slots assigned
    Detecting = 1,
    /// Every slot is assigned; the table never changes again
    Populated = 2,
}

impl DispatchState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => DispatchState::Uninitialized,
            1 => DispatchState::Detecting,
            _ => DispatchState::Populated,
        }
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Uninitialized => write!(f, "uninitialized"),
            DispatchState::Detecting => write!(f, "detecting"),
            DispatchState::Populated => write!(f, "populated"),
        }
    }
}

static STATE: AtomicU8 = AtomicU8::new(DispatchState::Uninitialized as u8);
static TABLE: OnceLock<Arc<DispatchTable>> = OnceLock::new();

/// The process-wide table, built from [`capabilities`] on first access.
///
/// Concurrent first callers block until one of them has populated the table;
/// later calls are a single atomic load.
pub fn global_table() -> &'static Arc<DispatchTable> {
    TABLE.get_or_init(|| {
        STATE.store(DispatchState::Detecting as u8, Ordering::Release);
        let caps = *capabilities();
        let table = DispatchTable::build(caps);
        STATE.store(DispatchState::Populated as u8, Ordering::Release);
        info!(capabilities = %caps, "dispatch table populated");
        Arc::new(table)
    })
}

/// Current lifecycle state of the global table.
pub fn dispatch_state() -> DispatchState {
    DispatchState::from_u8(STATE.load(Ordering::Acquire))
}
