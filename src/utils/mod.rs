// ============================================================================
// Utilities Module
// Optional logging bootstrap
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::init_logging;
