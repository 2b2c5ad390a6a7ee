// ============================================================================
// Logging Bootstrap
// Formatted tracing output for applications and tests
// ============================================================================

use tracing::Level;

/// Install a formatting subscriber that prints events at `level` and above.
///
/// Returns `false` when a global subscriber is already installed, which
/// leaves the existing one in place.
pub fn init_logging(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init()
        .is_ok()
}
