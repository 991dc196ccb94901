//! Integration tests for db-dispatch.

pub mod export_test;
pub mod sanitize_test;

use db_dispatch::notification::{NotificationReceiver, QueryNotification};
use db_dispatch::session::SessionExecutionState;

/// Initializes test logging once; later calls are no-ops.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Drains every queued notification, folding each into `state` the way
/// the UI state container would, and returns them in arrival order.
pub fn fold_pending(
    rx: &mut NotificationReceiver,
    state: &mut SessionExecutionState,
) -> Vec<QueryNotification> {
    let mut seen = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        state.apply(&notification);
        seen.push(notification);
    }
    seen
}
