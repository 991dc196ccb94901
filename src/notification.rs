//! Lifecycle notifications.
//!
//! The contract between this core and the UI state container. Every
//! asynchronous operation emits a REQUEST notification followed by exactly
//! one of SUCCESS or FAILURE for the same invocation; [`UpdateQuery`] is a
//! pure state update with no async lifecycle. Notifications travel over an
//! unbounded channel and the container folds them into new state one at a
//! time.
//!
//! [`UpdateQuery`]: QueryNotification::UpdateQuery

use tokio::sync::mpsc;

use crate::error::DispatchError;
use crate::sanitize::SanitizedResult;

/// Sender half of the notification channel, held by the coordinator and
/// the exporter.
pub type NotificationSender = mpsc::UnboundedSender<QueryNotification>;

/// Receiver half of the notification channel, held by the state container.
pub type NotificationReceiver = mpsc::UnboundedReceiver<QueryNotification>;

/// Notifications published to the state container.
#[derive(Debug, Clone)]
pub enum QueryNotification {
    /// A query execution began.
    ExecuteQueryRequest {
        query: String,
        /// True when the query text came from the default-select template
        /// rather than the user, so the UI can render it differently.
        is_default_select: bool,
    },

    /// The execution finished; the sanitized result is ready for state.
    ExecuteQuerySuccess {
        query: String,
        result: SanitizedResult,
    },

    /// The execution, or sanitization of its result, failed.
    ExecuteQueryFailure {
        query: String,
        error: DispatchError,
    },

    /// A clipboard export began.
    CopyQueryResultToClipboardRequest,

    /// The exported text reached the clipboard.
    CopyQueryResultToClipboardSuccess,

    /// The export failed; the clipboard was left unmodified.
    CopyQueryResultToClipboardFailure { error: DispatchError },

    /// The editor's query text changed. Pure state update.
    UpdateQuery { query: String },
}
