//! Session execution state.
//!
//! The UI state container owns this state and is its sole mutator. The
//! coordinator only reads a snapshot of it when deciding whether a query
//! needs to run, and publishes notifications for the container to fold.

use serde::{Deserialize, Serialize};

use crate::notification::QueryNotification;

/// Execution state of one query session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionExecutionState {
    /// True while an execution is in flight.
    pub is_executing: bool,

    /// True when the last result no longer reflects its query, for
    /// example after the query text was edited.
    pub did_invalidate: bool,

    /// Every query handed to the engine, oldest first. Append-only; the
    /// last entry is the query currently executing or last executed.
    pub query_history: Vec<String>,
}

impl SessionExecutionState {
    /// Creates a fresh session with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one notification into the state.
    ///
    /// This is the reference fold for state containers (and for tests
    /// standing in for one). The coordinator never calls it: mutation
    /// stays with the container, one notification at a time.
    pub fn apply(&mut self, notification: &QueryNotification) {
        match notification {
            QueryNotification::ExecuteQueryRequest { query, .. } => {
                self.is_executing = true;
                self.query_history.push(query.clone());
            }
            QueryNotification::ExecuteQuerySuccess { .. } => {
                self.is_executing = false;
                self.did_invalidate = false;
            }
            QueryNotification::ExecuteQueryFailure { .. } => {
                self.is_executing = false;
            }
            QueryNotification::UpdateQuery { .. } => {
                self.did_invalidate = true;
            }
            // The clipboard lifecycle does not touch execution state.
            QueryNotification::CopyQueryResultToClipboardRequest
            | QueryNotification::CopyQueryResultToClipboardSuccess
            | QueryNotification::CopyQueryResultToClipboardFailure { .. } => {}
        }
    }
}
