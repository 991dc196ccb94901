//! Query execution coordination.
//!
//! Decides whether a user-issued query needs a fresh execution given the
//! current session state, and drives the request/success/failure lifecycle
//! when it does. The coordinator never mutates session state: it reads a
//! snapshot for the dedup decision and publishes notifications for the
//! state container to fold.

use std::sync::Arc;

use tracing::debug;

use crate::engine::RemoteQueryEngine;
use crate::error::Result;
use crate::notification::{NotificationSender, QueryNotification};
use crate::sanitize::{sanitize_result, SanitizedResult};
use crate::session::SessionExecutionState;

/// Decides whether `query` needs a fresh execution.
///
/// With no session state yet, always execute. While an execution is in
/// flight, never start another. A query that differs from the last history
/// entry executes; re-issuing the last query executes only after the state
/// was invalidated.
pub fn should_execute(query: &str, state: Option<&SessionExecutionState>) -> bool {
    let Some(state) = state else {
        return true;
    };
    if state.is_executing {
        return false;
    }
    match state.query_history.last() {
        Some(previous) if previous == query => state.did_invalidate,
        _ => true,
    }
}

/// Coordinates query executions against the remote engine.
///
/// Holds no state of its own beyond the engine and the notification
/// channel; overlapping invocations interleave freely at await points and
/// each completes its own lifecycle. There is no cancellation: once a
/// REQUEST is out, its SUCCESS or FAILURE will eventually follow even if a
/// newer request was issued meanwhile, and the state container's fold
/// order decides what stays visible.
pub struct QueryCoordinator {
    engine: Arc<dyn RemoteQueryEngine>,
    notifications: NotificationSender,
}

impl QueryCoordinator {
    /// Creates a coordinator publishing to the given notification channel.
    pub fn new(engine: Arc<dyn RemoteQueryEngine>, notifications: NotificationSender) -> Self {
        Self {
            engine,
            notifications,
        }
    }

    /// Executes `query` unless the dedup predicate says the last result
    /// still stands. Returns whether an execution ran. A skipped request
    /// emits no notification.
    pub async fn execute_if_needed(
        &self,
        query: &str,
        state: Option<&SessionExecutionState>,
    ) -> bool {
        if !should_execute(query, state) {
            debug!(query, "skipping execution, previous result still stands");
            return false;
        }
        self.execute(query, false).await;
        true
    }

    /// Resolves the default "select top N rows of `table`" query text from
    /// the engine, then applies the same dedup-and-execute protocol with
    /// the request tagged as a default select.
    ///
    /// A failure to resolve the query text surfaces here as an error: the
    /// lifecycle has not started and no notification is emitted for it.
    pub async fn execute_default_select_if_needed(
        &self,
        table: &str,
        state: Option<&SessionExecutionState>,
    ) -> Result<bool> {
        let query = self.engine.get_query_select_top(table).await?;
        if !should_execute(&query, state) {
            debug!(query, "skipping default select, previous result still stands");
            return Ok(false);
        }
        self.execute(&query, true).await;
        Ok(true)
    }

    /// Publishes the pure query-text update notification.
    pub fn update_query(&self, query: &str) {
        self.emit(QueryNotification::UpdateQuery {
            query: query.to_string(),
        });
    }

    /// Runs the full lifecycle for one execution: REQUEST, the engine
    /// call, sanitization, then exactly one of SUCCESS or FAILURE.
    async fn execute(&self, query: &str, is_default_select: bool) {
        self.emit(QueryNotification::ExecuteQueryRequest {
            query: query.to_string(),
            is_default_select,
        });

        match self.run(query).await {
            Ok(result) => self.emit(QueryNotification::ExecuteQuerySuccess {
                query: query.to_string(),
                result,
            }),
            Err(error) => self.emit(QueryNotification::ExecuteQueryFailure {
                query: query.to_string(),
                error,
            }),
        }
    }

    async fn run(&self, query: &str) -> Result<SanitizedResult> {
        let raw = self.engine.execute_query(query).await?;
        sanitize_result(raw)
    }

    fn emit(&self, notification: QueryNotification) {
        // The UI side owns the receiver; if it is gone there is nobody
        // left to notify.
        let _ = self.notifications.send(notification);
    }
}
