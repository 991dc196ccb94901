//! Mock query engines for testing.
//!
//! Provide in-memory engine implementations so coordinator and export
//! lifecycles can be driven without a real database.

use super::{FieldInfo, RawQueryResult, RawValue, Record, RemoteQueryEngine, RowData, StatementHandle};
use crate::error::{DispatchError, Result};
use async_trait::async_trait;

/// Default row limit for generated "select top" queries.
const DEFAULT_SELECT_LIMIT: usize = 1000;

/// A mock engine that returns predefined results.
pub struct MockQueryEngine {
    canned: Option<(Vec<FieldInfo>, Vec<RowData<RawValue>>)>,
    affected_rows: Option<u64>,
    select_limit: usize,
}

impl MockQueryEngine {
    /// Creates a mock engine that echoes the query text back as its result.
    pub fn new() -> Self {
        Self {
            canned: None,
            affected_rows: None,
            select_limit: DEFAULT_SELECT_LIMIT,
        }
    }

    /// Creates a mock engine returning the given fields and rows for every
    /// query.
    pub fn with_result(fields: Vec<FieldInfo>, rows: Vec<RowData<RawValue>>) -> Self {
        Self {
            canned: Some((fields, rows)),
            ..Self::new()
        }
    }

    /// Sets the affected-row count reported with every result.
    pub fn affected_rows(mut self, affected: u64) -> Self {
        self.affected_rows = Some(affected);
        self
    }

    /// Sets the row limit used for generated "select top" queries.
    pub fn select_limit(mut self, limit: usize) -> Self {
        self.select_limit = limit;
        self
    }
}

impl Default for MockQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteQueryEngine for MockQueryEngine {
    async fn execute_query(&self, query: &str) -> Result<RawQueryResult> {
        let (fields, rows) = match &self.canned {
            Some((fields, rows)) => (fields.clone(), rows.clone()),
            None => (
                vec![FieldInfo::new("result", "text")],
                vec![RowData::Row(Record::from([(
                    "result",
                    RawValue::Text(format!("mock result for: {query}")),
                )]))],
            ),
        };

        Ok(RawQueryResult {
            row_count: rows.len(),
            fields,
            affected_rows: self.affected_rows,
            rows,
            handle: Some(StatementHandle::new()),
        })
    }

    async fn get_query_select_top(&self, table: &str) -> Result<String> {
        Ok(format!("SELECT * FROM {table} LIMIT {}", self.select_limit))
    }
}

/// An engine whose calls always fail; used to exercise failure lifecycles.
pub struct FailingQueryEngine {
    message: String,
}

impl FailingQueryEngine {
    /// Creates a failing engine with a generic connection error message.
    pub fn new() -> Self {
        Self::with_message("connection reset by peer")
    }

    /// Creates a failing engine with the given error message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteQueryEngine for FailingQueryEngine {
    async fn execute_query(&self, _query: &str) -> Result<RawQueryResult> {
        Err(DispatchError::remote_execution(self.message.clone()))
    }

    async fn get_query_select_top(&self, _table: &str) -> Result<String> {
        Err(DispatchError::remote_execution(self.message.clone()))
    }
}
