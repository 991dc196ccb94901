//! Remote query engine abstraction.
//!
//! Provides a trait-based interface to the engine that actually executes
//! SQL, allowing different backends to be used interchangeably. The crate
//! itself ships only mock engines; real backends live with the embedding
//! application.

mod mock;
mod types;

pub use mock::{FailingQueryEngine, MockQueryEngine};
pub use types::{
    iso_8601, FieldInfo, RawQueryResult, RawValue, Record, Row, RowData, StatementHandle,
};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface to the remote query engine.
///
/// All operations are async and return Results with DispatchError.
#[async_trait]
pub trait RemoteQueryEngine: Send + Sync {
    /// Executes a query and returns the raw engine result.
    async fn execute_query(&self, query: &str) -> Result<RawQueryResult>;

    /// Derives the default "select top N rows" query text for a table.
    async fn get_query_select_top(&self, table: &str) -> Result<String>;
}
