//! Transport-safe query results.
//!
//! A raw engine result may hold live references into the backend, such as
//! its statement handle. Sanitization rebuilds it as a fully value-owned
//! structure that session state can keep indefinitely: exactly the four
//! result fields, with every cell canonicalized.

use serde::Serialize;

use crate::canonical::{canonicalize_rows, CanonicalValue};
use crate::engine::{FieldInfo, RawQueryResult, RawValue, RowData};
use crate::error::{DispatchError, Result};

/// A query result with no remaining ties to the engine that produced it.
///
/// Safe to retain in session state and to serialize. Its JSON form carries
/// exactly the keys `fields`, `rowCount`, `affectedRows`, `rows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedResult {
    /// Column metadata for the result set.
    pub fields: Vec<FieldInfo>,

    /// Number of rows returned.
    pub row_count: usize,

    /// Rows affected by a mutating statement, when the engine reported it.
    pub affected_rows: Option<u64>,

    /// Canonicalized row payload, same nesting as the raw result.
    pub rows: Vec<RowData<CanonicalValue>>,
}

/// Builds a [`SanitizedResult`] from a raw engine result.
///
/// Consumes the raw result: the statement handle and anything else the
/// engine attached are dropped here and cannot re-enter session state.
/// Fails with [`DispatchError::Sanitization`] when the row payload is
/// malformed; malformed payloads must surface to the caller, never be
/// swallowed.
pub fn sanitize_result(raw: RawQueryResult) -> Result<SanitizedResult> {
    let RawQueryResult {
        fields,
        row_count,
        affected_rows,
        rows,
        handle: _,
    } = raw;

    check_uniform_rows(&rows)?;

    Ok(SanitizedResult {
        fields,
        row_count,
        affected_rows,
        rows: canonicalize_rows(&rows),
    })
}

/// Validates that every row of a result set carries the columns of the
/// set's first row. Nested sets are checked against their own first row.
fn check_uniform_rows(rows: &[RowData<RawValue>]) -> Result<()> {
    let mut layout: Option<Vec<&str>> = None;
    for entry in rows {
        match entry {
            RowData::Set(nested) => check_uniform_rows(nested)?,
            RowData::Row(record) => {
                let columns: Vec<&str> = record.columns().collect();
                match &layout {
                    None => layout = Some(columns),
                    Some(expected) if *expected == columns => {}
                    Some(expected) => {
                        return Err(DispatchError::sanitization(format!(
                            "row columns [{}] do not match result set columns [{}]",
                            columns.join(", "),
                            expected.join(", ")
                        )))
                    }
                }
            }
        }
    }
    Ok(())
}
