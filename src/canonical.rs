//! Canonical cell values.
//!
//! Engine results carry heterogeneous cell values, including temporal and
//! nested-object cells. Before a result enters session state or a CSV
//! export, every cell is reduced to a canonical primitive: null, boolean,
//! number, or text. Canonicalization is deterministic and idempotent on
//! already-canonical values.

use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::engine::{iso_8601, RawValue, Record, RowData};

/// A row whose values have all been canonicalized.
pub type CanonicalRow = Record<CanonicalValue>;

/// A cell value after canonicalization.
///
/// Temporal and structured values have been reduced to text; primitives
/// are untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// NULL value.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer.
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    Text(String),
}

impl CanonicalValue {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, CanonicalValue::Null)
    }
}

impl Serialize for CanonicalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<CanonicalValue> for RawValue {
    fn from(value: CanonicalValue) -> Self {
        match value {
            CanonicalValue::Null => RawValue::Null,
            CanonicalValue::Bool(b) => RawValue::Bool(b),
            CanonicalValue::Int(i) => RawValue::Int(i),
            CanonicalValue::Float(f) => RawValue::Float(f),
            CanonicalValue::Text(s) => RawValue::Text(s),
        }
    }
}

/// Converts one raw cell to canonical form.
///
/// Conversion precedence: nulls pass through first, temporal values become
/// their ISO-8601 text second, remaining structured values become their
/// JSON text third, and primitives pass through unchanged. Zero, the empty
/// string, and `false` are plain primitives here and are never converted.
pub fn canonicalize_value(value: &RawValue) -> CanonicalValue {
    match value {
        RawValue::Null => CanonicalValue::Null,
        // A structured JSON null stays null rather than becoming the
        // four-character text "null".
        RawValue::Structured(JsonValue::Null) => CanonicalValue::Null,
        RawValue::Timestamp(ts) => CanonicalValue::Text(iso_8601(ts)),
        RawValue::Structured(v) => CanonicalValue::Text(v.to_string()),
        RawValue::Bool(b) => CanonicalValue::Bool(*b),
        RawValue::Int(i) => CanonicalValue::Int(*i),
        RawValue::Float(f) => CanonicalValue::Float(*f),
        RawValue::Text(s) => CanonicalValue::Text(s.clone()),
    }
}

/// Canonicalizes every value of a row, preserving column names and order.
pub fn canonicalize_record(record: &Record<RawValue>) -> CanonicalRow {
    record.map_values(canonicalize_value)
}

/// Canonicalizes a row sequence, recursing into nested result sets.
///
/// Callers may pass either the rows of a single result set or a sequence
/// of result sets, each itself a sequence of rows; both shapes come out
/// with the same nesting.
pub fn canonicalize_rows(rows: &[RowData<RawValue>]) -> Vec<RowData<CanonicalValue>> {
    rows.iter()
        .map(|entry| match entry {
            RowData::Row(record) => RowData::Row(canonicalize_record(record)),
            RowData::Set(nested) => RowData::Set(canonicalize_rows(nested)),
        })
        .collect()
}
