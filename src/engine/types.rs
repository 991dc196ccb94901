//! Raw engine result types.
//!
//! Defines the structures a remote query engine hands back. Raw results may
//! still hold a live handle into the engine; sanitization strips it before
//! anything reaches session state.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// A row of raw engine data.
pub type Row = Record<RawValue>;

/// An ordered mapping from column name to cell value.
///
/// Column order is significant: it drives the CSV header order and the key
/// order of JSON output.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    entries: Vec<(String, V)>,
}

impl<V> Record<V> {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a column, replacing the existing value for the same name.
    pub fn insert(&mut self, column: impl Into<String>, value: V) {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Returns the value for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maps every value through `f`, keeping column names and order.
    pub fn map_values<W>(&self, mut f: impl FnMut(&V) -> W) -> Record<W> {
        Record {
            entries: self
                .entries
                .iter()
                .map(|(name, value)| (name.clone(), f(value)))
                .collect(),
        }
    }
}

impl<V> Default for Record<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for Record<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

impl<V, const N: usize> From<[(&str, V); N]> for Record<V> {
    fn from(entries: [(&str, V); N]) -> Self {
        entries
            .into_iter()
            .map(|(column, value)| (column.to_string(), value))
            .collect()
    }
}

impl<V: Serialize> Serialize for Record<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// One element of a result's row sequence.
///
/// Engines return either the rows of a single result set or, for
/// multi-statement queries, a sequence of result sets where each element is
/// itself a sequence of rows. Both shapes flow through the same `rows`
/// field.
#[derive(Debug, Clone, PartialEq)]
pub enum RowData<V> {
    /// A row of the current result set.
    Row(Record<V>),
    /// A nested result set.
    Set(Vec<RowData<V>>),
}

impl<V: Serialize> Serialize for RowData<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Row(record) => record.serialize(serializer),
            Self::Set(rows) => rows.serialize(serializer),
        }
    }
}

/// Represents a single raw cell value from the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// NULL value.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    Text(String),

    /// Temporal value. Serializes and canonicalizes to ISO-8601 text.
    Timestamp(DateTime<Utc>),

    /// Nested object or array value (json/jsonb columns, composite rows).
    Structured(JsonValue),
}

impl RawValue {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl Serialize for RawValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => serializer.serialize_str(&iso_8601(ts)),
            Self::Structured(value) => value.serialize(serializer),
        }
    }
}

// Conversion implementations for common types
impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v as i64)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(v: DateTime<Utc>) -> Self {
        RawValue::Timestamp(v)
    }
}

impl From<JsonValue> for RawValue {
    fn from(v: JsonValue) -> Self {
        RawValue::Structured(v)
    }
}

impl<T> From<Option<T>> for RawValue
where
    T: Into<RawValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => RawValue::Null,
        }
    }
}

/// The ISO-8601 text form of a timestamp cell: millisecond precision, UTC,
/// `Z` suffix (for example `2024-01-15T10:30:00.000Z`).
pub fn iso_8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    /// Column name.
    pub name: String,

    /// Column data type.
    pub data_type: String,
}

impl FieldInfo {
    /// Creates a new field info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Live handle to the engine-side statement behind a raw result.
///
/// Carries the cancellation token for the server-side cursor. Sanitization
/// drops it: a handle must never be retained in session state.
#[derive(Debug, Clone)]
pub struct StatementHandle {
    id: u64,
    cancel: CancellationToken,
}

impl StatementHandle {
    /// Allocates a handle with a fresh statement id.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            cancel: CancellationToken::new(),
        }
    }

    /// Engine-side statement id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token tied to the engine-side cursor.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Default for StatementHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the raw result of executing a query, as returned by the
/// remote engine. Not serializable on purpose: the handle has no value
/// form, and raw results are discarded right after sanitization.
#[derive(Debug, Clone)]
pub struct RawQueryResult {
    /// Column metadata for the result set.
    pub fields: Vec<FieldInfo>,

    /// Number of rows returned.
    pub row_count: usize,

    /// Rows affected by a mutating statement, when the engine reports it.
    pub affected_rows: Option<u64>,

    /// Row payload: rows of a single result set, or nested result sets.
    pub rows: Vec<RowData<RawValue>>,

    /// Live backend handle. Dropped during sanitization.
    pub handle: Option<StatementHandle>,
}
