//! Sanitization integration tests.
//!
//! Raw results coming off the engine trait lose their backend handle and
//! every transport-unsafe cell before they reach session state.

use std::sync::Arc;

use db_dispatch::engine::{
    FieldInfo, MockQueryEngine, RawValue, Record, RemoteQueryEngine, RowData,
};
use db_dispatch::error::DispatchError;
use db_dispatch::sanitize::sanitize_result;
use chrono::{TimeZone, Utc};
use serde_json::json;

#[tokio::test]
async fn test_raw_result_carries_a_live_handle_and_sanitized_does_not() {
    let engine: Arc<dyn RemoteQueryEngine> = Arc::new(MockQueryEngine::new());
    let raw = engine.execute_query("SELECT 1").await.unwrap();
    assert!(raw.handle.is_some());

    let sanitized = sanitize_result(raw).unwrap();

    // The sanitized form is plain values all the way down: its JSON form
    // carries the four result keys and nothing else.
    let json = serde_json::to_value(&sanitized).unwrap();
    let mut keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["affectedRows", "fields", "rowCount", "rows"]);
}

#[tokio::test]
async fn test_multi_result_set_payload_sanitizes_recursively() {
    let ts = Utc.with_ymd_and_hms(2023, 3, 9, 18, 0, 0).unwrap();
    let engine = MockQueryEngine::with_result(
        vec![FieldInfo::new("n", "integer")],
        vec![
            RowData::Set(vec![RowData::Row(Record::from([(
                "n",
                RawValue::Timestamp(ts),
            )]))]),
            RowData::Set(vec![RowData::Row(Record::from([(
                "n",
                RawValue::Structured(json!({"deep": true})),
            )]))]),
        ],
    );

    let raw = engine.execute_query("CALL report()").await.unwrap();
    let sanitized = sanitize_result(raw).unwrap();

    let json = serde_json::to_value(&sanitized).unwrap();
    assert_eq!(json["rows"][0][0]["n"], json!("2023-03-09T18:00:00.000Z"));
    assert_eq!(json["rows"][1][0]["n"], json!("{\"deep\":true}"));
}

#[tokio::test]
async fn test_malformed_engine_payload_is_not_swallowed() {
    let engine = MockQueryEngine::with_result(
        vec![FieldInfo::new("a", "integer")],
        vec![
            RowData::Row(Record::from([("a", RawValue::Int(1))])),
            RowData::Row(Record::from([
                ("a", RawValue::Int(2)),
                ("b", RawValue::Int(3)),
            ])),
        ],
    );

    let raw = engine.execute_query("SELECT broken").await.unwrap();
    let err = sanitize_result(raw).unwrap_err();

    assert!(matches!(err, DispatchError::Sanitization(_)));
    assert!(err.to_string().contains("Sanitization error"));
}
