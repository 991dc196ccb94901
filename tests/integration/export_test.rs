//! Clipboard export integration tests.
//!
//! Exercises the execute-then-export path: rows come out of a sanitized
//! result and go to the clipboard in both formats.

use std::sync::Arc;

use db_dispatch::canonical::CanonicalValue;
use db_dispatch::clipboard::MemoryClipboard;
use db_dispatch::coordinator::QueryCoordinator;
use db_dispatch::engine::{FieldInfo, MockQueryEngine, RawValue, Record, Row, RowData};
use db_dispatch::export::{ClipboardExporter, ExportFormat};
use db_dispatch::notification::QueryNotification;
use db_dispatch::sanitize::SanitizedResult;
use db_dispatch::session::SessionExecutionState;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc;

use super::fold_pending;

/// Rows of a sanitized single result set, in export form.
fn export_rows(result: &SanitizedResult) -> Vec<Row> {
    result
        .rows
        .iter()
        .filter_map(|entry| match entry {
            RowData::Row(row) => Some(row.map_values(|v| RawValue::from(v.clone()))),
            RowData::Set(_) => None,
        })
        .collect()
}

async fn execute_and_take_result(engine: MockQueryEngine) -> SanitizedResult {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = QueryCoordinator::new(Arc::new(engine), tx);
    assert!(coordinator.execute_if_needed("SELECT * FROM events", None).await);

    let mut state = SessionExecutionState::new();
    let seen = fold_pending(&mut rx, &mut state);
    match seen.into_iter().last().unwrap() {
        QueryNotification::ExecuteQuerySuccess { result, .. } => result,
        other => panic!("expected success, got {other:?}"),
    }
}

fn event_engine() -> MockQueryEngine {
    let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
    MockQueryEngine::with_result(
        vec![
            FieldInfo::new("id", "integer"),
            FieldInfo::new("at", "timestamptz"),
            FieldInfo::new("payload", "jsonb"),
        ],
        vec![
            RowData::Row(Record::from([
                ("id", RawValue::Int(1)),
                ("at", RawValue::Timestamp(ts)),
                ("payload", RawValue::Structured(json!({"kind": "signup"}))),
            ])),
            RowData::Row(Record::from([
                ("id", RawValue::Int(2)),
                ("at", RawValue::Null),
                ("payload", RawValue::Structured(json!(null))),
            ])),
        ],
    )
}

#[tokio::test]
async fn test_executed_result_round_trips_to_csv() {
    let result = execute_and_take_result(event_engine()).await;
    let rows = export_rows(&result);

    let sink = Arc::new(MemoryClipboard::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let exporter = ClipboardExporter::new(sink.clone(), tx);

    exporter.export_to_clipboard(&rows, ExportFormat::Csv).await;

    assert_eq!(
        sink.last_write(),
        Some(
            "id,at,payload\n\
             1,2024-01-15T10:30:00.000Z,\"{\"\"kind\"\":\"\"signup\"\"}\"\n\
             2,,\n"
                .to_string()
        )
    );

    let mut state = SessionExecutionState::new();
    let seen = fold_pending(&mut rx, &mut state);
    assert!(matches!(
        seen[0],
        QueryNotification::CopyQueryResultToClipboardRequest
    ));
    assert!(matches!(
        seen[1],
        QueryNotification::CopyQueryResultToClipboardSuccess
    ));
}

#[tokio::test]
async fn test_executed_result_round_trips_to_json() {
    let result = execute_and_take_result(event_engine()).await;
    let rows = export_rows(&result);

    let sink = Arc::new(MemoryClipboard::new());
    let (tx, _rx) = mpsc::unbounded_channel();
    let exporter = ClipboardExporter::new(sink.clone(), tx);

    exporter.export_to_clipboard(&rows, ExportFormat::Json).await;

    let text = sink.last_write().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    // Sanitized cells are already canonical, so the JSON carries the
    // canonicalized text for the payload column.
    assert_eq!(parsed[0]["payload"], json!("{\"kind\":\"signup\"}"));
    assert_eq!(parsed[1]["at"], json!(null));
    // Two-space pretty style.
    assert!(text.starts_with("[\n  {\n    "));
}

#[tokio::test]
async fn test_sanitized_cells_are_already_canonical() {
    let result = execute_and_take_result(event_engine()).await;

    match &result.rows[0] {
        RowData::Row(row) => {
            assert_eq!(
                row.get("at"),
                Some(&CanonicalValue::Text("2024-01-15T10:30:00.000Z".to_string()))
            );
        }
        other => panic!("expected a row, got {other:?}"),
    }
    // The JSON null payload cell stayed null instead of becoming text.
    match &result.rows[1] {
        RowData::Row(row) => assert_eq!(row.get("payload"), Some(&CanonicalValue::Null)),
        other => panic!("expected a row, got {other:?}"),
    }
}

#[tokio::test]
async fn test_export_rows_from_two_queries_interleave_without_loss() {
    let sink = Arc::new(MemoryClipboard::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let exporter = ClipboardExporter::new(sink.clone(), tx);

    let csv_rows = vec![Record::from([("a", RawValue::Int(1))])];
    let json_rows = vec![Record::from([("b", RawValue::Int(2))])];

    // Two exports race; each keeps its own REQUEST/terminal pairing.
    tokio::join!(
        exporter.export_to_clipboard(&csv_rows, ExportFormat::Csv),
        exporter.export_to_clipboard(&json_rows, ExportFormat::Json),
    );

    assert_eq!(sink.writes().len(), 2);

    let mut state = SessionExecutionState::new();
    let seen = fold_pending(&mut rx, &mut state);
    let requests = seen
        .iter()
        .filter(|n| matches!(n, QueryNotification::CopyQueryResultToClipboardRequest))
        .count();
    let successes = seen
        .iter()
        .filter(|n| matches!(n, QueryNotification::CopyQueryResultToClipboardSuccess))
        .count();
    assert_eq!((requests, successes), (2, 2));
}
