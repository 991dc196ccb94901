//! Clipboard export.
//!
//! Serializes a row set to CSV or pretty JSON and writes it to the
//! clipboard sink, publishing the copy lifecycle notifications. CSV cells
//! are canonicalized first; JSON keeps raw serialization semantics.

use std::sync::Arc;

use tracing::debug;

use crate::canonical::{canonicalize_record, CanonicalRow, CanonicalValue};
use crate::clipboard::ClipboardSink;
use crate::engine::Row;
use crate::error::{DispatchError, Result};
use crate::notification::{NotificationSender, QueryNotification};

/// Output encoding for a clipboard export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON, two-space indentation.
    Json,
}

/// Exports query result rows to the clipboard.
pub struct ClipboardExporter {
    sink: Arc<dyn ClipboardSink>,
    notifications: NotificationSender,
}

impl ClipboardExporter {
    /// Creates an exporter writing to the given sink and publishing to the
    /// given notification channel.
    pub fn new(sink: Arc<dyn ClipboardSink>, notifications: NotificationSender) -> Self {
        Self {
            sink,
            notifications,
        }
    }

    /// Serializes `rows` in the requested format and writes the text to
    /// the clipboard. Emits the copy REQUEST immediately and exactly one
    /// of SUCCESS or FAILURE when done; on failure the clipboard is left
    /// unmodified.
    pub async fn export_to_clipboard(&self, rows: &[Row], format: ExportFormat) {
        self.emit(QueryNotification::CopyQueryResultToClipboardRequest);

        let outcome = match self.render(rows, format).await {
            Ok(text) => self.sink.write_text(&text),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(()) => {
                debug!(?format, rows = rows.len(), "copied rows to clipboard");
                self.emit(QueryNotification::CopyQueryResultToClipboardSuccess);
            }
            Err(error) => {
                self.emit(QueryNotification::CopyQueryResultToClipboardFailure { error });
            }
        }
    }

    async fn render(&self, rows: &[Row], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Csv => stringify_rows_to_csv(rows).await,
            ExportFormat::Json => {
                // Yield once so the REQUEST notification is handled in its
                // own scheduler turn before this synchronous serialization
                // runs.
                tokio::task::yield_now().await;
                serde_json::to_string_pretty(rows)
                    .map_err(|e| DispatchError::encoding(e.to_string()))
            }
        }
    }

    fn emit(&self, notification: QueryNotification) {
        let _ = self.notifications.send(notification);
    }
}

/// Encodes `rows` as CSV: a header record of the first row's column names,
/// then every row canonicalized, in the header's column order. Empty input
/// encodes to the empty string without touching the codec.
async fn stringify_rows_to_csv(rows: &[Row]) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let header: CanonicalRow = rows[0]
        .columns()
        .map(|column| (column.to_string(), CanonicalValue::Text(column.to_string())))
        .collect();

    let mut records = Vec::with_capacity(rows.len() + 1);
    records.push(header);
    records.extend(rows.iter().map(canonicalize_record));

    // The codec is synchronous; bridge it onto the blocking pool so a
    // large row set does not stall the scheduler.
    tokio::task::spawn_blocking(move || encode_csv(&records))
        .await
        .map_err(|e| DispatchError::encoding(format!("CSV encoder task failed: {e}")))?
}

fn encode_csv(records: &[CanonicalRow]) -> Result<String> {
    let columns: Vec<String> = records[0].columns().map(str::to_string).collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .write_record(columns.iter().map(|column| csv_field(record.get(column))))
            .map_err(|e| DispatchError::encoding(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DispatchError::encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DispatchError::encoding(e.to_string()))
}

/// CSV text of one canonical cell. Absent and null cells encode as the
/// empty field.
fn csv_field(value: Option<&CanonicalValue>) -> String {
    match value {
        None | Some(CanonicalValue::Null) => String::new(),
        Some(CanonicalValue::Bool(b)) => b.to_string(),
        Some(CanonicalValue::Int(i)) => i.to_string(),
        Some(CanonicalValue::Float(f)) => f.to_string(),
        Some(CanonicalValue::Text(s)) => s.clone(),
    }
}
