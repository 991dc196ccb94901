//! Clipboard sinks.
//!
//! The exporter writes through the [`ClipboardSink`] trait. The system
//! implementation uses the native clipboard via arboard and falls back to
//! the OSC 52 terminal escape sequence when no native clipboard is
//! reachable (headless sessions, SSH).

use std::io::Write;
use std::sync::Mutex;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::error::{DispatchError, Result};

/// Destination for exported text.
///
/// Writes are synchronous and may fail; the exporter converts failures
/// into FAILURE notifications.
pub trait ClipboardSink: Send + Sync {
    /// Writes `text` to the clipboard.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// The operating-system clipboard.
pub struct SystemClipboard {
    clipboard: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    /// Opens the native clipboard when available; otherwise writes go out
    /// as OSC 52 escape sequences.
    pub fn new() -> Self {
        let clipboard = arboard::Clipboard::new().ok();
        if clipboard.is_none() {
            debug!("native clipboard unavailable, falling back to OSC 52");
        }
        Self {
            clipboard: Mutex::new(clipboard),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|_| DispatchError::clipboard_write("clipboard lock poisoned"))?;
        match guard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| DispatchError::clipboard_write(e.to_string())),
            None => write_osc52(text),
        }
    }
}

/// Copies text using the OSC 52 escape sequence, understood by most
/// modern terminals.
fn write_osc52(text: &str) -> Result<()> {
    let encoded = STANDARD.encode(text);
    // OSC 52 format: ESC ] 52 ; c ; <base64-data> ESC \
    let sequence = format!("\x1b]52;c;{encoded}\x1b\\");

    let mut stdout = std::io::stdout();
    stdout
        .write_all(sequence.as_bytes())
        .map_err(|e| DispatchError::clipboard_write(format!("failed to write OSC 52: {e}")))?;
    stdout
        .flush()
        .map_err(|e| DispatchError::clipboard_write(format!("failed to flush OSC 52: {e}")))
}

/// In-memory sink recording every write; stands in for the OS clipboard
/// in tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    /// Creates an empty in-memory clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent write, if any.
    pub fn last_write(&self) -> Option<String> {
        self.writes
            .lock()
            .ok()
            .and_then(|writes| writes.last().cloned())
    }

    /// Every write, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        self.writes
            .lock()
            .map_err(|_| DispatchError::clipboard_write("clipboard lock poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}

/// A sink whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingClipboard;

impl FailingClipboard {
    /// Creates a failing clipboard sink.
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for FailingClipboard {
    fn write_text(&self, _text: &str) -> Result<()> {
        Err(DispatchError::clipboard_write("clipboard is not available"))
    }
}
