//! Error types for db-dispatch.
//!
//! Defines the error taxonomy used at the operation boundaries of this crate.

use thiserror::Error;

/// Main error type for dispatch operations.
///
/// Every error is caught at the boundary of the operation that produced it
/// and carried, unmodified, inside a FAILURE notification (or returned to
/// the caller when a lifecycle has not started yet). Nothing is retried,
/// recovered locally, or re-thrown past the operation boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The remote engine call failed (connection lost, statement rejected, etc.)
    #[error("Remote execution error: {0}")]
    RemoteExecution(String),

    /// The raw engine result was malformed and could not be sanitized.
    #[error("Sanitization error: {0}")]
    Sanitization(String),

    /// CSV or JSON serialization failed.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The clipboard sink rejected the write.
    #[error("Clipboard write error: {0}")]
    ClipboardWrite(String),
}

impl DispatchError {
    /// Creates a remote execution error with the given message.
    pub fn remote_execution(msg: impl Into<String>) -> Self {
        Self::RemoteExecution(msg.into())
    }

    /// Creates a sanitization error with the given message.
    pub fn sanitization(msg: impl Into<String>) -> Self {
        Self::Sanitization(msg.into())
    }

    /// Creates an encoding error with the given message.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Creates a clipboard write error with the given message.
    pub fn clipboard_write(msg: impl Into<String>) -> Self {
        Self::ClipboardWrite(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::RemoteExecution(_) => "Remote Execution Error",
            Self::Sanitization(_) => "Sanitization Error",
            Self::Encoding(_) => "Encoding Error",
            Self::ClipboardWrite(_) => "Clipboard Write Error",
        }
    }
}

/// Result type alias using DispatchError.
pub type Result<T> = std::result::Result<T, DispatchError>;
