//! db-dispatch - query coordination and clipboard export for database viewers.
//!
//! This crate is the execution core a database UI sits on top of: it
//! decides when a query actually needs to run against the remote engine,
//! scrubs raw results into transport-safe form, and exports row sets to
//! the clipboard as CSV or pretty JSON. State stays with the UI's state
//! container; this core reads snapshots and publishes lifecycle
//! notifications.

pub mod canonical;
pub mod clipboard;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod export;
pub mod notification;
pub mod sanitize;
pub mod session;
