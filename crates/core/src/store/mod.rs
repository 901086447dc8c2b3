//! SQLite-backed store for processed documents.
//!
//! Access goes through tokio-rusqlite so every statement runs on a dedicated
//! thread. It provides:
//!
//! - Automatic schema migrations
//! - WAL mode for concurrent readers
//! - A per-call timeout on every store operation

pub mod connection;
pub mod documents;
pub mod migrations;

pub use crate::Error;

pub use connection::DocumentDb;
pub use documents::DocumentId;
