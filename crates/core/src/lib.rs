//! Core types and shared functionality for synthese.
//!
//! This crate provides:
//! - LexRank extractive summarization
//! - Document store with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;
pub mod summarize;

pub use config::AppConfig;
pub use error::{Error, ErrorKind};
pub use store::{DocumentDb, DocumentId};
pub use summarize::{Language, Summarizer, Summary};
