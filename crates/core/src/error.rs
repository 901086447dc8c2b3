//! Unified error types for synthese.
//!
//! Every variant renders with a stable upper-case code prefix so callers can
//! tell failure reasons apart without matching on message text.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde::Serialize;
use tokio_rusqlite::rusqlite;

/// Unified error type for the ingestion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied parameter is out of range (e.g., zero sentences, blank URL).
    #[error("INVALID_PARAMETER: {0}")]
    InvalidParameter(String),

    /// The text to summarize contains no sentences.
    #[error("EMPTY_INPUT: {0}")]
    EmptyInput(String),

    /// No usable transcript could be obtained for a video.
    #[error("TRANSCRIPT_UNAVAILABLE: {0}")]
    TranscriptUnavailable(String),

    /// The page URL could not be parsed or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The upstream server did not answer in time.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// The response body exceeds the download cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Non-2xx response or transport failure.
    #[error("HTTP_ERROR: {message}")]
    HttpError { status: Option<u16>, message: String },

    /// Database operation failed.
    #[error("PERSISTENCE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("PERSISTENCE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A store call exceeded its time budget.
    #[error("PERSISTENCE_ERROR: {0}")]
    StoreTimeout(String),
}

/// Coarse failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidParameter,
    EmptyInput,
    TranscriptUnavailable,
    Fetch,
    Persistence,
}

impl Error {
    /// Build an [`Error::HttpError`] for a non-success status code.
    pub fn http_status(status: u16) -> Self {
        Error::HttpError { status: Some(status), message: format!("status {status}") }
    }

    /// Build an [`Error::HttpError`] for a transport-level failure.
    pub fn http_transport(message: impl Into<String>) -> Self {
        Error::HttpError { status: None, message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::TranscriptUnavailable(_) => ErrorKind::TranscriptUnavailable,
            Error::InvalidUrl(_) | Error::FetchTimeout(_) | Error::FetchTooLarge(_) | Error::HttpError { .. } => {
                ErrorKind::Fetch
            }
            Error::Database(_) | Error::MigrationFailed(_) | Error::StoreTimeout(_) => ErrorKind::Persistence,
        }
    }

    /// Whether resubmitting the whole request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::FetchTimeout(_) | Error::Database(_) | Error::StoreTimeout(_) => true,
            Error::HttpError { status: None, .. } => true,
            Error::HttpError { status: Some(code), .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidParameter(_) => -32602,
            Error::EmptyInput(_) => -32000,
            Error::TranscriptUnavailable(_) => -32001,
            Error::InvalidUrl(_) => -32003,
            Error::FetchTimeout(_) => -32006,
            Error::FetchTooLarge(_) => -32007,
            Error::HttpError { .. } => -32008,
            Error::Database(_) | Error::MigrationFailed(_) | Error::StoreTimeout(_) => -32002,
        };
        let data = serde_json::json!({ "kind": err.kind(), "retryable": err.is_retryable() });

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: Some(data) }
    }
}
