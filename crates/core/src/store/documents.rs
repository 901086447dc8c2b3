//! Document persistence.
//!
//! A document is written exactly once, after its summary has been produced,
//! and never modified afterwards.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use super::connection::DocumentDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

/// Claim states shared between a caller and its queued store call.
const PENDING: u8 = 0;
const STARTED: u8 = 1;
const ABANDONED: u8 = 2;

/// Store-assigned document identifier. Unique and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DocumentDb {
    /// Insert a processed document and return its generated id.
    ///
    /// The insert is a single statement, so it is either fully visible or not
    /// at all.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the database rejects the row, or
    /// `StoreTimeout` if the insert is still queued when the configured
    /// timeout expires. A timed-out insert is never written later.
    pub async fn save(&self, url: &str, full_text: &str, summary: &str) -> Result<DocumentId, Error> {
        let url = url.to_string();
        let full_text = full_text.to_string();
        let summary = summary.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        let id = self
            .bounded(move |conn| -> Result<i64, Error> {
                let id = conn.query_row(
                    "INSERT INTO documents (url, transcript, summary, created_at)
                    VALUES (?1, ?2, ?3, ?4)
                    RETURNING id",
                    params![url, full_text, summary, created_at],
                    |row| row.get(0),
                )?;
                Ok(id)
            })
            .await?;

        tracing::debug!(document_id = id, "saved document");
        Ok(DocumentId(id))
    }

    /// Number of stored documents.
    pub async fn count_documents(&self) -> Result<u64, Error> {
        let count = self
            .bounded(|conn| -> Result<i64, Error> {
                Ok(conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?)
            })
            .await?;
        Ok(count as u64)
    }

    /// Run `op` on the connection thread unless it is still queued when the
    /// store timeout expires.
    ///
    /// An abandoned call never touches the database. A call that started
    /// before the deadline is awaited to completion, so the caller always sees
    /// the outcome that was actually committed.
    async fn bounded<T, F>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut rusqlite::Connection) -> Result<T, Error> + Send + 'static,
    {
        let timeout = self.timeout;
        let claim = Arc::new(AtomicU8::new(PENDING));
        let worker_claim = Arc::clone(&claim);

        let mut call = std::pin::pin!(self.conn.call(move |conn| {
            if worker_claim.compare_exchange(PENDING, STARTED, Ordering::AcqRel, Ordering::Acquire).is_err() {
                return Err(store_timeout(timeout));
            }
            op(conn)
        }));

        match tokio::time::timeout(timeout, call.as_mut()).await {
            Ok(result) => result.map_err(Error::from),
            Err(_) if claim.compare_exchange(PENDING, ABANDONED, Ordering::AcqRel, Ordering::Acquire).is_ok() => {
                Err(store_timeout(timeout))
            }
            Err(_) => {
                tracing::debug!(timeout_ms = timeout.as_millis() as u64, "store call outlived its deadline");
                call.await.map_err(Error::from)
            }
        }
    }
}

fn store_timeout(timeout: Duration) -> Error {
    Error::StoreTimeout(format!("store call exceeded {}ms", timeout.as_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_save_returns_increasing_ids() {
        let db = DocumentDb::open_in_memory().await.unwrap();

        let first = db.save("https://example.com/a", "Full text a.", "Summary a.").await.unwrap();
        let second = db.save("https://example.com/b", "Full text b.", "Summary b.").await.unwrap();

        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(db.count_documents().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_saved_row_contents() {
        let db = DocumentDb::open_in_memory().await.unwrap();
        let id = db.save("https://youtu.be/abc123", "Hello world", "Hello world").await.unwrap();

        let row: (String, String, String, String) = db
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT url, transcript, summary, created_at FROM documents WHERE id = ?1",
                    params![id.0],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
            })
            .await
            .unwrap();

        assert_eq!(row.0, "https://youtu.be/abc123");
        assert_eq!(row.1, "Hello world");
        assert_eq!(row.2, "Hello world");
        assert!(chrono::DateTime::parse_from_rfc3339(&row.3).is_ok());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let db = DocumentDb::open_in_memory().await.unwrap();
        let first = db.save("u", "t", "s").await.unwrap();
        db.conn
            .call(move |conn| conn.execute("DELETE FROM documents WHERE id = ?1", params![first.0]))
            .await
            .unwrap();

        let second = db.save("u", "t", "s").await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_distinct_ids() {
        let db = DocumentDb::open_in_memory().await.unwrap();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move { db.save(&format!("https://example.com/{i}"), "text", "text").await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[tokio::test]
    async fn test_constraint_violation_is_persistence_error() {
        let db = DocumentDb::open_in_memory().await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_insert BEFORE INSERT ON documents
                     BEGIN SELECT RAISE(ABORT, 'read only'); END;",
                )
            })
            .await
            .unwrap();

        let err = db.save("u", "t", "s").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(db.count_documents().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_timed_out_save_is_never_written() {
        let db = DocumentDb::open_in_memory().await.unwrap();
        let busy = db.clone();
        let blocker = tokio::spawn(async move {
            busy.conn
                .call(|_| {
                    std::thread::sleep(Duration::from_millis(300));
                    Ok::<_, Error>(())
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = db.clone().with_timeout(Duration::from_millis(50)).save("u", "t", "s").await.unwrap_err();
        assert!(matches!(err, Error::StoreTimeout(_)));
        assert!(err.is_retryable());

        blocker.await.unwrap().unwrap();
        assert_eq!(db.count_documents().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_started_call_reports_its_outcome() {
        let db = DocumentDb::open_in_memory().await.unwrap();
        let slow = db.clone().with_timeout(Duration::from_millis(50));

        let id = slow
            .bounded(|conn| -> Result<i64, Error> {
                std::thread::sleep(Duration::from_millis(200));
                Ok(conn.query_row(
                    "INSERT INTO documents (url, transcript, summary, created_at)
                    VALUES ('u', 't', 's', '2024-01-01T00:00:00Z')
                    RETURNING id",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(db.count_documents().await.unwrap(), 1);
    }

    #[test]
    fn test_document_id_display() {
        assert_eq!(DocumentId(42).to_string(), "42");
        assert_eq!(serde_json::to_string(&DocumentId(7)).unwrap(), "7");
    }
}
