//! Video transcript extraction.
//!
//! A [`TranscriptSource`] returns the ordered caption entries of a video;
//! [`extract_transcript`] validates the id and flattens the entries into a
//! single space-separated text.

pub mod youtube;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use synthese_core::Error;

pub use youtube::YoutubeTranscripts;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("video id pattern is valid"));

/// One caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    /// Offset from the start of the video, in seconds.
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self { text: text.into(), start, duration }
    }
}

/// Source of caption entries for a video id.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Ordered caption entries, or `TranscriptUnavailable`.
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, Error>;
}

/// Whether `video_id` is non-empty and made of `[A-Za-z0-9_-]` only.
pub fn is_valid_video_id(video_id: &str) -> bool {
    VIDEO_ID.is_match(video_id)
}

/// Fetch and flatten the transcript of `video_id`.
///
/// # Errors
///
/// `TranscriptUnavailable` for a malformed id, or whatever the source reports.
pub async fn extract_transcript(source: &dyn TranscriptSource, video_id: &str) -> Result<String, Error> {
    if !is_valid_video_id(video_id) {
        return Err(Error::TranscriptUnavailable(format!("malformed video id {video_id:?}")));
    }

    let entries = source.fetch_transcript(video_id).await?;
    let text = join_entries(&entries);
    tracing::debug!(video_id, entries = entries.len(), chars = text.chars().count(), "extracted transcript");
    Ok(text)
}

fn join_entries(entries: &[TranscriptEntry]) -> String {
    entries.iter().map(|e| e.text.trim()).filter(|t| !t.is_empty()).collect::<Vec<_>>().join(" ")
}
