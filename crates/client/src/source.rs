//! Source classification.
//!
//! Decides whether a URL points at a video (transcript extraction) or at a
//! generic page (raw text extraction). Classification is total: anything that
//! is not recognisably a video is a page.

use crate::target::{host_is, parse_lenient};

const VIDEO_HOST_MARKERS: &[&str] = &["youtube.com", "youtu.be", "youtube-nocookie.com"];

/// Path prefixes followed by a video id on youtube.com.
const VIDEO_PATH_PREFIXES: &[&str] = &["embed", "shorts", "live", "v"];

/// Extraction strategy for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A hosted video. `video_id` is empty when no id could be found.
    Video { video_id: String },
    /// Any other page, carrying the URL as given.
    Page { url: String },
}

impl Source {
    pub fn is_video(&self) -> bool {
        matches!(self, Source::Video { .. })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Video { .. } => "video",
            Source::Page { .. } => "page",
        }
    }
}

/// Classify `input` into a [`Source`]. Never fails.
pub fn classify(input: &str) -> Source {
    let lowered = input.to_ascii_lowercase();
    if !VIDEO_HOST_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Source::Page { url: input.to_string() };
    }

    let video_id = parse_video_url(input).unwrap_or_else(|| textual_video_id(input));
    Source::Video { video_id }
}

/// Structured extraction from a parseable video URL.
fn parse_video_url(input: &str) -> Option<String> {
    let url = parse_lenient(input)?;

    if host_is(&url, "youtu.be") {
        return url.path_segments()?.next().filter(|s| !s.is_empty()).map(str::to_string);
    }

    if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
        return Some(id.into_owned()).filter(|id| !id.is_empty());
    }

    let mut segments = url.path_segments()?;
    let prefix = segments.next()?;
    if VIDEO_PATH_PREFIXES.contains(&prefix) {
        return segments.next().filter(|s| !s.is_empty()).map(str::to_string);
    }

    None
}

/// Text after the last `v=` up to the next `&`, `#` or `/`; empty if absent.
fn textual_video_id(input: &str) -> String {
    match input.rfind("v=") {
        Some(idx) => input[idx + 2..].split(['&', '#', '/']).next().unwrap_or_default().trim().to_string(),
        None => String::new(),
    }
}
