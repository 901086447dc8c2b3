//! YouTube caption retrieval over plain HTTP.
//!
//! 1. GET `{base}/watch?v=<id>` and cut the `"captions":` object out of the
//!    embedded player response.
//! 2. Pick a caption track: manual tracks in preferred-language order, then
//!    auto-generated (`kind == "asr"`) ones.
//! 3. GET the track's timedtext XML and read every `<text start dur>` element.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use synthese_core::{AppConfig, Error};

use super::{TranscriptEntry, TranscriptSource};
use crate::fetch::{FetchClient, FetchConfig};

/// Public YouTube origin.
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

const CAPTIONS_MARKER: &str = "\"captions\":";
const CAPTIONS_END: &str = ",\"videoDetails";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: TracklistRenderer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// [`TranscriptSource`] backed by youtube.com watch pages.
#[derive(Debug, Clone)]
pub struct YoutubeTranscripts {
    client: FetchClient,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeTranscripts {
    pub fn new(client: FetchClient, languages: Vec<String>) -> Self {
        Self { client, base_url: DEFAULT_BASE_URL.to_string(), languages }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig::from(config))?;
        Ok(Self::new(client, config.transcript_languages.clone()))
    }

    /// Point at a different origin (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn watch_page(&self, video_id: &str) -> Result<String, Error> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        let response = self.client.fetch(&url).await.map_err(|e| unavailable(video_id, &e))?;
        Ok(response.text_lossy())
    }

    fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        let pick = |generated: bool| {
            self.languages.iter().find_map(|lang| {
                tracks.iter().find(|t| t.is_generated() == generated && t.language_code.eq_ignore_ascii_case(lang))
            })
        };
        pick(false).or_else(|| pick(true))
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, Error> {
        let html = self.watch_page(video_id).await?;
        let tracks = caption_tracks(&html, video_id)?;

        let track = self.select_track(&tracks).ok_or_else(|| {
            let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
            Error::TranscriptUnavailable(format!(
                "{video_id}: no captions in {:?} (available: {:?})",
                self.languages, available
            ))
        })?;

        tracing::debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "selected caption track"
        );

        let xml = self.client.fetch(&track.base_url).await.map_err(|e| unavailable(video_id, &e))?.text_lossy();
        let entries = parse_timedtext(&xml);
        if entries.is_empty() {
            return Err(Error::TranscriptUnavailable(format!("{video_id}: caption track is empty")));
        }
        Ok(entries)
    }
}

fn unavailable(video_id: &str, err: &Error) -> Error {
    Error::TranscriptUnavailable(format!("{video_id}: {err}"))
}

/// Caption tracks declared in a watch page.
fn caption_tracks(html: &str, video_id: &str) -> Result<Vec<CaptionTrack>, Error> {
    let Some((_, after)) = html.split_once(CAPTIONS_MARKER) else {
        let reason = if html.contains("class=\"g-recaptcha\"") {
            "blocked by a captcha"
        } else if html.contains("\"playabilityStatus\":") {
            "captions are disabled or the video is not playable"
        } else {
            "video is unavailable"
        };
        return Err(Error::TranscriptUnavailable(format!("{video_id}: {reason}")));
    };

    let json = after.split_once(CAPTIONS_END).map(|(json, _)| json).unwrap_or(after);
    let captions: Captions = serde_json::from_str(json.trim())
        .map_err(|e| Error::TranscriptUnavailable(format!("{video_id}: unreadable caption list: {e}")))?;

    let tracks = captions.player_captions_tracklist_renderer.caption_tracks;
    if tracks.is_empty() {
        return Err(Error::TranscriptUnavailable(format!("{video_id}: no caption tracks")));
    }
    Ok(tracks)
}

/// Caption entries from a timedtext document.
///
/// Text is stored entity-escaped inside the XML and may carry inline
/// `<font>`/`<i>` markup, so each element's text is parsed a second time.
fn parse_timedtext(xml: &str) -> Vec<TranscriptEntry> {
    let document = Html::parse_fragment(xml);
    let selector = Selector::parse("text").expect("invalid selector");

    document
        .select(&selector)
        .filter_map(|element| {
            let raw: String = element.text().collect();
            let text = Html::parse_fragment(&raw).root_element().text().collect::<String>();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }

            let attr = |name: &str| element.value().attr(name).and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0);
            Some(TranscriptEntry { text, start: attr("start"), duration: attr("dur") })
        })
        .collect()
}
