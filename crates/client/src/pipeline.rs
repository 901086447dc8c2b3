//! URL ingestion: classify, extract, summarize, persist.

use std::sync::Arc;

use serde::Serialize;
use synthese_core::{AppConfig, DocumentDb, DocumentId, Error, Summarizer};
use tracing::{Span, instrument};

use crate::page::{PageSource, PageTextExtractor};
use crate::source::{Source, classify};
use crate::transcript::{TranscriptSource, YoutubeTranscripts, extract_transcript};

/// Default number of sentences kept in a summary.
pub const DEFAULT_SENTENCE_COUNT: usize = 5;

/// Result of a successful [`Pipeline::process`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutcome {
    pub document_id: DocumentId,
    pub summary: String,
}

/// Ingestion pipeline with its collaborators wired in.
///
/// Holds no per-call state, so one instance can serve concurrent calls
/// behind an `Arc`.
#[derive(Clone)]
pub struct Pipeline {
    transcripts: Arc<dyn TranscriptSource>,
    pages: Arc<dyn PageSource>,
    summarizer: Summarizer,
    store: DocumentDb,
    sentence_count: usize,
}

impl Pipeline {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>, pages: Arc<dyn PageSource>, summarizer: Summarizer, store: DocumentDb,
    ) -> Self {
        Self { transcripts, pages, summarizer, store, sentence_count: DEFAULT_SENTENCE_COUNT }
    }

    /// Production wiring: YouTube transcripts, HTTP page text, SQLite store.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let transcripts = Arc::new(YoutubeTranscripts::from_config(config)?);
        let pages = Arc::new(PageTextExtractor::from_config(config)?);
        let summarizer = Summarizer::from_config(config)?;
        let store = DocumentDb::open(&config.db_path).await?.with_timeout(config.store_timeout());

        tracing::debug!(db_path = %config.db_path.display(), language = %summarizer.language(), "pipeline ready");

        Ok(Self::new(transcripts, pages, summarizer, store).with_sentence_count(config.summary_sentences))
    }

    pub fn with_sentence_count(mut self, sentence_count: usize) -> Self {
        self.sentence_count = sentence_count;
        self
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn store(&self) -> &DocumentDb {
        &self.store
    }

    /// Ingest `url` and persist its text and summary.
    ///
    /// Every stage failure is terminal. Nothing is written unless a summary
    /// was produced.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for a blank URL
    /// - `TranscriptUnavailable` or a fetch error from extraction
    /// - `EmptyInput` when the extracted text has no sentences
    /// - a persistence error from the store
    #[instrument(skip_all, fields(url = %url, source))]
    pub async fn process(&self, url: &str) -> Result<ProcessOutcome, Error> {
        if url.trim().is_empty() {
            return Err(Error::InvalidParameter("url must not be empty".into()));
        }

        let source = classify(url);
        Span::current().record("source", source.kind());

        let text = self.extract(&source).await?;
        let summary = self.summarizer.summarize(&text, self.sentence_count)?;
        let document_id = self.store.save(url, &text, &summary.text).await?;

        tracing::info!(
            %document_id,
            sentences = summary.sentences.len(),
            total_sentences = summary.total_sentences,
            "processed url"
        );

        Ok(ProcessOutcome { document_id, summary: summary.text })
    }

    /// Raw text for a classified source.
    pub async fn extract(&self, source: &Source) -> Result<String, Error> {
        match source {
            Source::Video { video_id } => extract_transcript(self.transcripts.as_ref(), video_id).await,
            Source::Page { url } => self.pages.extract_page_text(url).await,
        }
    }
}
