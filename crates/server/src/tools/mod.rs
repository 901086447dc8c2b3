//! MCP tool implementations.
//!
//! This module contains all tools exposed by the synthese server.

pub mod process_url;
pub mod summarize_text;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use synthese_client::{PageSource, Pipeline, TranscriptEntry, TranscriptSource};
    use synthese_core::{DocumentDb, Error, Language, Summarizer};

    struct NoTranscripts;

    #[async_trait]
    impl TranscriptSource for NoTranscripts {
        async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>, Error> {
            Err(Error::TranscriptUnavailable(format!("{video_id}: no captions")))
        }
    }

    struct StaticPage(String);

    #[async_trait]
    impl PageSource for StaticPage {
        async fn extract_page_text(&self, _url: &str) -> Result<String, Error> {
            Ok(self.0.clone())
        }
    }

    /// Pipeline whose every page returns `text`, backed by an in-memory store.
    pub async fn pipeline_with_page(text: &str) -> Pipeline {
        let store = DocumentDb::open_in_memory().await.unwrap();
        Pipeline::new(
            Arc::new(NoTranscripts),
            Arc::new(StaticPage(text.to_string())),
            Summarizer::new(Language::English),
            store,
        )
    }
}
