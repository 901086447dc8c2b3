//! Client code for synthese.
//!
//! This crate provides source classification, the HTTP fetch client, page and
//! transcript extraction, and the ingestion pipeline shared by the server and
//! CLI.

pub mod fetch;
pub mod page;
pub mod pipeline;
pub mod source;
pub mod target;
pub mod transcript;

pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use page::{PageSource, PageTextExtractor};
pub use pipeline::{Pipeline, ProcessOutcome};
pub use source::{Source, classify};
pub use transcript::{TranscriptEntry, TranscriptSource, YoutubeTranscripts, extract_transcript};
