//! summarize_text tool implementation.
//!
//! Runs the summarizer alone on caller-supplied text.
//! No network I/O and nothing is stored.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use synthese_client::Pipeline;
use synthese_core::Summary;

/// Input parameters for summarize_text tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeTextParams {
    /// The text to summarize.
    pub text: String,

    /// Number of sentences to keep (defaults to the server setting).
    #[serde(default)]
    pub sentences: Option<usize>,
}

/// Implementation of the summarize_text tool.
pub async fn summarize_impl(pipeline: &Pipeline, params: SummarizeTextParams) -> Result<CallToolResult, McpError> {
    let count = params.sentences.unwrap_or_else(|| pipeline.sentence_count());
    let summary: Summary = pipeline.summarizer().summarize(&params.text, count)?;

    Ok(CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(&summary).unwrap_or_default())]))
}
