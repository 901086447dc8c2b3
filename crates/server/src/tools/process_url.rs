//! process_url tool implementation.
//!
//! Runs the full ingestion pipeline: classify, extract, summarize, store.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use synthese_client::Pipeline;

/// Input parameters for process_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessUrlParams {
    /// The URL to ingest. YouTube links use the video transcript; anything
    /// else uses the raw page body.
    pub url: String,
}

/// Output structure for process_url tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessUrlOutput {
    /// Identifier of the stored document.
    pub document_id: i64,
    /// The extractive summary.
    pub summary: String,
}

/// Implementation of the process_url tool.
pub async fn process_impl(pipeline: &Pipeline, params: ProcessUrlParams) -> Result<CallToolResult, McpError> {
    let outcome = pipeline.process(&params.url).await?;
    let output = ProcessUrlOutput { document_id: outcome.document_id.0, summary: outcome.summary };

    Ok(CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(&output).unwrap_or_default())]))
}
