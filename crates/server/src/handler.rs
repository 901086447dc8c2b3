//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::process_url::{ProcessUrlParams, process_impl};
use crate::tools::summarize_text::{SummarizeTextParams, summarize_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use synthese_client::Pipeline;

/// The main MCP server handler for synthese.
#[derive(Clone)]
pub struct SyntheseServer {
    tool_router: ToolRouter<Self>,
    pipeline: Arc<Pipeline>,
}

#[tool_router]
impl SyntheseServer {
    /// Create a new server handler around a ready pipeline.
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { tool_router: Self::tool_router(), pipeline }
    }

    /// Ingest a URL: transcript for YouTube videos, raw page text otherwise.
    #[tool(
        description = "Fetch a YouTube transcript or web page, summarize it extractively and store it. Returns the stored document id and the summary."
    )]
    async fn process_url(&self, params: Parameters<ProcessUrlParams>) -> Result<CallToolResult, McpError> {
        process_impl(&self.pipeline, params.0).await
    }

    /// Summarize text without fetching or storing anything.
    #[tool(description = "Summarize the given text by selecting its most central sentences. No network requests are made.")]
    async fn summarize_text(&self, params: Parameters<SummarizeTextParams>) -> Result<CallToolResult, McpError> {
        summarize_impl(&self.pipeline, params.0).await
    }
}

impl ServerHandler for SyntheseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "synthese".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router.call(ToolCallContext::new(self, request, context)).await
    }
}
