//! MCP server handler implementation.
//!
//! This module defines the server handler that routes tool calls to the
//! implementations in [`crate::tools`].

use crate::pipeline::Pipeline;
use crate::tools::{
    BatchScrapeParams, GetInsightParams, batch_scrape_impl,
    cache::{InvalidateParams, clear_impl, invalidate_impl, stats_impl, sweep_impl},
    health_impl, insight_impl,
};

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

/// The MCP server handler for the insyt host.
#[derive(Clone)]
pub struct InsightServer {
    pipeline: Pipeline,
    scrape_concurrency: usize,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl InsightServer {
    /// Create a new server handler.
    pub fn new(pipeline: Pipeline, scrape_concurrency: usize) -> Self {
        Self { pipeline, scrape_concurrency, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Get an AI summary and conversation starters for a profile. Served from cache when fresh; otherwise the profile is scraped for richer data, sent to the generator and cached for 7 days."
    )]
    async fn get_insight(&self, params: Parameters<GetInsightParams>) -> Result<CallToolResult, McpError> {
        insight_impl(&self.pipeline, params.0).await
    }

    #[tool(description = "Delete every cached insight. Returns the number of deleted entries.")]
    async fn clear_cache(&self) -> Result<CallToolResult, McpError> {
        clear_impl(self.pipeline.cache()).await
    }

    #[tool(description = "Delete the cached insight for one profile URL, if any.")]
    async fn invalidate_insight(&self, params: Parameters<InvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(self.pipeline.cache(), params.0).await
    }

    #[tool(description = "Report the number of cached insights, storage size and the oldest/newest entry times.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(self.pipeline.cache()).await
    }

    #[tool(description = "Delete cached insights whose expiry has passed.")]
    async fn sweep_cache(&self) -> Result<CallToolResult, McpError> {
        sweep_impl(self.pipeline.cache()).await
    }

    #[tool(description = "Check whether the insight generator backend is reachable and healthy.")]
    async fn health_check(&self) -> Result<CallToolResult, McpError> {
        health_impl(self.pipeline.generator().as_ref()).await
    }

    #[tool(
        description = "Scrape several profile pages in hidden browser views with bounded concurrency. Returns one result per URL in input order."
    )]
    async fn batch_scrape(&self, params: Parameters<BatchScrapeParams>) -> Result<CallToolResult, McpError> {
        batch_scrape_impl(self.pipeline.scraper(), self.scrape_concurrency, params.0).await
    }
}

impl ServerHandler for InsightServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "insyt-host".into(),
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
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::pipeline;

    #[tokio::test]
    async fn test_all_tools_registered() {
        let server = InsightServer::new(pipeline("http://127.0.0.1:1").await, 2);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "batch_scrape",
                "cache_stats",
                "clear_cache",
                "get_insight",
                "health_check",
                "invalidate_insight",
                "sweep_cache"
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info() {
        let server = InsightServer::new(pipeline("http://127.0.0.1:1").await, 2);
        assert_eq!(server.get_info().server_info.name, "insyt-host");
    }
}
