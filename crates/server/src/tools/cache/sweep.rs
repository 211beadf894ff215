//! sweep_cache tool implementation.
//!
//! Deletes expired insights ahead of their lazy removal on read.

use insyt_core::InsightCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::{DeletedOutput, json_result};

/// Implementation of the sweep_cache tool.
pub async fn sweep_impl(cache: &InsightCache) -> Result<CallToolResult, McpError> {
    let deleted = cache.sweep_expired().await?;
    json_result(&DeletedOutput { deleted })
}
