//! clear_cache tool implementation.
//!
//! Removes every cached insight. Other keys in the storage area are kept.

use insyt_core::InsightCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::{DeletedOutput, json_result};

/// Implementation of the clear_cache tool.
pub async fn clear_impl(cache: &InsightCache) -> Result<CallToolResult, McpError> {
    let deleted = cache.clear_all().await?;
    json_result(&DeletedOutput { deleted })
}
