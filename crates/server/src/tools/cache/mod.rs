//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and pruning the insight cache.

pub mod clear;
pub mod invalidate;
pub mod stats;
pub mod sweep;

pub use clear::clear_impl;
pub use invalidate::{InvalidateParams, invalidate_impl};
pub use stats::stats_impl;
pub use sweep::sweep_impl;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output of the tools that delete entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeletedOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
