//! health_check tool implementation.

use insyt_client::Generator;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output from the health_check tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthOutput {
    /// Whether the generator backend answered `{"status": "ok"}`.
    pub healthy: bool,
}

/// Implementation of the health_check tool.
pub async fn health_impl(generator: &dyn Generator) -> Result<CallToolResult, McpError> {
    let output = HealthOutput { healthy: generator.health_check().await };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize output: {e}"), None))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
