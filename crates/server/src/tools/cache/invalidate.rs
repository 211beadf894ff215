//! invalidate_insight tool implementation.

use insyt_core::{Error, InsightCache};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the invalidate_insight tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateParams {
    /// Profile URL whose cached insight should be dropped.
    pub profile_url: String,
}

/// Output from the invalidate_insight tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvalidateOutput {
    pub invalidated: String,
}

/// Implementation of the invalidate_insight tool.
///
/// Invalidating a profile that has no entry succeeds.
pub async fn invalidate_impl(cache: &InsightCache, params: InvalidateParams) -> Result<CallToolResult, McpError> {
    if params.profile_url.trim().is_empty() {
        return Err(Error::InvalidInput("profileUrl cannot be empty".into()).into());
    }

    cache.invalidate(&params.profile_url).await?;
    json_result(&InvalidateOutput { invalidated: params.profile_url })
}
