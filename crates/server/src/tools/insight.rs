//! get_insight tool implementation.
//!
//! Runs the insight pipeline for one profile.

use insyt_core::ProfileData;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pipeline::Pipeline;

/// Parameters for the get_insight tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetInsightParams {
    /// Profile URL, used verbatim as the cache identity.
    pub profile_url: String,

    /// Basic profile signals gathered by the caller.
    pub profile_data: ProfileData,
}

/// Implementation of the get_insight tool.
///
/// A failed pipeline run is reported as a tool error carrying the same JSON
/// reply the extension would receive.
pub async fn insight_impl(pipeline: &Pipeline, params: GetInsightParams) -> Result<CallToolResult, McpError> {
    let response = pipeline.handle(&params.profile_url, params.profile_data).await;
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize response: {e}"), None))?;

    if response.success {
        Ok(CallToolResult::success(vec![Content::text(json)]))
    } else {
        Ok(CallToolResult::error(vec![Content::text(json)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{pipeline, text_of};
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    #[tokio::test]
    async fn test_insight_success_then_cached() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"summary": "S", "starters": ["a"]}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let pipeline = pipeline(&server.uri()).await;

        let params =
            GetInsightParams { profile_url: "https://x/in/a".into(), profile_data: ProfileData::new("A", "T") };

        let first = insight_impl(&pipeline, params.clone()).await.unwrap();
        assert_ne!(first.is_error, Some(true));

        let second = insight_impl(&pipeline, params).await.unwrap();
        let output: serde_json::Value = serde_json::from_str(&text_of(&second)).unwrap();
        assert_eq!(output["cached"], true);
        assert_eq!(output["data"]["summary"], "S");
    }

    #[tokio::test]
    async fn test_insight_failure_is_tool_error() {
        let pipeline = pipeline("http://127.0.0.1:1").await;
        let params =
            GetInsightParams { profile_url: "https://x/in/a".into(), profile_data: ProfileData::new("A", "T") };

        let result = insight_impl(&pipeline, params).await.unwrap();
        assert_eq!(result.is_error, Some(true));

        let output: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(output["success"], false);
    }
}
