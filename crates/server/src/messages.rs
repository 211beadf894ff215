//! Extension message contract.
//!
//! Requests are JSON objects tagged by `action`. Every request gets exactly one
//! reply carrying a `success` flag; failures never surface as transport errors.

use insyt_core::{CacheStats, ProfileData};
use serde::{Deserialize, Serialize};

use crate::pipeline::{InsightResponse, Pipeline};

/// A request from the extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "get1nsyt", rename_all = "camelCase")]
    GetInsight { profile_url: String, profile_data: ProfileData },

    #[serde(rename = "clearCache")]
    ClearCache,

    #[serde(rename = "cacheStats")]
    CacheStats,

    #[serde(rename = "healthCheck")]
    HealthCheck,

    #[serde(rename = "invalidate", rename_all = "camelCase")]
    Invalidate { profile_url: String },
}

/// Reply to `clearCache`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reply to `cacheStats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CacheStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reply to `healthCheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub healthy: bool,
}

/// Reply to `invalidate` and to messages that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}

/// Any reply, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Insight(InsightResponse),
    Clear(ClearResponse),
    Stats(StatsResponse),
    Health(HealthResponse),
    Ack(AckResponse),
}

/// Decode a raw message and answer it.
pub async fn dispatch(pipeline: &Pipeline, message: serde_json::Value) -> Response {
    match serde_json::from_value::<Request>(message) {
        Ok(request) => handle(pipeline, request).await,
        Err(e) => {
            tracing::warn!("rejected message: {e}");
            Response::Ack(AckResponse::error(format!("unrecognized message: {e}")))
        }
    }
}

/// Answer a decoded request.
pub async fn handle(pipeline: &Pipeline, request: Request) -> Response {
    match request {
        Request::GetInsight { profile_url, profile_data } => {
            Response::Insight(pipeline.handle(&profile_url, profile_data).await)
        }
        Request::ClearCache => Response::Clear(match pipeline.cache().clear_all().await {
            Ok(count) => ClearResponse { success: true, count: Some(count), error: None },
            Err(e) => ClearResponse { success: false, count: None, error: Some(e.to_string()) },
        }),
        Request::CacheStats => Response::Stats(match pipeline.cache().stats().await {
            Ok(stats) => StatsResponse { success: true, stats: Some(stats), error: None },
            Err(e) => StatsResponse { success: false, stats: None, error: Some(e.to_string()) },
        }),
        Request::HealthCheck => {
            Response::Health(HealthResponse { success: true, healthy: pipeline.generator().health_check().await })
        }
        Request::Invalidate { profile_url } => Response::Ack(match pipeline.cache().invalidate(&profile_url).await {
            Ok(()) => AckResponse { success: true, error: None },
            Err(e) => AckResponse::error(e.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insyt_client::GeneratorClient;
    use insyt_core::{CacheDb, GenerationResult, InsightCache};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    async fn pipeline(server: &MockServer) -> Pipeline {
        let db = CacheDb::open_in_memory().await.unwrap();
        let cache = InsightCache::new(db, Duration::from_secs(60));
        Pipeline::new(cache, Arc::new(GeneratorClient::with_url(server.uri()).unwrap()), None)
    }

    #[test]
    fn test_decode_get_insight() {
        let request: Request = serde_json::from_value(json!({
            "action": "get1nsyt",
            "profileUrl": "https://x/in/alice",
            "profileData": {"name": "Alice", "title": "Eng"}
        }))
        .unwrap();

        assert_eq!(
            request,
            Request::GetInsight {
                profile_url: "https://x/in/alice".into(),
                profile_data: ProfileData::new("Alice", "Eng")
            }
        );
    }

    #[test]
    fn test_decode_simple_actions() {
        let request: Request = serde_json::from_value(json!({"action": "clearCache"})).unwrap();
        assert_eq!(request, Request::ClearCache);

        let request: Request = serde_json::from_value(json!({"action": "invalidate", "profileUrl": "u"})).unwrap();
        assert_eq!(request, Request::Invalidate { profile_url: "u".into() });
    }

    #[tokio::test]
    async fn test_unknown_action_gets_error_reply() {
        let server = MockServer::start().await;
        let pipeline = pipeline(&server).await;

        let reply = serde_json::to_value(dispatch(&pipeline, json!({"action": "selfDestruct"})).await).unwrap();
        assert_eq!(reply["success"], false);
        assert!(reply["error"].as_str().unwrap().starts_with("unrecognized message"));

        let reply = serde_json::to_value(dispatch(&pipeline, json!({"action": "get1nsyt"})).await).unwrap();
        assert_eq!(reply["success"], false);
    }

    #[tokio::test]
    async fn test_get_then_clear() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"summary": "S", "starters": ["a"]}})),
            )
            .mount(&server)
            .await;
        let pipeline = pipeline(&server).await;

        let reply = dispatch(
            &pipeline,
            json!({"action": "get1nsyt", "profileUrl": "https://x/in/a", "profileData": {"name": "A", "title": "T"}}),
        )
        .await;
        let Response::Insight(insight) = reply else { panic!("expected insight reply") };
        assert_eq!(insight.data, Some(GenerationResult { summary: "S".into(), starters: vec!["a".into()] }));

        let stats = serde_json::to_value(dispatch(&pipeline, json!({"action": "cacheStats"})).await).unwrap();
        assert_eq!(stats["stats"]["count"], 1);

        let cleared = serde_json::to_value(dispatch(&pipeline, json!({"action": "clearCache"})).await).unwrap();
        assert_eq!(cleared, json!({"success": true, "count": 1}));
    }

    #[tokio::test]
    async fn test_health_check_reply() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;
        let pipeline = pipeline(&server).await;

        let reply = serde_json::to_value(dispatch(&pipeline, json!({"action": "healthCheck"})).await).unwrap();
        assert_eq!(reply, json!({"success": true, "healthy": true}));
    }

    #[tokio::test]
    async fn test_invalidate_reply() {
        let server = MockServer::start().await;
        let pipeline = pipeline(&server).await;

        let reply = serde_json::to_value(dispatch(&pipeline, json!({"action": "invalidate", "profileUrl": "u"})).await)
            .unwrap();
        assert_eq!(reply, json!({"success": true}));
    }
}
