//! cache_stats tool implementation.

use insyt_core::InsightCache;
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::json_result;

/// Implementation of the cache_stats tool.
pub async fn stats_impl(cache: &InsightCache) -> Result<CallToolResult, McpError> {
    let stats = cache.stats().await?;
    json_result(&stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{cache, text_of};
    use insyt_core::{CacheStats, GenerationResult, ProfileData};

    #[tokio::test]
    async fn test_stats_reports_count() {
        let cache = cache().await;
        cache
            .put_at("https://x/in/a", &ProfileData::new("A", "T"), &GenerationResult::default(), 1_000)
            .await
            .unwrap();

        let result = stats_impl(&cache).await.unwrap();
        let stats: CacheStats = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.oldest, Some(1_000));
    }
}
