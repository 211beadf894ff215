//! Records exchanged between the extension, the host and the generator backend.
//!
//! Field names serialize in camelCase so that persisted entries and responses
//! keep the shapes the extension's scripts already read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, the timestamp unit used on the wire.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Profile signals gathered from the feed or from a background scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ProfileData {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self { name: name.into(), title: title.into(), ..Default::default() }
    }

    /// Overlay scraped fields on top of the basic ones.
    ///
    /// Fields the page did not yield keep whatever the basic record had.
    pub fn merged_with(self, scraped: &ScrapedProfile) -> Self {
        Self {
            name: scraped.name.clone().unwrap_or(self.name),
            title: scraped.title.clone().unwrap_or(self.title),
            location: scraped.location.clone().or(self.location),
            company: scraped.company.clone().or(self.company),
        }
    }
}

/// Result of scraping a profile page in a hidden view.
///
/// Every field the page did not carry is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProfile {
    pub name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    /// Final URL of the view after redirects.
    pub profile_url: String,
    /// Epoch milliseconds.
    pub scraped_at: i64,
}

/// Summary and conversation starters produced by the generator backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationResult {
    pub summary: String,
    pub starters: Vec<String>,
}

/// Token accounting reported by the backend alongside a generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default, alias = "prompt_tokens")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, alias = "completion_tokens")]
    pub completion_tokens: Option<u64>,
    #[serde(default, alias = "total_tokens")]
    pub total_tokens: Option<u64>,
}

/// Bookkeeping stored next to every cached insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    pub cached: bool,
    /// Creation time, epoch milliseconds.
    #[serde(rename = "timestamp")]
    pub created_at: i64,
    /// Always `created_at + ttl`.
    pub expires_at: i64,
    /// Version of the host that wrote the entry.
    #[serde(rename = "version")]
    pub schema_version: String,
}

/// A persisted insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub profile_data: ProfileData,
    pub result: GenerationResult,
    pub metadata: CacheMetadata,
}

impl CacheEntry {
    /// Entries stay valid up to and including `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.metadata.expires_at
    }
}

/// Aggregate view over the insight namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub count: u64,
    /// Approximate bytes used by the whole storage area.
    pub estimated_size: u64,
    /// Oldest `created_at` among cached insights.
    pub oldest: Option<i64>,
    /// Newest `created_at` among cached insights.
    pub newest: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped() -> ScrapedProfile {
        ScrapedProfile {
            name: Some("Alice Liddell".into()),
            title: Some("Staff Engineer".into()),
            location: None,
            company: Some("Wonderland".into()),
            profile_url: "https://x/in/alice".into(),
            scraped_at: 1,
        }
    }

    #[test]
    fn test_merge_prefers_scraped_fields() {
        let basic =
            ProfileData { location: Some("Oxford".into()), company: Some("Old Co".into()), ..ProfileData::new("Alice", "Eng") };
        let merged = basic.merged_with(&scraped());

        assert_eq!(merged.name, "Alice Liddell");
        assert_eq!(merged.title, "Staff Engineer");
        assert_eq!(merged.location.as_deref(), Some("Oxford"));
        assert_eq!(merged.company.as_deref(), Some("Wonderland"));
    }

    #[test]
    fn test_merge_keeps_basic_fields_the_page_lacked() {
        let bare = ScrapedProfile { name: None, title: None, company: None, ..scraped() };
        let merged = ProfileData::new("Alice", "Eng").merged_with(&bare);

        assert_eq!(merged, ProfileData::new("Alice", "Eng"));
    }

    #[test]
    fn test_cache_entry_wire_shape() {
        let entry = CacheEntry {
            profile_data: ProfileData::new("Alice", "Eng"),
            result: GenerationResult { summary: "S".into(), starters: vec!["a".into()] },
            metadata: CacheMetadata { cached: true, created_at: 10, expires_at: 20, schema_version: "0.1.0".into() },
        };
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["profileData"]["name"], "Alice");
        assert_eq!(json["metadata"]["timestamp"], 10);
        assert_eq!(json["metadata"]["expiresAt"], 20);
        assert_eq!(json["metadata"]["version"], "0.1.0");
        assert!(json["profileData"].get("location").is_none());
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let entry = CacheEntry {
            profile_data: ProfileData::default(),
            result: GenerationResult::default(),
            metadata: CacheMetadata { cached: true, created_at: 0, expires_at: 100, schema_version: String::new() },
        };
        assert!(!entry.is_expired_at(100));
        assert!(entry.is_expired_at(101));
    }

    #[test]
    fn test_usage_accepts_snake_case() {
        let usage: Usage = serde_json::from_str(r#"{"prompt_tokens":12,"total_tokens":40}"#).unwrap();
        assert_eq!(usage.prompt_tokens, Some(12));
        assert_eq!(usage.completion_tokens, None);
        assert_eq!(usage.total_tokens, Some(40));
    }
}
