//! Storage keys for cached insights.

/// Namespace shared by every cached insight.
pub const CACHE_PREFIX: &str = "1nsyt:";

/// Storage key for a profile identifier.
///
/// The URL is used verbatim: query strings, tracking parameters and trailing
/// slashes all produce distinct keys.
pub fn cache_key(profile_url: &str) -> String {
    format!("{CACHE_PREFIX}{profile_url}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(cache_key("https://x/in/alice"), "1nsyt:https://x/in/alice");
    }

    #[test]
    fn test_key_is_not_normalized() {
        assert_ne!(cache_key("https://x/in/alice"), cache_key("https://x/in/alice/"));
        assert_ne!(cache_key("https://x/in/alice"), cache_key("https://x/in/alice?trk=feed"));
        assert_ne!(cache_key("https://x/in/alice"), cache_key("https://x/in/Alice"));
    }
}
