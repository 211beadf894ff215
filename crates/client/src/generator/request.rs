//! Generator request payload.

use insyt_core::ProfileData;
use serde::{Deserialize, Serialize};

const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_TITLE: &str = "No title available";

/// Body of `POST /api/1nsyt`.
///
/// `location` is always present and `null` when unknown. Blank names and
/// titles are sent as the same placeholders the extension shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub name: String,
    pub title: String,
    pub location: Option<String>,
}

impl From<&ProfileData> for GenerateRequest {
    fn from(profile: &ProfileData) -> Self {
        Self {
            name: or_placeholder(&profile.name, UNKNOWN_NAME),
            title: or_placeholder(&profile.title, UNKNOWN_TITLE),
            location: profile.location.clone(),
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() { placeholder.to_string() } else { value.to_string() }
}
