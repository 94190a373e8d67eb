//! Credential record types and provider identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Providers that require an API credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Script translation (also used for video composition).
    Translation,
    /// Text-to-speech voice synthesis.
    SpeechSynthesis,
}

impl Provider {
    /// All known providers, in a stable order.
    pub const ALL: [Provider; 2] = [Provider::Translation, Provider::SpeechSynthesis];

    /// Stable name used in API paths and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Translation => "translation",
            Provider::SpeechSynthesis => "speech-synthesis",
        }
    }

    /// Key under which this provider's pool is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Provider::Translation => "credentials/translation",
            Provider::SpeechSynthesis => "credentials/speech-synthesis",
        }
    }

    /// Parse a provider from its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "translation" => Some(Provider::Translation),
            "speech-synthesis" => Some(Provider::SpeechSynthesis),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API key in a provider's pool.
///
/// This type is also the persisted form: pools are stored as JSON arrays of
/// these records, in pool order, and any consumer of that storage must
/// preserve field names and array order on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// Unique within the pool, assigned at creation, never reused.
    pub id: String,
    /// Human-readable label, not required to be unique.
    pub display_name: String,
    /// The API secret. Empty until the user fills it in.
    pub secret: String,
    /// Disabled records are skipped by selection but kept in the pool.
    pub enabled: bool,
    /// Set after each successful call made with this record.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Create a fresh record: enabled, empty secret, never used.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            display_name: display_name.into(),
            secret: String::new(),
            enabled: true,
            last_used_at: None,
        }
    }
}

/// Partial update applied to an existing record. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialUpdate {
    pub display_name: Option<String>,
    pub secret: Option<String>,
    pub enabled: Option<bool>,
}

/// Decode a stored timestamp, treating anything unparseable as absent.
///
/// Stored pools may carry timestamps written by older builds or edited by
/// hand; a bad value must not fail the whole pool load.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
