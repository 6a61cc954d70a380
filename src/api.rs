use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Payload sent by the WordPress webhook.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RevalidationRequest {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_content_id")]
    pub content_id: Option<String>,
}

impl RevalidationRequest {
    /// Reads the payload fields from a JSON body.
    ///
    /// A body that is valid JSON but not an object carries no fields, so it
    /// reads as an empty request rather than binding positionally.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<serde_json::Value>(body)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Ok(RevalidationRequest::default()),
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref().filter(|s| !s.is_empty())
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }
}

// Ids arrive as strings or numbers depending on the plugin; empty and zero count as absent.
fn deserialize_content_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Text(s)) if !s.is_empty() => Some(s),
        Some(RawId::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(msg: &str) -> Self {
        MessageResponse {
            message: msg.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RevalidationResult {
    pub revalidated: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl RevalidationResult {
    pub fn succeeded(message: String) -> Self {
        RevalidationResult {
            revalidated: true,
            message,
            error: None,
            timestamp: timestamp(),
        }
    }

    pub fn failed(message: &str, error: String) -> Self {
        RevalidationResult {
            revalidated: false,
            message: message.to_owned(),
            error: Some(error),
            timestamp: timestamp(),
        }
    }
}

/// Body for failures that happen before revalidation starts.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub message: String,
    pub error: String,
    pub timestamp: String,
}

impl ErrorReport {
    pub fn new(message: &str, error: String) -> Self {
        ErrorReport {
            message: message.to_owned(),
            error,
            timestamp: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
