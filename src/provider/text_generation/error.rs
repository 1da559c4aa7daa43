use serde::Deserialize;
use serde_json::Value;

use crate::error::{ImproveError, status_text};

/// Maps a non-2xx Inference API response to a provider error.
///
/// The API reports `{"error": "..."}`, occasionally `{"error": ["...", ...]}`.
pub(crate) fn parse_generation_error(
    provider: &'static str,
    status: u16,
    body: &str,
) -> ImproveError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<Value>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| match error {
            Value::String(message) => Some(message),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("{provider} API error: {}", status_text(status)));

    ImproveError::Provider {
        provider,
        status: Some(status),
        message,
    }
}
