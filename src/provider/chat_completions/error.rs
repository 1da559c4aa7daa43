use serde::Deserialize;

use crate::error::{ImproveError, status_text};

/// Maps a non-2xx Chat Completions response to a provider error.
///
/// Both OpenAI and Groq wrap failures as `{"error": {"message": ...}}`. The message is
/// surfaced verbatim; anything unparseable falls back to the status reason phrase.
pub(crate) fn parse_chat_error(provider: &'static str, status: u16, body: &str) -> ImproveError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<InnerError>,
    }
    #[derive(Deserialize)]
    struct InnerError {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("{provider} API error: {}", status_text(status)));

    ImproveError::Provider {
        provider,
        status: Some(status),
        message,
    }
}
