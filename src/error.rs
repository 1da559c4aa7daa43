use thiserror::Error;

/// Aggregates every failure mode of the improvement pipeline.
///
/// The `Display` output of each variant is the bare human-readable message, so it can
/// be handed to an end user as-is without leaking internal identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImproveError {
    /// Input text was missing or empty after trimming.
    #[error("{message}")]
    Validation { message: String },
    /// Credentials, provider selection or prompt template are unusable.
    #[error("{message}")]
    Config { message: String },
    /// The provider answered with a failure status or an empty completion.
    #[error("{message}")]
    Provider {
        /// Display label of the provider, such as `OpenAI`.
        provider: &'static str,
        /// HTTP status when the failure came from a non-2xx response.
        status: Option<u16>,
        /// Provider's own message when parseable, otherwise a generic one.
        message: String,
    },
    /// DNS, connection, TLS or timeout failures raised by the HTTP client.
    #[error("{message}")]
    Transport { message: String },
}

impl ImproveError {
    /// Creates an [`ImproveError::Validation`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bullet_forge::error::ImproveError;
    ///
    /// let err = ImproveError::validation("inputText must be a non-empty string");
    /// assert_eq!(err.to_string(), "inputText must be a non-empty string");
    /// ```
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an [`ImproveError::Config`].
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an [`ImproveError::Transport`] from the underlying client message.
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an [`ImproveError::Provider`] that is not tied to an HTTP status.
    ///
    /// # Examples
    ///
    /// ```
    /// use bullet_forge::error::ImproveError;
    ///
    /// let err = ImproveError::provider("Groq", "No response from Groq");
    /// assert!(matches!(err, ImproveError::Provider { provider: "Groq", status: None, .. }));
    /// ```
    pub fn provider<T: Into<String>>(provider: &'static str, message: T) -> Self {
        Self::Provider {
            provider,
            status: None,
            message: message.into(),
        }
    }

    /// Failure raised when a provider returns no usable completion text.
    pub fn empty_completion(provider: &'static str) -> Self {
        Self::provider(provider, format!("No response from {provider}"))
    }

    /// Returns `true` for failures that happened while talking to the provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Transport { .. })
    }
}

/// Failures reported by the persistence sink. Logged, never shown to end users.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open database at {path}: {message}")]
    Open { path: String, message: String },
    #[error("failed to initialize schema: {message}")]
    Schema { message: String },
    #[error("{operation} failed: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },
}

/// Canonical reason phrase for an HTTP status, e.g. `Internal Server Error`.
pub(crate) fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = ImproveError::Provider {
            provider: "OpenAI",
            status: Some(500),
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(
            ImproveError::config("Unsupported provider: foo").to_string(),
            "Unsupported provider: foo"
        );
    }

    #[test]
    fn provider_failures_include_transport() {
        assert!(ImproveError::transport("connection reset").is_provider_failure());
        assert!(ImproveError::empty_completion("Groq").is_provider_failure());
        assert!(!ImproveError::validation("empty").is_provider_failure());
        assert!(!ImproveError::config("missing key").is_provider_failure());
    }

    #[test]
    fn empty_completion_names_the_provider() {
        assert_eq!(
            ImproveError::empty_completion("Hugging Face").to_string(),
            "No response from Hugging Face"
        );
    }

    #[test]
    fn status_text_uses_reason_phrase() {
        assert_eq!(status_text(500), "Internal Server Error");
        assert_eq!(status_text(429), "Too Many Requests");
        assert_eq!(status_text(599), "status 599");
    }
}
