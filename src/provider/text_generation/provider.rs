use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ImproveError;
use crate::http::{DynHttpTransport, post_json_with_headers};
use crate::provider::{CompletionProvider, MAX_TOKENS, TEMPERATURE};

use super::error::parse_generation_error;
use super::types::{GenerationParameters, GenerationRequest, GenerationResponse};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const LABEL: &str = "Hugging Face";

/// Hugging Face Inference API provider; the model is part of the URL path.
pub struct TextGenerationProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) model: String,
}

impl TextGenerationProvider {
    pub fn new(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model id such as `mistralai/Mistral-7B-Instruct-v0.2`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let model = self.model.trim_matches('/');
        format!("{base}/{model}")
    }

    fn build_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            ),
            ("Accept".to_string(), "application/json".to_string()),
        ])
    }
}

/// Generation endpoints may echo the prompt ahead of the completion.
fn strip_prompt_echo(generated: String, prompt: &str) -> String {
    match generated.strip_prefix(prompt) {
        Some(rest) => rest.to_string(),
        None => generated,
    }
}

#[async_trait]
impl CompletionProvider for TextGenerationProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ImproveError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            },
        };
        let response = post_json_with_headers(
            self.transport.as_ref(),
            self.endpoint(),
            self.build_headers(),
            &body,
        )
        .await?;

        let status = response.status;
        let success = response.is_success();
        let text = response.into_string()?;
        if !success {
            return Err(parse_generation_error(LABEL, status, &text));
        }

        let parsed: GenerationResponse =
            serde_json::from_str(&text).map_err(|err| ImproveError::Provider {
                provider: LABEL,
                status: Some(status),
                message: format!("failed to parse {LABEL} response: {err}"),
            })?;

        parsed
            .into_first_text()
            .map(|generated| strip_prompt_echo(generated, prompt))
            .filter(|generated| !generated.trim().is_empty())
            .ok_or_else(|| ImproveError::empty_completion(LABEL))
    }

    fn name(&self) -> &'static str {
        LABEL
    }
}
