use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ImproveError;
use crate::http::{DynHttpTransport, post_json_with_headers};
use crate::provider::{CompletionProvider, MAX_TOKENS, TEMPERATURE};

use super::error::parse_chat_error;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Chat Completions backend. OpenAI and Groq differ only in host, default model and
/// label, so both are served by this type.
pub struct ChatCompletionsProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) label: &'static str,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) model: String,
}

impl ChatCompletionsProvider {
    /// OpenAI at `https://api.openai.com/v1` with `gpt-4o-mini`.
    pub fn openai(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            label: "OpenAI",
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: OPENAI_DEFAULT_MODEL.to_string(),
        }
    }

    /// Groq's OpenAI-compatible endpoint with `llama-3.1-8b-instant`.
    pub fn groq(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            label: "Groq",
            base_url: GROQ_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: GROQ_DEFAULT_MODEL.to_string(),
        }
    }

    /// Points the provider at a proxy or compatible gateway.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/chat/completions")
        } else {
            format!("{base}/v1/chat/completions")
        }
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        );
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ImproveError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
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
            return Err(parse_chat_error(self.label, status, &text));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|err| ImproveError::Provider {
                provider: self.label,
                status: Some(status),
                message: format!("failed to parse {} response: {err}", self.label),
            })?;

        parsed
            .into_first_content()
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ImproveError::empty_completion(self.label))
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};

    use super::*;
    use crate::http::{HttpRequest, HttpResponse, HttpTransport};

    /// Replays a canned response and keeps the request for inspection.
    struct CannedTransport {
        status: u16,
        body: String,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: Value) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ImproveError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone().into_bytes(),
            })
        }
    }

    #[test]
    fn endpoint_appends_v1_when_missing() {
        let transport = CannedTransport::new(200, json!({}));
        let provider = ChatCompletionsProvider::openai(transport, "k");
        assert_eq!(
            provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );

        let transport = CannedTransport::new(200, json!({}));
        let provider =
            ChatCompletionsProvider::groq(transport, "k").with_base_url("http://localhost:8080/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn complete_sends_chat_body_and_reads_first_choice() {
        let transport = CannedTransport::new(
            200,
            json!({
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "Cut costs by 20%"}},
                    {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
                ]
            }),
        );
        let provider = ChatCompletionsProvider::groq(transport.clone(), "gsk-test");

        let text = provider.complete("rewrite me").await.expect("completion");
        assert_eq!(text, "Cut costs by 20%");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(
            request.url,
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer gsk-test")
        );
        let body: Value = serde_json::from_slice(&request.body).expect("json body");
        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "rewrite me");
        assert_eq!(body["max_tokens"], 150);
        assert!(body["temperature"].is_number());
    }

    #[tokio::test]
    async fn missing_content_is_reported_as_no_response() {
        let transport = CannedTransport::new(200, json!({"choices": []}));
        let provider = ChatCompletionsProvider::openai(transport, "k");
        let err = provider.complete("p").await.expect_err("should fail");
        assert_eq!(err.to_string(), "No response from OpenAI");

        let transport = CannedTransport::new(
            200,
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
        );
        let provider = ChatCompletionsProvider::openai(transport, "k");
        let err = provider.complete("p").await.expect_err("should fail");
        assert_eq!(err.to_string(), "No response from OpenAI");
    }
}
