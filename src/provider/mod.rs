use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ProviderConfig, build_provider};
use crate::error::ImproveError;
use crate::http::DynHttpTransport;
use crate::prompt::PromptTemplate;

pub mod chat_completions;
pub mod text_generation;

/// Sampling temperature sent to every backend.
pub(crate) const TEMPERATURE: f32 = 0.7;
/// Completion length cap sent to every backend.
pub(crate) const MAX_TOKENS: u32 = 150;

/// 统一的 Provider Trait 所有后端实现该接口即可接入
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// 发送 prompt 并返回最佳补全的原始文本 只发起一次 HTTP 请求
    async fn complete(&self, prompt: &str) -> Result<String, ImproveError>;

    /// 面向用户的供应商名称
    fn name(&self) -> &'static str;
}

/// 线程安全 Provider
pub type DynProvider = Arc<dyn CompletionProvider>;

/// Renders the prompt for `text` and sends it to the backend selected by `config`.
///
/// Provider selection and credential checks happen before any network activity, so an
/// unsupported provider or a missing API key never reaches the transport. Exactly one
/// request is issued otherwise; there is no retry and no fallback to another backend.
///
/// # Errors
///
/// * [`ImproveError::Config`] for an unknown provider or missing API key.
/// * [`ImproveError::Provider`] for non-2xx statuses and empty completions.
/// * [`ImproveError::Transport`] when the request never got an answer.
pub async fn dispatch(
    transport: DynHttpTransport,
    text: &str,
    config: &ProviderConfig,
    template: &PromptTemplate,
) -> Result<String, ImproveError> {
    let provider = build_provider(config, transport)?;
    let prompt = template.render(text);
    tracing::debug!(
        provider = provider.name(),
        prompt_len = prompt.len(),
        "dispatching completion"
    );
    provider.complete(&prompt).await
}
