use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ImproveError;
use crate::http::DynHttpTransport;
use crate::provider::DynProvider;
use crate::provider::chat_completions::ChatCompletionsProvider;
use crate::provider::text_generation::TextGenerationProvider;

/// 供应商类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI Chat Completions
    OpenAi,
    /// Groq 的 OpenAI 兼容 Chat Completions
    Groq,
    /// Hugging Face Inference 文本生成
    HuggingFace,
}

impl ProviderKind {
    /// 配置中使用的标识
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::HuggingFace => "huggingface",
        }
    }

    /// 面向用户的名称 出现在错误信息里
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Groq => "Groq",
            Self::HuggingFace => "Hugging Face",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ImproveError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            _ => Err(ImproveError::config(format!(
                "Unsupported provider: {value}"
            ))),
        }
    }
}

/// 一次调用所需的供应商配置
///
/// `provider` 保留原始字符串 直到调用时才解析 以便未知取值在发起网络请求前报错
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub provider: String,
    pub api_key: Option<String>,
    /// 覆盖默认模型
    pub model: Option<String>,
    /// 覆盖默认 base_url 例如代理地址
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: Some(api_key.into()),
            model: None,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 解析供应商类型
    pub fn kind(&self) -> Result<ProviderKind, ImproveError> {
        self.provider.parse()
    }

    /// 返回非空的 API Key
    pub fn require_api_key(&self) -> Result<&str, ImproveError> {
        let label = self
            .kind()
            .map(|kind| kind.label())
            .unwrap_or("the selected provider");
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ImproveError::config(format!("Missing API key for {label}")))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// 根据配置构建 Provider 不会发起任何网络请求
pub fn build_provider(
    config: &ProviderConfig,
    transport: DynHttpTransport,
) -> Result<DynProvider, ImproveError> {
    let kind = config.kind()?;
    let api_key = config.require_api_key()?.to_string();

    let provider: DynProvider = match kind {
        ProviderKind::OpenAi | ProviderKind::Groq => {
            let mut provider = if kind == ProviderKind::OpenAi {
                ChatCompletionsProvider::openai(transport, api_key)
            } else {
                ChatCompletionsProvider::groq(transport, api_key)
            };
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone());
            }
            Arc::new(provider)
        }
        ProviderKind::HuggingFace => {
            let mut provider = TextGenerationProvider::new(transport, api_key);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if let Some(model) = &config.model {
                provider = provider.with_model(model.clone());
            }
            Arc::new(provider)
        }
    };

    Ok(provider)
}
