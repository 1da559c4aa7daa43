//! The request pipeline: validate, dispatch, normalize, record.

use serde::Serialize;

use crate::config::ProviderConfig;
use crate::error::ImproveError;
use crate::http::DynHttpTransport;
use crate::normalize::normalize;
use crate::prompt::PromptTemplate;
use crate::provider::dispatch;
use crate::storage::{DynStore, ImprovementRecord};

/// A validated input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovementRequest {
    text: String,
}

impl ImprovementRequest {
    /// Trims `text` and rejects it when nothing is left.
    ///
    /// # Examples
    ///
    /// ```
    /// use bullet_forge::ImprovementRequest;
    ///
    /// assert_eq!(ImprovementRequest::new("  Led a team ").unwrap().text(), "Led a team");
    /// assert!(ImprovementRequest::new(" \n ").is_err());
    /// ```
    pub fn new(text: &str) -> Result<Self, ImproveError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ImproveError::validation(
                "inputText must be a non-empty string",
            ));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Outcome of one improvement: either the cleaned text or a single error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImprovementResult {
    Improved { text: String },
    Failed { error: String },
}

impl From<Result<String, ImproveError>> for ImprovementResult {
    fn from(result: Result<String, ImproveError>) -> Self {
        match result {
            Ok(text) => Self::Improved { text },
            Err(err) => Self::Failed {
                error: err.to_string(),
            },
        }
    }
}

/// Runs improvements against one configured provider.
///
/// Holds no mutable state, so a single instance can serve concurrent requests.
pub struct ImprovementService {
    transport: DynHttpTransport,
    config: ProviderConfig,
    template: PromptTemplate,
    store: Option<DynStore>,
}

impl ImprovementService {
    pub fn new(transport: DynHttpTransport, config: ProviderConfig) -> Self {
        Self {
            transport,
            config,
            template: PromptTemplate::default(),
            store: None,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Attaches the sink that receives every successful input/output pair.
    pub fn with_store(mut self, store: DynStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Improves one line of text.
    ///
    /// Empty input, an unsupported provider or a missing key are rejected before any
    /// network call. A storage failure is logged and does not affect the result.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImproveError`] raised by validation or the provider.
    pub async fn improve(&self, input: &str) -> Result<String, ImproveError> {
        let request = ImprovementRequest::new(input)?;
        let kind = self.config.kind()?;

        let raw = dispatch(
            self.transport.clone(),
            request.text(),
            &self.config,
            &self.template,
        )
        .await?;

        let text = normalize(&raw);
        if text.is_empty() {
            return Err(ImproveError::empty_completion(kind.label()));
        }
        tracing::info!(
            provider = kind.as_str(),
            input_len = request.text().len(),
            output_len = text.len(),
            "improved bullet"
        );

        if let Some(store) = &self.store {
            let record = ImprovementRecord::new(request.text(), text.as_str());
            if let Err(err) = store.record(&record).await {
                tracing::warn!(error = %err, "failed to store improvement");
            }
        }

        Ok(text)
    }

    /// Same as [`Self::improve`] but folds the outcome into an [`ImprovementResult`].
    pub async fn run(&self, input: &str) -> ImprovementResult {
        self.improve(input).await.into()
    }
}
