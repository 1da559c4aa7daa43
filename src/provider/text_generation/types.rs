use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct GenerationRequest<'a> {
    pub(crate) inputs: &'a str,
    pub(crate) parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationParameters {
    pub(crate) max_new_tokens: u32,
    pub(crate) temperature: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratedText {
    #[serde(default)]
    pub(crate) generated_text: Option<String>,
}

/// Most models answer with a list; a few deployments return the bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl GenerationResponse {
    /// `[0].generated_text`
    pub(crate) fn into_first_text(self) -> Option<String> {
        match self {
            Self::Batch(items) => items.into_iter().next()?.generated_text,
            Self::Single(item) => item.generated_text,
        }
    }
}
