//! OpenAI-style Chat Completions backends (OpenAI and Groq).

mod error;
mod provider;
mod types;

pub use provider::ChatCompletionsProvider;
