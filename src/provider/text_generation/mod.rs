//! Hugging Face Inference text-generation backend.

mod error;
mod provider;
mod types;

pub use provider::TextGenerationProvider;
