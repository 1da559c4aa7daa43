//! Single-line resume bullet rewriting over hosted LLM providers.

pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod service;
pub mod storage;

pub use config::{ProviderConfig, ProviderKind};
pub use error::{ImproveError, StorageError};
pub use normalize::normalize;
pub use prompt::PromptTemplate;
pub use provider::{CompletionProvider, DynProvider, dispatch};
pub use service::{ImprovementRequest, ImprovementResult, ImprovementService};
pub use storage::{DynStore, ImprovementRecord, ImprovementStore};
