//! Best-effort persistence of improved bullets.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;

pub mod sqlite;

/// One input/output pair produced by a successful improvement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovementRecord {
    pub input_text: String,
    pub output_text: String,
}

impl ImprovementRecord {
    pub fn new(input_text: impl Into<String>, output_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            output_text: output_text.into(),
        }
    }
}

/// Insert-only sink for improvement records.
#[async_trait]
pub trait ImprovementStore: Send + Sync {
    /// Persists a single record.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the insert fails. Callers log it and move on.
    async fn record(&self, record: &ImprovementRecord) -> Result<(), StorageError>;
}

/// Thread-safe store handle, created once and injected where needed.
pub type DynStore = Arc<dyn ImprovementStore>;
