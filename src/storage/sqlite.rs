use async_trait::async_trait;
use libsql::{Builder, Connection, Database};

use crate::error::StorageError;

use super::{ImprovementRecord, ImprovementStore};

const IN_MEMORY: &str = ":memory:";

const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS improvements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    input_text TEXT NOT NULL,
    output_text TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// Local SQLite-compatible store backed by libSQL.
pub struct LibsqlStore {
    // The database must outlive its connection, notably for `:memory:`.
    _db: Database,
    conn: Connection,
}

impl LibsqlStore {
    /// Opens (or creates) the database file at `path` and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] or [`StorageError::Schema`].
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StorageError::Open {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        let conn = db.connect().map_err(|e| StorageError::Open {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        conn.execute_batch(CREATE_SCHEMA)
            .await
            .map_err(|e| StorageError::Schema {
                message: e.to_string(),
            })?;

        tracing::debug!(path, "improvement store ready");
        Ok(Self { _db: db, conn })
    }

    /// Opens a throwaway in-memory database.
    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::open(IN_MEMORY).await
    }
}

#[async_trait]
impl ImprovementStore for LibsqlStore {
    async fn record(&self, record: &ImprovementRecord) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO improvements (input_text, output_text) VALUES (?1, ?2)",
                [record.input_text.clone(), record.output_text.clone()],
            )
            .await
            .map_err(|e| StorageError::Query {
                operation: "insert improvement",
                message: e.to_string(),
            })?;
        Ok(())
    }
}
