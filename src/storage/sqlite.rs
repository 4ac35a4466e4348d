//! SQLite-backed [`KeyValueStore`].
//!
//! Each namespace is one row in `kv_store`; the value column holds the
//! sequence as a JSON array. The schema is applied inline via
//! `include_str!` on open.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::trace;

use super::{KeyValueStore, StorageError};

const SCHEMA_SQL: &str = include_str!("../../migrations/001_kv_store.sql");

/// Durable key-value store in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema fails.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create storage directory {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .pragma("trusted_schema", "OFF");

        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open storage db at {}", path.display()))?;

        Self::from_pool(pool)
            .await
            .context("failed to apply kv_store schema")
    }

    /// Wrap an existing pool, applying the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if the schema cannot be applied.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for connections to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE namespace = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((raw,)) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Malformed {
                    key: key.to_owned(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[String]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(StorageError::Encode)?;
        sqlx::query(
            "INSERT INTO kv_store (namespace, value) VALUES (?1, ?2) \
             ON CONFLICT(namespace) DO UPDATE SET value = excluded.value, \
             updated_at = datetime('now')",
        )
        .bind(key)
        .bind(&encoded)
        .execute(&self.pool)
        .await?;
        trace!(key, entries = value.len(), "namespace stored");
        Ok(())
    }
}
