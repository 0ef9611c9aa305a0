//! Storage layer for suraksha.
//!
//! Everything the app persists lives in a string-keyed key-value store. This
//! module defines the [`KeyValueStore`] trait, an `SQLite`-backed
//! implementation for on-device persistence, an in-memory implementation,
//! and the [`ReportStore`] that keeps the report list under a single key.

mod memory;
pub mod migrations;
mod reports;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::config::{Config, StorageBackend};
use crate::error::{Error, Result};

pub use memory::MemoryStore;
pub use reports::{ReportStore, REPORTS_KEY};

/// An asynchronous string-keyed store.
///
/// This is the only persistence primitive the rest of the crate relies on:
/// get, set and remove a string value under a string key.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend fails.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend fails.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend fails.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Reject keys no backend should accept.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::storage("key cannot be empty"));
    }
    if key.contains('\0') {
        return Err(Error::storage("key cannot contain null bytes"));
    }
    Ok(())
}

/// Open the key-value backend selected by the configuration.
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened.
pub fn open_backend(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match config.storage.backend {
        StorageBackend::Sqlite => Ok(Arc::new(SqliteStore::open(config.database_path())?)),
        StorageBackend::Memory => {
            debug!("Using in-memory storage; nothing will be persisted");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// `SQLite`-backed key-value store.
///
/// One row per key in the `kv` table. The connection is guarded by a mutex so
/// the store can be shared between tasks.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("database connection lock poisoned"))
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let conn = self.conn()?;

        let (total_keys, total_value_bytes): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0) FROM kv",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let last_write: Option<String> = conn
            .query_row(
                "SELECT updated_at FROM kv ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        drop(conn);

        let last_write = last_write
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_keys,
            total_value_bytes,
            last_write,
            db_size_bytes,
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let updated_at = Utc::now().to_rfc3339();
        self.conn()?.execute(
            r"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        debug!("Wrote {} bytes under key {}", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let affected = self.conn()?.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }
}

/// Statistics about the key-value database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of keys stored.
    pub total_keys: i64,
    /// Combined size of all stored values in bytes.
    pub total_value_bytes: i64,
    /// Time of the most recent write.
    pub last_write: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
