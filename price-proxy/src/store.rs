use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::prelude::*;

/// Key-value records with per-record expiry, backing the feedback and premium
/// activation endpoints.
pub struct Store {
    connection: Mutex<Connection>,
}

impl Store {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let connection = Connection::open(path)
            .with_context(|| format!("failed to open the store at `{}`", path.display()))?;
        Self::initialize(connection)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> Result<Self> {
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS records (
                    key        TEXT PRIMARY KEY,
                    value      TEXT NOT NULL,
                    expires_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS ix_records_expires_at ON records (expires_at);",
            )
            .context("failed to initialize the store schema")?;
        Ok(Self { connection: Mutex::new(connection) })
    }

    pub fn put(&self, key: &str, value: &serde_json::Value, time_to_live: TimeDelta) -> Result {
        let now = Utc::now();
        let connection = self.connection()?;
        // Expired records are reaped lazily on each write.
        connection
            .execute("DELETE FROM records WHERE expires_at <= ?1", params![now])
            .context("failed to purge expired records")?;
        connection
            .execute(
                "INSERT OR REPLACE INTO records (key, value, expires_at) VALUES (?1, ?2, ?3)",
                params![key, value.to_string(), now + time_to_live],
            )
            .with_context(|| format!("failed to store `{key}`"))?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let row = self
            .connection()?
            .query_row(
                "SELECT value, expires_at FROM records WHERE key = ?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, DateTime<Utc>>(1)?)),
            )
            .optional()
            .with_context(|| format!("failed to read `{key}`"))?;
        match row {
            Some((value, expires_at)) if expires_at > Utc::now() => {
                Ok(Some(serde_json::from_str(&value).context("malformed stored record")?))
            }
            _ => Ok(None),
        }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection.lock().map_err(|_| anyhow!("the store lock is poisoned"))
    }
}
