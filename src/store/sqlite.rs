use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use super::Store;
use crate::error::Result;

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

/// SQLite-backed store: one row per key.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) the database at `path`, creating parent directories.
  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      if let Err(e) = std::fs::create_dir_all(parent) {
        tracing::warn!("Could not create {}: {}", parent.display(), e);
      }
    }
    let conn = Connection::open(path)?;
    Self::with_connection(conn)
  }

  pub fn in_memory() -> Result<Self> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn.execute_batch(
      r#"
      CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
      );
      "#,
    )?;
    Ok(Self { conn })
  }

  /// All stored keys, sorted.
  pub fn keys(&self) -> Result<Vec<String>> {
    let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

impl Store for SqliteStore {
  fn load(&self, key: &str) -> Result<Option<String>> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::StoreOp {
      operation: "load".into(),
      key: key.into(),
    });

    let value = self
      .conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn save(&mut self, key: &str, value: &str) -> Result<()> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::StoreOp {
      operation: "save".into(),
      key: key.into(),
    });

    self.conn.execute(
      "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
      params![key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<()> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::StoreOp {
      operation: "remove".into(),
      key: key.into(),
    });

    self
      .conn
      .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(())
  }
}
