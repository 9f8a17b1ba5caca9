//! Key-value persistence for folders, entries and practice analytics.
//!
//! Every value is a JSON document stored under one of the keys below.

pub mod memory;
pub mod records;
pub mod sqlite;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

pub use memory::MemoryStore;
pub use records::{
  normalize_entries, normalize_entry, normalize_folders, normalize_history, normalize_streak,
  normalize_study_time,
};
pub use sqlite::SqliteStore;

pub const FOLDER_LIST_KEY: &str = "fmapp_folder_list_v1";
/// Entries of the default folder live under the historical key
pub const DEFAULT_ENTRIES_KEY: &str = "fmapp_savedEntries_v1";
pub const HISTORY_KEY: &str = "fmapp_practice_history_v1";
pub const STREAK_KEY: &str = "fmapp_streak_v1";
pub const STUDY_TIME_KEY: &str = "fmapp_study_time_v1";

pub const DEFAULT_FOLDER: &str = "default";

/// Storage key holding a folder's entries.
pub fn entries_key(folder: &str) -> String {
  if folder == DEFAULT_FOLDER {
    DEFAULT_ENTRIES_KEY.to_string()
  } else {
    format!("fmapp_entries_{}", folder)
  }
}

/// A string-keyed store of JSON documents.
pub trait Store: Send {
  fn load(&self, key: &str) -> Result<Option<String>>;
  fn save(&mut self, key: &str, value: &str) -> Result<()>;
  /// Removing a missing key is not an error.
  fn remove(&mut self, key: &str) -> Result<()>;
}

/// Load and deserialize the document under `key`.
pub fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
  S: Store + ?Sized,
  T: DeserializeOwned,
{
  match store.load(key)? {
    Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
    None => Ok(None),
  }
}

pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<()>
where
  S: Store + ?Sized,
  T: Serialize + ?Sized,
{
  let raw = serde_json::to_string(value)?;
  store.save(key, &raw)
}

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analytics::Streak;

  #[test]
  fn test_entries_key() {
    assert_eq!(entries_key("default"), "fmapp_savedEntries_v1");
    assert_eq!(entries_key("korean"), "fmapp_entries_korean");
  }

  #[test]
  fn test_json_helpers() {
    let mut store = MemoryStore::default();
    assert_eq!(load_json::<_, Streak>(&store, STREAK_KEY).unwrap(), None);

    let streak = Streak {
      last_date: None,
      count: 4,
    };
    save_json(&mut store, STREAK_KEY, &streak).unwrap();
    assert_eq!(load_json::<_, Streak>(&store, STREAK_KEY).unwrap(), Some(streak));
  }

  #[test]
  fn test_load_json_malformed_is_error() {
    let mut store = MemoryStore::default();
    store.save(STREAK_KEY, "{not json").unwrap();
    let result = load_json::<_, Streak>(&store, STREAK_KEY);
    assert!(matches!(result, Err(crate::error::Error::Serialization(_))));
  }

  #[test]
  fn test_log_warn() {
    let failed: std::result::Result<u32, String> = Err("boom".to_string());
    assert_eq!(failed.log_warn("reading count"), None);
    let ok: std::result::Result<u32, String> = Ok(7);
    assert_eq!(ok.log_warn("reading count"), Some(7));
  }
}
