//! Shared application state for the HTTP layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::cloze::ClozeCard;
use crate::config::SESSION_EXPIRY_HOURS;
use crate::error::{Error, Result};
use crate::notebook::Notebook;
use crate::scoring::CheckMode;
use crate::srs::ReviewSession;

pub type SharedNotebook = Arc<Mutex<Notebook>>;

/// A review session and the folder it was drawn from.
pub struct ActiveReview {
  pub folder: String,
  pub session: ReviewSession,
}

/// A cloze card waiting for answers.
pub struct PendingCloze {
  pub folder: String,
  pub index: usize,
  pub card: ClozeCard,
}

struct Slot<T> {
  value: T,
  last_access: DateTime<Utc>,
}

/// In-process map of live sessions keyed by a random id. Entries idle for
/// more than `SESSION_EXPIRY_HOURS` are dropped on the next insert.
pub struct SessionMap<T> {
  slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> Default for SessionMap<T> {
  fn default() -> Self {
    Self {
      slots: Mutex::new(HashMap::new()),
    }
  }
}

impl<T> SessionMap<T> {
  fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Slot<T>>>> {
    self.slots.lock().map_err(|_| {
      tracing::error!("Session map mutex poisoned");
      Error::StoreLock
    })
  }

  /// Store `value` under a fresh id and return the id.
  pub fn insert(&self, value: T) -> Result<String> {
    let mut slots = self.lock()?;
    let expiry = Utc::now() - Duration::hours(SESSION_EXPIRY_HOURS);
    slots.retain(|_, slot| slot.last_access > expiry);

    let id = generate_session_id();
    slots.insert(
      id.clone(),
      Slot {
        value,
        last_access: Utc::now(),
      },
    );
    Ok(id)
  }

  /// Run `f` on the session `id`.
  pub fn with<R>(&self, id: &str, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
    let mut slots = self.lock()?;
    let slot = slots
      .get_mut(id)
      .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
    slot.last_access = Utc::now();
    f(&mut slot.value)
  }

  pub fn remove(&self, id: &str) -> Result<Option<T>> {
    Ok(self.lock()?.remove(id).map(|slot| slot.value))
  }

  pub fn len(&self) -> usize {
    self.lock().map(|slots| slots.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
  pub notebook: SharedNotebook,
  pub reviews: Arc<SessionMap<ActiveReview>>,
  pub cloze: Arc<SessionMap<PendingCloze>>,
  /// Default word-comparison mode for requests that do not pick one
  pub check_mode: CheckMode,
}

impl AppState {
  pub fn new(notebook: Notebook, check_mode: CheckMode) -> Self {
    Self {
      notebook: Arc::new(Mutex::new(notebook)),
      reviews: Arc::new(SessionMap::default()),
      cloze: Arc::new(SessionMap::default()),
      check_mode,
    }
  }

  /// Lock the notebook, failing instead of panicking if a previous holder
  /// panicked.
  pub fn notebook(&self) -> Result<MutexGuard<'_, Notebook>> {
    self.notebook.lock().map_err(|_| {
      tracing::error!("Notebook mutex poisoned - a thread panicked while holding the lock");
      Error::StoreLock
    })
  }
}

/// 32 random lowercase alphanumerics.
pub fn generate_session_id() -> String {
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36u8);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_session_id_format() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert_ne!(id, generate_session_id());
  }

  #[test]
  fn test_session_map() {
    let map: SessionMap<u32> = SessionMap::default();
    let id = map.insert(1).unwrap();
    assert_eq!(map.len(), 1);

    map
      .with(&id, |v| {
        *v += 1;
        Ok(())
      })
      .unwrap();
    assert_eq!(map.with(&id, |v| Ok(*v)).unwrap(), 2);
    assert!(matches!(map.with("missing", |v| Ok(*v)), Err(Error::SessionNotFound(_))));

    assert_eq!(map.remove(&id).unwrap(), Some(2));
    assert!(map.is_empty());
  }
}
