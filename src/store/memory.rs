use std::collections::HashMap;

use super::Store;
use crate::error::Result;

/// Volatile store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  values: HashMap<String, String>,
}

impl MemoryStore {
  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl Store for MemoryStore {
  fn load(&self, key: &str) -> Result<Option<String>> {
    Ok(self.values.get(key).cloned())
  }

  fn save(&mut self, key: &str, value: &str) -> Result<()> {
    self.values.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<()> {
    self.values.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_save_load_remove() {
    let mut store = MemoryStore::default();
    assert!(store.is_empty());
    store.save("k", "v1").unwrap();
    store.save("k", "v2").unwrap();
    assert_eq!(store.load("k").unwrap().as_deref(), Some("v2"));
    assert_eq!(store.len(), 1);
    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.load("k").unwrap(), None);
  }
}
