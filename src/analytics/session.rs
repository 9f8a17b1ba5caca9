use serde::{Deserialize, Serialize};

use crate::domain::entry::percent;

/// Which practice surface an attempt came from. Each keeps its own counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
  /// Entries in stored order
  #[default]
  Sequential,
  /// Entries in random order
  Shuffled,
}

/// Running totals for one practice session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
  pub attempts: u64,
  pub correct_words: u64,
  pub total_words: u64,
}

impl SessionStats {
  pub fn record(&mut self, correct_words: usize, total_words: usize) {
    self.attempts += 1;
    self.correct_words += correct_words as u64;
    self.total_words += total_words as u64;
  }

  pub fn accuracy(&self) -> u32 {
    percent(self.correct_words, self.total_words)
  }

  /// Attempts capped at the collection size, for "N / M practiced".
  pub fn progress(&self, total_entries: usize) -> u64 {
    self.attempts.min(total_entries as u64)
  }
}

/// Independent stats for the sequential and shuffled practice sessions.
#[derive(Debug, Clone, Default)]
pub struct PracticeSessions {
  sequential: SessionStats,
  shuffled: SessionStats,
}

impl PracticeSessions {
  pub fn get(&self, kind: SessionKind) -> &SessionStats {
    match kind {
      SessionKind::Sequential => &self.sequential,
      SessionKind::Shuffled => &self.shuffled,
    }
  }

  pub fn get_mut(&mut self, kind: SessionKind) -> &mut SessionStats {
    match kind {
      SessionKind::Sequential => &mut self.sequential,
      SessionKind::Shuffled => &mut self.shuffled,
    }
  }

  /// Start a new session of `kind`, discarding its counters.
  pub fn reset(&mut self, kind: SessionKind) {
    *self.get_mut(kind) = SessionStats::default();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_accumulates() {
    let mut stats = SessionStats::default();
    stats.record(3, 4);
    stats.record(2, 6);
    assert_eq!(stats.attempts, 2);
    assert_eq!(stats.correct_words, 5);
    assert_eq!(stats.total_words, 10);
    assert_eq!(stats.accuracy(), 50);
  }

  #[test]
  fn test_accuracy_empty_is_zero() {
    assert_eq!(SessionStats::default().accuracy(), 0);
  }

  #[test]
  fn test_progress_capped() {
    let mut stats = SessionStats::default();
    for _ in 0..5 {
      stats.record(1, 1);
    }
    assert_eq!(stats.progress(3), 3);
    assert_eq!(stats.progress(10), 5);
  }

  #[test]
  fn test_sessions_are_independent() {
    let mut sessions = PracticeSessions::default();
    sessions.get_mut(SessionKind::Sequential).record(1, 2);
    sessions.get_mut(SessionKind::Shuffled).record(2, 2);
    sessions.get_mut(SessionKind::Shuffled).record(0, 2);

    assert_eq!(sessions.get(SessionKind::Sequential).attempts, 1);
    assert_eq!(sessions.get(SessionKind::Shuffled).attempts, 2);

    sessions.reset(SessionKind::Shuffled);
    assert_eq!(*sessions.get(SessionKind::Shuffled), SessionStats::default());
    assert_eq!(sessions.get(SessionKind::Sequential).attempts, 1);
  }
}
