use serde::{Deserialize, Serialize};

use super::schedule::SchedulingState;

/// Cumulative practice counters for one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryStats {
  pub correct_words: u64,
  pub total_words: u64,
  pub attempts: u64,
}

impl EntryStats {
  pub fn record(&mut self, correct_words: usize, total_words: usize) {
    self.attempts += 1;
    self.correct_words += correct_words as u64;
    self.total_words += total_words as u64;
  }

  /// Rounded accuracy percentage, 0 when nothing was practiced.
  pub fn accuracy(&self) -> u32 {
    percent(self.correct_words, self.total_words)
  }
}

/// A flashcard: a title to prompt with and content to recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
  pub title: String,
  pub content: String,
  pub tags: Vec<String>,
  pub pinned: bool,
  pub stats: EntryStats,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub srs: Option<SchedulingState>,
}

impl Entry {
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      content: content.into(),
      tags: Vec::new(),
      pinned: false,
      stats: EntryStats::default(),
      srs: None,
    }
  }

  pub fn with_tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }

  /// Scheduling state, or the defaults when the entry was never scheduled.
  ///
  /// Does not attach the defaults to the entry.
  pub fn schedule(&self) -> SchedulingState {
    self.srs.clone().unwrap_or_default()
  }

  /// True when both entries hold the same card text.
  pub fn same_card(&self, other: &Entry) -> bool {
    self.title == other.title && self.content == other.content
  }
}

/// Which side of an entry is shown and which is typed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  /// Prompt with the title, recall the content
  #[default]
  Forward,
  /// Prompt with the content, recall the title
  Reverse,
}

impl Direction {
  pub fn prompt<'a>(&self, entry: &'a Entry) -> &'a str {
    match self {
      Self::Forward => &entry.title,
      Self::Reverse => &entry.content,
    }
  }

  pub fn answer<'a>(&self, entry: &'a Entry) -> &'a str {
    match self {
      Self::Forward => &entry.content,
      Self::Reverse => &entry.title,
    }
  }
}

/// `round(part / whole * 100)`, or 0 for an empty whole.
pub(crate) fn percent(part: u64, whole: u64) -> u32 {
  if whole == 0 {
    return 0;
  }
  ((part as f64 / whole as f64) * 100.0).round() as u32
}
