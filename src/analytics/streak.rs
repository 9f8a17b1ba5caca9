use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Consecutive practice days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
  #[serde(default)]
  pub last_date: Option<NaiveDate>,
  #[serde(default)]
  pub count: u32,
}

impl Streak {
  /// Record practice on `today`.
  ///
  /// Returns false when today was already marked.
  pub fn mark_today(&mut self, today: NaiveDate) -> bool {
    if self.last_date == Some(today) {
      return false;
    }

    let yesterday = today - Duration::days(1);
    self.count = if self.last_date == Some(yesterday) {
      self.count + 1
    } else {
      1
    };
    self.last_date = Some(today);
    true
  }

  pub fn current(&self) -> u32 {
    self.count
  }
}
