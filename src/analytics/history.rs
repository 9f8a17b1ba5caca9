//! Rolling per-day practice history.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::HISTORY_WINDOW_DAYS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
  pub date: NaiveDate,
  pub practiced: u32,
  /// Accuracy of the most recent attempt that day, in percent
  pub accuracy: u32,
}

/// Daily records in insertion order, one per date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyHistory {
  records: Vec<DailyRecord>,
}

impl DailyHistory {
  /// Build from records already in storage order.
  pub fn from_records(records: Vec<DailyRecord>) -> Self {
    Self { records }
  }

  pub fn records(&self) -> &[DailyRecord] {
    &self.records
  }

  pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
    self.records.iter().find(|r| r.date == date)
  }

  fn today_mut(&mut self, today: NaiveDate) -> &mut DailyRecord {
    match self.records.iter().position(|r| r.date == today) {
      Some(i) => &mut self.records[i],
      None => {
        self.records.push(DailyRecord {
          date: today,
          practiced: 0,
          accuracy: 0,
        });
        let last = self.records.len() - 1;
        &mut self.records[last]
      }
    }
  }

  /// Drop records older than the rolling window. A record exactly
  /// `HISTORY_WINDOW_DAYS` old is kept.
  fn prune(&mut self, today: NaiveDate) {
    let cutoff = today - Duration::days(HISTORY_WINDOW_DAYS);
    self.records.retain(|r| r.date >= cutoff);
  }

  /// Add `count` practiced entries to today's record and overwrite its
  /// accuracy with `latest_accuracy`, then prune.
  pub fn record_practice(&mut self, count: u32, latest_accuracy: u32, today: NaiveDate) {
    let record = self.today_mut(today);
    record.practiced += count;
    record.accuracy = latest_accuracy;
    self.prune(today);
  }

  /// Count one rated entry toward today. No answer was scored, so the
  /// accuracy stays as it was.
  pub fn record_review(&mut self, today: NaiveDate) {
    self.today_mut(today).practiced += 1;
    self.prune(today);
  }
}
