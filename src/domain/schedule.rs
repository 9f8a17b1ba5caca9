use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::MATURE_INTERVAL_DAYS;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// SM-2 scheduling state attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
  pub ease_factor: f64,
  /// Days until the next review
  pub interval: u32,
  /// Consecutive successful reviews
  pub repetitions: u32,
  /// `None` means never scheduled, which is always due
  pub due_date: Option<NaiveDate>,
  pub last_reviewed: Option<NaiveDate>,
}

impl Default for SchedulingState {
  fn default() -> Self {
    Self {
      ease_factor: DEFAULT_EASE_FACTOR,
      interval: 0,
      repetitions: 0,
      due_date: None,
      last_reviewed: None,
    }
  }
}

/// How well-learned an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maturity {
  /// No scheduling state yet
  New,
  Learning,
  Young,
  Mature,
}

impl Maturity {
  /// Maturity of an entry's (possibly absent) scheduling state.
  pub fn of(state: Option<&SchedulingState>) -> Self {
    match state {
      None => Self::New,
      Some(s) if s.repetitions == 0 => Self::Learning,
      Some(s) if s.interval >= MATURE_INTERVAL_DAYS => Self::Mature,
      Some(_) => Self::Young,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Learning => "learning",
      Self::Young => "young",
      Self::Mature => "mature",
    }
  }
}
