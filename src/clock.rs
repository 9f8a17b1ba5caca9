//! Calendar date source.
//!
//! Scheduling works on whole days (`YYYY-MM-DD`), so the clock only hands out
//! dates. Tests inject a [`FixedClock`].

use chrono::{NaiveDate, Utc};

pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
}

/// Current UTC calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    Utc::now().date_naive()
  }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate {
    self.0
  }
}
