//! Due-entry selection, maturity buckets and review sessions.

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::MATURE_INTERVAL_DAYS;
use crate::domain::{Entry, SchedulingState};

/// An entry without a due date has never been scheduled and is always due.
///
/// Dates compare chronologically, which for `YYYY-MM-DD` matches the
/// lexicographic order of the stored strings.
pub fn is_due(state: Option<&SchedulingState>, today: NaiveDate) -> bool {
  match state.and_then(|s| s.due_date) {
    None => true,
    Some(due) => due <= today,
  }
}

/// Due entries in collection order.
pub fn due_entries(entries: &[Entry], today: NaiveDate) -> Vec<&Entry> {
  entries
    .iter()
    .filter(|e| is_due(e.srs.as_ref(), today))
    .collect()
}

/// Entries partitioned by how well they are learned.
#[derive(Debug, Default)]
pub struct MaturityBuckets<'a> {
  /// interval >= 21 days
  pub mature: Vec<&'a Entry>,
  /// interval 1-20 days
  pub young: Vec<&'a Entry>,
  /// no successful review yet
  pub learning: Vec<&'a Entry>,
}

/// Entries without scheduling state are read with defaults and land in
/// `learning`; the entries themselves are not modified.
pub fn classify_maturity(entries: &[Entry]) -> MaturityBuckets<'_> {
  let mut buckets = MaturityBuckets::default();
  for entry in entries {
    let state = entry.schedule();
    if state.repetitions == 0 {
      buckets.learning.push(entry);
    } else if state.interval >= MATURE_INTERVAL_DAYS {
      buckets.mature.push(entry);
    } else {
      buckets.young.push(entry);
    }
  }
  buckets
}

/// Counts for the review dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SrsStats {
  pub total_entries: usize,
  pub due: usize,
  pub learning: usize,
  pub young: usize,
  pub mature: usize,
}

pub fn get_stats(entries: &[Entry], today: NaiveDate) -> SrsStats {
  let buckets = classify_maturity(entries);
  SrsStats {
    total_entries: entries.len(),
    due: due_entries(entries, today).len(),
    learning: buckets.learning.len(),
    young: buckets.young.len(),
    mature: buckets.mature.len(),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
  /// Only entries that are due
  #[default]
  Due,
  /// Every entry, in stored order
  All,
}

/// An entry captured when the session was built, with its position in the
/// collection at that time.
#[derive(Debug, Clone, Serialize)]
pub struct SessionItem {
  pub index: usize,
  pub entry: Entry,
}

pub enum SessionStep<'a> {
  Entry(&'a SessionItem),
  Complete,
}

/// A fixed snapshot of entries walked with a cursor.
///
/// Changes to the collection after the session is built do not affect it.
/// Once the cursor passes the last item the session is complete for good.
#[derive(Debug, Clone)]
pub struct ReviewSession {
  mode: SessionMode,
  items: Vec<SessionItem>,
  cursor: usize,
  /// The current item already had a typed answer recorded
  answered: bool,
}

impl ReviewSession {
  pub fn mode(&self) -> SessionMode {
    self.mode
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Items handed out so far.
  pub fn reviewed(&self) -> usize {
    self.cursor
  }

  /// 1-based position of the current item, for "3 / 10" style progress.
  pub fn position(&self) -> usize {
    (self.cursor + 1).min(self.items.len())
  }

  pub fn is_complete(&self) -> bool {
    self.cursor >= self.items.len()
  }

  pub fn current(&self) -> Option<&SessionItem> {
    self.items.get(self.cursor)
  }

  /// Note that a typed answer was recorded for the current item.
  pub fn mark_answered(&mut self) {
    if !self.is_complete() {
      self.answered = true;
    }
  }

  pub fn current_answered(&self) -> bool {
    self.answered
  }

  /// Move past the current item. No-op once complete.
  pub fn advance(&mut self) {
    if !self.is_complete() {
      self.cursor += 1;
      self.answered = false;
    }
  }

  /// Hand out the current item and move past it.
  pub fn next(&mut self) -> SessionStep<'_> {
    if self.is_complete() {
      return SessionStep::Complete;
    }
    let i = self.cursor;
    self.cursor += 1;
    self.answered = false;
    SessionStep::Entry(&self.items[i])
  }
}

/// Snapshot the entries to review: due ones for [`SessionMode::Due`], all of
/// them for [`SessionMode::All`], in stored order either way.
pub fn build_session(entries: &[Entry], mode: SessionMode, today: NaiveDate) -> ReviewSession {
  let items = entries
    .iter()
    .enumerate()
    .filter(|(_, e)| mode == SessionMode::All || is_due(e.srs.as_ref(), today))
    .map(|(index, entry)| SessionItem {
      index,
      entry: entry.clone(),
    })
    .collect();

  #[cfg(feature = "profiling")]
  crate::profile_log!(crate::profiling::EventType::SessionBuilt {
    mode: format!("{:?}", mode),
    entries: entries.len(),
  });

  ReviewSession {
    mode,
    items,
    cursor: 0,
    answered: false,
  }
}

/// A random practice order over `len` entries.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
  let mut order: Vec<usize> = (0..len).collect();
  order.shuffle(rng);
  order
}
