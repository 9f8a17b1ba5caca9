//! Human-readable scheduling text.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::MATURE_INTERVAL_DAYS;
use crate::domain::SchedulingState;

use super::queue::is_due;

/// "New", "1 day", "N days", "N months" or "N years".
pub fn format_interval(days: u32) -> String {
  match days {
    0 => "New".to_string(),
    1 => "1 day".to_string(),
    d if d < 30 => format!("{} days", d),
    d if d < 365 => format!("{} months", (f64::from(d) / 30.0).round() as u32),
    d => format!("{} years", (f64::from(d) / 365.0).round() as u32),
  }
}

/// When the entry comes up next, relative to `today`.
pub fn next_review_display(state: Option<&SchedulingState>, today: NaiveDate) -> String {
  let Some(due) = state.and_then(|s| s.due_date) else {
    return "Not reviewed yet".to_string();
  };

  if due < today {
    return "Overdue!".to_string();
  }
  if due == today {
    return "Due today".to_string();
  }

  let days = (due - today).num_days();
  format!("In {} day{}", days, if days > 1 { "s" } else { "" })
}

/// Short status badge shown next to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrsBadge {
  pub label: String,
  /// One of "due", "learning", "young", "mature"
  pub class: &'static str,
}

pub fn srs_badge(state: Option<&SchedulingState>, today: NaiveDate) -> SrsBadge {
  if is_due(state, today) {
    return SrsBadge {
      label: "Due".to_string(),
      class: "due",
    };
  }

  let state = state.cloned().unwrap_or_default();
  if state.repetitions == 0 {
    return SrsBadge {
      label: "New".to_string(),
      class: "learning",
    };
  }

  SrsBadge {
    label: next_review_display(Some(&state), today),
    class: if state.interval >= MATURE_INTERVAL_DAYS {
      "mature"
    } else {
      "young"
    },
  }
}
