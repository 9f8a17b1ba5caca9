//! Normalization of stored records.
//!
//! Records may come from older versions of the app or from hand-edited
//! exports, so every field is optional and recovered with a default. A bad
//! field never takes the rest of its record down with it.

use chrono::NaiveDate;
use serde_json::Value;

use crate::analytics::{DailyHistory, DailyRecord, Streak};
use crate::domain::{DEFAULT_EASE_FACTOR, Entry, EntryStats, SchedulingState};
use crate::srs::MIN_EASE_FACTOR;

fn text_field(raw: &Value, field: &str) -> String {
  raw
    .get(field)
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string()
}

/// Tags stored either as a list or as one comma-separated string.
fn tags_field(raw: &Value) -> Vec<String> {
  match raw.get("tags") {
    Some(Value::Array(items)) => items
      .iter()
      .filter_map(Value::as_str)
      .map(str::to_string)
      .collect(),
    Some(Value::String(joined)) if !joined.trim().is_empty() => {
      joined.split(',').map(|t| t.trim().to_string()).collect()
    }
    _ => Vec::new(),
  }
}

fn truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
  let text = text.trim();
  // full timestamps keep only their date part
  NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .ok()
    .or_else(|| text.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn date_field(raw: &Value, field: &str, title: &str) -> Option<NaiveDate> {
  let value = raw.get(field).filter(|v| !v.is_null())?;
  let date = value.as_str().and_then(parse_date);
  if date.is_none() {
    tracing::warn!("Ignoring malformed {} for '{}': {}", field, title, value);
  }
  date
}

/// A non-negative whole number. Fractions are rounded.
fn count_value(value: &Value) -> Option<u32> {
  if let Some(n) = value.as_u64() {
    return Some(u32::try_from(n).unwrap_or(u32::MAX));
  }
  value
    .as_f64()
    .filter(|f| f.is_finite() && *f >= 0.0)
    .map(|f| f.round() as u32)
}

fn count_field(raw: &Value, field: &str, title: &str) -> u32 {
  match raw.get(field) {
    None | Some(Value::Null) => 0,
    Some(value) => count_value(value).unwrap_or_else(|| {
      tracing::warn!("Ignoring malformed {} for '{}': {}", field, title, value);
      0
    }),
  }
}

fn ease_field(raw: &Value, title: &str) -> f64 {
  let ease = match raw.get("easeFactor") {
    None | Some(Value::Null) => DEFAULT_EASE_FACTOR,
    Some(value) => value.as_f64().unwrap_or_else(|| {
      tracing::warn!("Ignoring malformed easeFactor for '{}': {}", title, value);
      DEFAULT_EASE_FACTOR
    }),
  };
  ease.max(MIN_EASE_FACTOR)
}

/// Scheduling state, field by field. Only a missing or non-object `srs`
/// means the entry was never scheduled.
fn srs_field(raw: &Value, title: &str) -> Option<SchedulingState> {
  let srs = raw.get("srs").filter(|v| !v.is_null())?;
  if !srs.is_object() {
    tracing::warn!("Discarding scheduling state for '{}': {}", title, srs);
    return None;
  }

  Some(SchedulingState {
    ease_factor: ease_field(srs, title),
    interval: count_field(srs, "interval", title),
    repetitions: count_field(srs, "repetitions", title),
    due_date: date_field(srs, "dueDate", title),
    last_reviewed: date_field(srs, "lastReviewed", title),
  })
}

/// Build an entry from a stored record, filling in anything missing.
pub fn normalize_entry(raw: &Value) -> Entry {
  let title = text_field(raw, "title");
  let srs = srs_field(raw, &title);

  Entry {
    content: text_field(raw, "content"),
    tags: tags_field(raw),
    pinned: raw.get("pinned").is_some_and(truthy),
    stats: raw
      .get("stats")
      .and_then(|s| serde_json::from_value::<EntryStats>(s.clone()).ok())
      .unwrap_or_default(),
    srs,
    title,
  }
}

/// Normalize a stored entry list. Anything other than a JSON array yields
/// no entries.
pub fn normalize_entries(raw: &Value) -> Vec<Entry> {
  match raw {
    Value::Array(items) => items.iter().map(normalize_entry).collect(),
    _ => Vec::new(),
  }
}

fn history_record(raw: &Value) -> Option<DailyRecord> {
  let Some(date) = raw.get("date").and_then(Value::as_str).and_then(parse_date) else {
    tracing::warn!("Skipping history record without a valid date: {}", raw);
    return None;
  };
  let accuracy = raw.get("accuracy").and_then(count_value).unwrap_or(0).min(100);
  Some(DailyRecord {
    date,
    practiced: raw.get("practiced").and_then(count_value).unwrap_or(0),
    accuracy,
  })
}

/// Practice history, one record at a time. Records without a usable date
/// are skipped and the rest kept.
pub fn normalize_history(raw: &Value) -> DailyHistory {
  match raw {
    Value::Array(items) => {
      DailyHistory::from_records(items.iter().filter_map(history_record).collect())
    }
    _ => DailyHistory::default(),
  }
}

pub fn normalize_streak(raw: &Value) -> Streak {
  Streak {
    last_date: raw.get("lastDate").and_then(Value::as_str).and_then(parse_date),
    count: raw.get("count").and_then(count_value).unwrap_or(0),
  }
}

/// Folder ids from a stored list. Non-string and blank ids are dropped,
/// repeats collapse to the first.
pub fn normalize_folders(raw: &Value) -> Vec<String> {
  let mut folders: Vec<String> = Vec::new();
  if let Value::Array(items) = raw {
    for id in items.iter().filter_map(Value::as_str).map(str::trim) {
      if !id.is_empty() && !folders.iter().any(|f| f == id) {
        folders.push(id.to_string());
      }
    }
  }
  folders
}

fn minutes_value(value: f64) -> Option<u64> {
  (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}

/// Study minutes stored as a number or a numeric string.
pub fn normalize_study_time(raw: &Value) -> u64 {
  match raw {
    Value::String(text) => text.trim().parse().ok().and_then(minutes_value),
    other => other.as_u64().or_else(|| other.as_f64().and_then(minutes_value)),
  }
  .unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use serde_json::json;

  #[test]
  fn test_missing_fields_default() {
    let entry = normalize_entry(&json!({}));
    assert_eq!(entry, Entry::new("", ""));
  }

  #[test]
  fn test_tags_as_array_or_string() {
    let from_list = normalize_entry(&json!({"tags": ["a", "b", 3]}));
    assert_eq!(from_list.tags, vec!["a", "b"]);

    let from_string = normalize_entry(&json!({"tags": "verbs, past tense ,irregular"}));
    assert_eq!(from_string.tags, vec!["verbs", "past tense", "irregular"]);

    let blank = normalize_entry(&json!({"tags": "   "}));
    assert!(blank.tags.is_empty());

    let other = normalize_entry(&json!({"tags": 12}));
    assert!(other.tags.is_empty());
  }

  #[test]
  fn test_pinned_truthiness() {
    assert!(normalize_entry(&json!({"pinned": true})).pinned);
    assert!(normalize_entry(&json!({"pinned": 1})).pinned);
    assert!(!normalize_entry(&json!({"pinned": 0})).pinned);
    assert!(!normalize_entry(&json!({"pinned": ""})).pinned);
    assert!(!normalize_entry(&json!({"pinned": null})).pinned);
  }

  #[test]
  fn test_partial_stats() {
    let entry = normalize_entry(&json!({"stats": {"attempts": 3}}));
    assert_eq!(entry.stats.attempts, 3);
    assert_eq!(entry.stats.total_words, 0);

    let garbage = normalize_entry(&json!({"stats": "lots"}));
    assert_eq!(garbage.stats, EntryStats::default());
  }

  #[test]
  fn test_valid_srs_kept() {
    let entry = normalize_entry(&json!({
      "title": "t",
      "content": "c",
      "srs": {
        "easeFactor": 2.36,
        "interval": 6,
        "repetitions": 2,
        "dueDate": "2024-05-07",
        "lastReviewed": "2024-05-01"
      }
    }));
    let srs = entry.srs.unwrap();
    assert_eq!(srs.interval, 6);
    assert_eq!(srs.due_date, NaiveDate::from_ymd_opt(2024, 5, 7));
  }

  #[test]
  fn test_missing_ease_defaults_per_field() {
    let entry = normalize_entry(&json!({
      "title": "t",
      "srs": {"interval": 30, "repetitions": 5, "dueDate": "2024-05-01"}
    }));
    let srs = entry.srs.clone().unwrap();
    assert_eq!(srs.ease_factor, DEFAULT_EASE_FACTOR);
    assert_eq!(srs.repetitions, 5);
    assert_eq!(srs.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert!(srs.last_reviewed.is_none());

    let stats = crate::srs::get_stats(&[entry], NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
    assert_eq!(stats.due, 0);
    assert_eq!(stats.learning, 0);
    assert_eq!(stats.mature, 1);
  }

  #[test]
  fn test_ease_floored() {
    let entry = normalize_entry(&json!({"srs": {"easeFactor": 0.4, "repetitions": 1}}));
    assert_eq!(entry.srs.unwrap().ease_factor, MIN_EASE_FACTOR);

    let text = normalize_entry(&json!({"srs": {"easeFactor": "high"}}));
    assert_eq!(text.srs.unwrap().ease_factor, DEFAULT_EASE_FACTOR);
  }

  #[test]
  fn test_malformed_counts_become_zero() {
    let entry = normalize_entry(&json!({
      "title": "t",
      "srs": {"easeFactor": 2.1, "interval": -3, "repetitions": "two"}
    }));
    let srs = entry.srs.unwrap();
    assert_eq!(srs.interval, 0);
    assert_eq!(srs.repetitions, 0);
    assert_eq!(srs.ease_factor, 2.1);

    let rounded = normalize_entry(&json!({"srs": {"interval": 6.4}}));
    assert_eq!(rounded.srs.unwrap().interval, 6);
  }

  #[test]
  fn test_bad_date_keeps_other_fields() {
    let entry = normalize_entry(&json!({
      "srs": {"easeFactor": 2.5, "interval": 1, "repetitions": 1, "dueDate": "tomorrow",
              "lastReviewed": "2024-05-01T08:30:00.000Z"}
    }));
    let srs = entry.srs.unwrap();
    assert!(srs.due_date.is_none());
    assert_eq!(srs.last_reviewed, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!((srs.interval, srs.repetitions), (1, 1));
  }

  #[test]
  fn test_non_object_srs_dropped() {
    let entry = normalize_entry(&json!({"title": "t", "srs": "soon"}));
    assert!(entry.srs.is_none());
    assert_eq!(entry.title, "t");
  }

  #[test]
  fn test_normalize_entries_requires_array() {
    assert!(normalize_entries(&json!({"title": "x"})).is_empty());
    let entries = normalize_entries(&json!([{"title": "x"}, {"content": "y"}]));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].content, "y");
  }

  #[test]
  fn test_history_keeps_good_records() {
    let history = normalize_history(&json!([
      {"date": "2024-04-08", "practiced": 7, "accuracy": 80},
      {"date": "2024-04-09", "practiced": 3, "accuracy": 66.5},
      {"date": "someday", "practiced": 1, "accuracy": 10},
      {"date": "2024-04-07"}
    ]));
    let records = history.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].practiced, 7);
    assert_eq!(records[1].accuracy, 67);
    assert_eq!((records[2].practiced, records[2].accuracy), (0, 0));

    assert!(normalize_history(&json!({})).records().is_empty());
  }

  #[test]
  fn test_streak_per_field() {
    let streak = normalize_streak(&json!({"lastDate": "2024-04-09", "count": "many"}));
    assert_eq!(streak.last_date, NaiveDate::from_ymd_opt(2024, 4, 9));
    assert_eq!(streak.count, 0);
    assert_eq!(normalize_streak(&json!("x")), Streak::default());
  }

  #[test]
  fn test_folder_list() {
    let folders = normalize_folders(&json!(["default", 1, " bio ", "", "bio", null]));
    assert_eq!(folders, vec!["default", "bio"]);
    assert!(normalize_folders(&json!({"a": 1})).is_empty());
  }

  #[test]
  fn test_study_time_forms() {
    assert_eq!(normalize_study_time(&json!(75)), 75);
    assert_eq!(normalize_study_time(&json!("75")), 75);
    assert_eq!(normalize_study_time(&json!(12.6)), 13);
    assert_eq!(normalize_study_time(&json!(-4)), 0);
    assert_eq!(normalize_study_time(&json!("lots")), 0);
  }
}
