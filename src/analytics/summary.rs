//! Dashboard aggregates over entries and practice history.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::history::DailyHistory;
use crate::config::{HEATMAP_DAYS, WEAK_SPOT_ACCURACY, WEAK_SPOT_MIN_ATTEMPTS};
use crate::domain::Entry;
use crate::domain::entry::percent;

/// Word accuracy across every entry's attempt stats.
pub fn overall_accuracy(entries: &[Entry]) -> u32 {
  let (correct, total) = entries.iter().fold((0, 0), |(c, t), e| {
    (c + e.stats.correct_words, t + e.stats.total_words)
  });
  percent(correct, total)
}

/// Sum of attempts over all entries.
pub fn total_practiced(entries: &[Entry]) -> u64 {
  entries.iter().map(|e| e.stats.attempts).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakSpot {
  pub index: usize,
  pub title: String,
  pub accuracy: u32,
  pub attempts: u64,
}

/// Entries practiced at least twice whose accuracy is below the threshold,
/// worst first.
pub fn weak_spots(entries: &[Entry], limit: usize) -> Vec<WeakSpot> {
  let mut weak: Vec<(usize, &Entry)> = entries
    .iter()
    .enumerate()
    .filter(|(_, e)| {
      e.stats.attempts >= WEAK_SPOT_MIN_ATTEMPTS
        && e.stats.total_words > 0
        && e.stats.correct_words * 100 < u64::from(WEAK_SPOT_ACCURACY) * e.stats.total_words
    })
    .collect();

  // Exact ratio, so 66.2% sorts before 66.4% even though both round to 66
  weak.sort_by(|(_, a), (_, b)| ratio_cmp(a, b));

  weak
    .into_iter()
    .take(limit)
    .map(|(index, e)| WeakSpot {
      index,
      title: e.title.clone(),
      accuracy: e.stats.accuracy(),
      attempts: e.stats.attempts,
    })
    .collect()
}

fn ratio_cmp(a: &Entry, b: &Entry) -> Ordering {
  let lhs = u128::from(a.stats.correct_words) * u128::from(b.stats.total_words);
  let rhs = u128::from(b.stats.correct_words) * u128::from(a.stats.total_words);
  lhs.cmp(&rhs)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
  pub folder: String,
  pub entries: usize,
  pub attempts: u64,
  pub accuracy: u32,
}

pub fn folder_summary(folder: &str, entries: &[Entry]) -> FolderSummary {
  FolderSummary {
    folder: folder.to_string(),
    entries: entries.len(),
    attempts: total_practiced(entries),
    accuracy: overall_accuracy(entries),
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
  pub date: NaiveDate,
  pub practiced: u32,
  pub level: u8,
}

/// Intensity bucket 0-4 for a day's practice count.
pub fn heat_level(practiced: u32) -> u8 {
  match practiced {
    0 => 0,
    1..=2 => 1,
    3..=4 => 2,
    5..=9 => 3,
    _ => 4,
  }
}

/// The last `HEATMAP_DAYS` days ending today, oldest first.
pub fn heatmap(history: &DailyHistory, today: NaiveDate) -> Vec<HeatmapDay> {
  (0..HEATMAP_DAYS)
    .rev()
    .map(|back| {
      let date = today - Duration::days(back);
      let practiced = history.get(date).map_or(0, |r| r.practiced);
      HeatmapDay {
        date,
        practiced,
        level: heat_level(practiced),
      }
    })
    .collect()
}

/// `45m`, `2h 5m`, `1d 3h`.
pub fn format_study_time(minutes: u64) -> String {
  if minutes < 60 {
    return format!("{}m", minutes);
  }
  let hours = minutes / 60;
  if hours < 24 {
    return format!("{}h {}m", hours, minutes % 60);
  }
  format!("{}d {}h", hours / 24, hours % 24)
}
