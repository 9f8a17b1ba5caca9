use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::{Quality, ReviewRating, SchedulingState};

use super::format::format_interval;

pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Apply one review to a scheduling state.
///
/// Returns the new state; the input is left untouched and the caller is
/// responsible for storing the result.
pub fn update(state: &SchedulingState, quality: Quality, today: NaiveDate) -> SchedulingState {
  let q = f64::from(quality.value());

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), applied on failure too
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let ease_factor = (state.ease_factor + ease_delta).max(MIN_EASE_FACTOR);

  let (interval, repetitions) = if !quality.is_passing() {
    // Failed review: back to learning, see it again tomorrow
    (1, 0)
  } else {
    let repetitions = state.repetitions + 1;
    let interval = match repetitions {
      1 => 1,
      2 => 6,
      // Scales the previous interval, not a days-since-review figure
      _ => (f64::from(state.interval) * ease_factor).round() as u32,
    };
    (interval, repetitions)
  };

  #[cfg(feature = "profiling")]
  crate::profile_log!(crate::profiling::EventType::SrsCalculation {
    algorithm: "sm2".into(),
    rating: quality.value(),
    interval_days: interval,
  });

  SchedulingState {
    ease_factor,
    interval,
    repetitions,
    due_date: Some(add_days(today, interval)),
    last_reviewed: Some(today),
  }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
  date
    .checked_add_days(Days::new(u64::from(days)))
    .unwrap_or(NaiveDate::MAX)
}

/// Interval an update with `quality` would produce, without committing it.
pub fn preview_interval(state: &SchedulingState, quality: Quality) -> u32 {
  update(state, quality, NaiveDate::MIN).interval
}

/// Interval shown on a rating button.
#[derive(Debug, Clone, Serialize)]
pub struct RatingPreview {
  pub rating: ReviewRating,
  pub quality: u8,
  pub interval: u32,
  pub label: String,
}

/// Button previews for Again / Hard / Good / Easy.
///
/// "Again" always shows one day and "Hard" shows a 1.2x stretch of the current
/// interval; "Good" and "Easy" show the real next interval.
pub fn rating_previews(state: &SchedulingState) -> Vec<RatingPreview> {
  ReviewRating::ALL
    .iter()
    .map(|&rating| {
      let interval = match rating {
        ReviewRating::Again => 1,
        ReviewRating::Hard => ((f64::from(state.interval) * 1.2).round() as u32).max(1),
        ReviewRating::Good | ReviewRating::Easy => preview_interval(state, rating.quality()),
      };
      RatingPreview {
        rating,
        quality: rating.quality().value(),
        interval,
        label: format_interval(interval),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn q(v: u8) -> Quality {
    Quality::new(v).unwrap()
  }

  fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
  }

  fn state(ease_factor: f64, interval: u32, repetitions: u32) -> SchedulingState {
    SchedulingState {
      ease_factor,
      interval,
      repetitions,
      ..Default::default()
    }
  }

  #[test]
  fn test_first_review_good() {
    let result = update(&SchedulingState::default(), q(4), day(0));
    assert_eq!(result.repetitions, 1);
    assert_eq!(result.interval, 1);
    assert_eq!(result.due_date, Some(day(1)));
    assert_eq!(result.last_reviewed, Some(day(0)));
    assert!((result.ease_factor - 2.5).abs() < 0.01);
  }

  #[test]
  fn test_second_review_good() {
    let first = update(&SchedulingState::default(), q(4), day(0));
    let second = update(&first, q(4), day(1));
    assert_eq!(second.repetitions, 2);
    assert_eq!(second.interval, 6);
    assert_eq!(second.due_date, Some(day(7)));
  }

  #[test]
  fn test_third_review_good() {
    let result = update(&state(2.5, 6, 2), q(4), day(0));
    assert_eq!(result.repetitions, 3);
    // 6 * 2.5 = 15
    assert_eq!(result.interval, 15);
  }

  #[test]
  fn test_interval_progression_perfect_recall() {
    let s1 = update(&SchedulingState::default(), q(5), day(0));
    let s2 = update(&s1, q(5), day(1));
    let s3 = update(&s2, q(5), day(7));
    assert_eq!(s1.interval, 1);
    assert_eq!(s2.interval, 6);
    // Previous interval times the freshly updated ease: 6 * 2.8 = 16.8
    assert!((s3.ease_factor - 2.8).abs() < 1e-9);
    assert_eq!(s3.interval, (6.0 * s3.ease_factor).round() as u32);
    assert_eq!(s3.interval, 17);
    let s4 = update(&s3, q(5), day(24));
    assert_eq!(s4.interval, (17.0 * s4.ease_factor).round() as u32);
  }

  #[test]
  fn test_failed_review_resets() {
    let result = update(&state(2.5, 15, 5), q(0), day(0));
    assert_eq!(result.repetitions, 0);
    assert_eq!(result.interval, 1);
    assert_eq!(result.due_date, Some(day(1)));
    // Ease factor still decreases on failure
    assert!(result.ease_factor < 2.5);
  }

  #[test]
  fn test_all_failing_grades_reset() {
    for grade in 0..3 {
      let result = update(&state(2.1, 40, 7), q(grade), day(0));
      assert_eq!(result.repetitions, 0);
      assert_eq!(result.interval, 1);
    }
  }

  #[test]
  fn test_hard_pass_keeps_progress() {
    let result = update(&state(2.5, 6, 2), q(3), day(0));
    assert_eq!(result.repetitions, 3);
    // EF drops by 0.14 for q = 3
    assert!((result.ease_factor - 2.36).abs() < 1e-9);
    assert_eq!(result.interval, 14);
  }

  #[test]
  fn test_easy_review_increases_ease() {
    let result = update(&state(2.5, 1, 1), q(5), day(0));
    assert!(result.ease_factor > 2.5);
    assert_eq!(result.interval, 6);
  }

  #[test]
  fn test_ease_factor_floor() {
    let mut s = state(2.5, 10, 5);
    for _ in 0..10 {
      s = update(&s, q(0), day(0));
      assert_eq!(s.interval, 1);
      assert_eq!(s.repetitions, 0);
    }
    assert!(s.ease_factor >= MIN_EASE_FACTOR);
    assert!((s.ease_factor - MIN_EASE_FACTOR).abs() < 1e-9);
  }

  #[test]
  fn test_ease_floor_holds_for_every_grade() {
    for ease in [1.3, 1.31, 1.5, 2.0, 2.5, 3.4] {
      for grade in 0..=5 {
        let result = update(&state(ease, 12, 3), q(grade), day(0));
        assert!(result.ease_factor >= MIN_EASE_FACTOR);
      }
    }
  }

  #[test]
  fn test_update_is_pure() {
    let before = state(2.5, 6, 2);
    let copy = before.clone();
    let _ = update(&before, q(5), day(0));
    assert_eq!(before, copy);
  }

  #[test]
  fn test_interval_grows_exponentially() {
    let mut s = SchedulingState::default();
    for i in 0..5 {
      s = update(&s, q(4), day(0));
      match i {
        0 => assert_eq!(s.interval, 1),
        1 => assert_eq!(s.interval, 6),
        _ => assert!(s.interval > 6),
      }
    }
    assert!(s.interval > 30);
  }

  #[test]
  fn test_no_upper_bound_on_ease() {
    let mut s = SchedulingState::default();
    for _ in 0..20 {
      s = update(&s, q(5), day(0));
    }
    assert!((s.ease_factor - 4.5).abs() < 1e-9);
  }

  #[test]
  fn test_preview_does_not_depend_on_date() {
    let s = state(2.5, 6, 2);
    assert_eq!(preview_interval(&s, q(4)), 15);
    assert_eq!(preview_interval(&s, q(1)), 1);
  }

  #[test]
  fn test_rating_previews() {
    let previews = rating_previews(&state(2.5, 10, 3));
    let intervals: Vec<u32> = previews.iter().map(|p| p.interval).collect();
    // Again=1, Hard=round(10*1.2), Good=round(10*2.5), Easy=round(10*2.6)
    assert_eq!(intervals, vec![1, 12, 25, 26]);
    assert_eq!(previews[0].label, "1 day");
    assert_eq!(previews[2].label, "25 days");
  }

  #[test]
  fn test_rating_previews_new_entry() {
    let previews = rating_previews(&SchedulingState::default());
    assert_eq!(previews[1].interval, 1); // max(1, 0 * 1.2)
    assert_eq!(previews[2].interval, 1);
    assert_eq!(previews[3].interval, 1);
  }
}
