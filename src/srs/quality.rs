//! Accuracy to quality-grade mapping.

use crate::domain::{Quality, ReviewRating};

/// Derive a quality grade from word accuracy.
///
/// Bands are inclusive at their lower bound: exactly 90% is a 4, exactly 70%
/// is a 3, exactly 50% is a 2. Anything above zero but below half is a 1.
pub fn classify(correct_words: usize, total_words: usize) -> Quality {
  let grade = if total_words == 0 {
    0
  } else {
    let accuracy = correct_words as f64 / total_words as f64;
    if accuracy >= 1.0 {
      5
    } else if accuracy >= 0.9 {
      4
    } else if accuracy >= 0.7 {
      3
    } else if accuracy >= 0.5 {
      2
    } else if accuracy > 0.0 {
      1
    } else {
      0
    }
  };
  Quality::GRADES[grade]
}

/// Rating button to highlight for a derived quality.
pub fn suggested_rating(quality: Quality) -> ReviewRating {
  match quality.value() {
    5 => ReviewRating::Easy,
    3 | 4 => ReviewRating::Good,
    2 => ReviewRating::Hard,
    _ => ReviewRating::Again,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn grade(correct: usize, total: usize) -> u8 {
    classify(correct, total).value()
  }

  #[test]
  fn test_zero_total_is_zero() {
    assert_eq!(grade(0, 0), 0);
    assert_eq!(grade(3, 0), 0);
  }

  #[test]
  fn test_perfect_is_five() {
    assert_eq!(grade(4, 4), 5);
    assert_eq!(grade(1, 1), 5);
  }

  #[test]
  fn test_exact_band_boundaries() {
    assert_eq!(grade(9, 10), 4);
    assert_eq!(grade(7, 10), 3);
    assert_eq!(grade(5, 10), 2);
    assert_eq!(grade(1, 10), 1);
    assert_eq!(grade(0, 10), 0);
  }

  #[test]
  fn test_just_below_boundaries() {
    assert_eq!(grade(89, 100), 3);
    assert_eq!(grade(69, 100), 2);
    assert_eq!(grade(49, 100), 1);
    assert_eq!(grade(99, 100), 4);
  }

  #[test]
  fn test_three_of_four() {
    // 0.75 sits in the 0.7 band
    assert_eq!(grade(3, 4), 3);
  }

  #[test]
  fn test_suggested_rating() {
    let rating = |v| suggested_rating(Quality::new(v).unwrap());
    assert_eq!(rating(5), ReviewRating::Easy);
    assert_eq!(rating(4), ReviewRating::Good);
    assert_eq!(rating(3), ReviewRating::Good);
    assert_eq!(rating(2), ReviewRating::Hard);
    assert_eq!(rating(1), ReviewRating::Again);
    assert_eq!(rating(0), ReviewRating::Again);
  }
}
