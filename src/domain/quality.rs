use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Recall quality grade in `0..=5`.
///
/// 0 - complete blackout
/// 1 - incorrect, but recognized
/// 2 - incorrect, but easy to recall
/// 3 - correct, but difficult
/// 4 - correct, with hesitation
/// 5 - perfect recall
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
  pub const MAX: u8 = 5;

  /// Every valid grade, indexed by value.
  pub const GRADES: [Quality; 6] = [Self(0), Self(1), Self(2), Self(3), Self(4), Self(5)];

  pub fn new(value: u8) -> Result<Self> {
    if value > Self::MAX {
      return Err(Error::InvalidQuality(value));
    }
    Ok(Self(value))
  }

  pub fn value(self) -> u8 {
    self.0
  }

  /// Grades of 3 and up count as a successful review.
  pub fn is_passing(self) -> bool {
    self.0 >= 3
  }
}

impl TryFrom<u8> for Quality {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> {
    Self::new(value)
  }
}

impl From<Quality> for u8 {
  fn from(q: Quality) -> u8 {
    q.0
  }
}

/// The four rating buttons shown after a review answer is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewRating {
  Again,
  Hard,
  Good,
  Easy,
}

impl ReviewRating {
  pub const ALL: [ReviewRating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  pub fn quality(self) -> Quality {
    match self {
      Self::Again => Quality(0),
      Self::Hard => Quality(2),
      Self::Good => Quality(4),
      Self::Easy => Quality(5),
    }
  }

  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Again),
      2 => Some(Self::Hard),
      4 => Some(Self::Good),
      5 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }
}
