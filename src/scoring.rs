//! Typed-recall scoring.
//!
//! The user's text is compared to the reference text word by word, by
//! position: word `i` of the input is only ever compared to word `i` of the
//! reference. There is no alignment, so a dropped word shifts every later
//! word out of place.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::domain::entry::percent;

/// Characters removed before comparison in lenient mode
const LENIENT_STRIP: &[char] = &[
  '.', ',', '!', '?', ';', ':', '(', ')', '[', ']', '"', '\'', '\u{201C}', '\u{201D}', '\u{2018}',
  '\u{2019}',
];

/// How strictly typed text is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
  /// Whitespace-split only; punctuation must match
  #[default]
  Strict,
  /// Lowercased with punctuation stripped before splitting
  Lenient,
}

impl CheckMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Strict => "strict",
      Self::Lenient => "lenient",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s.trim().to_lowercase().as_str() {
      "strict" => Some(Self::Strict),
      "lenient" => Some(Self::Lenient),
      _ => None,
    }
  }
}

/// Split text into the words that get compared.
pub fn tokenize(text: &str, mode: CheckMode) -> Vec<String> {
  match mode {
    CheckMode::Strict => text.split_whitespace().map(str::to_string).collect(),
    CheckMode::Lenient => text
      .to_lowercase()
      .chars()
      .filter(|c| !LENIENT_STRIP.contains(c))
      .collect::<String>()
      .split_whitespace()
      .map(str::to_string)
      .collect(),
  }
}

/// Case-insensitive word equality. Canonically equivalent Unicode spellings
/// (precomposed vs combining accents) compare equal.
fn words_match(user: &str, reference: &str) -> bool {
  fold(user) == fold(reference)
}

fn fold(word: &str) -> String {
  word.nfc().collect::<String>().to_lowercase()
}

/// Positional word comparison of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
  pub user_words: Vec<String>,
  pub reference_words: Vec<String>,
  pub correct_count: usize,
}

impl Comparison {
  /// Rounded percentage of reference words matched, 0 for an empty reference.
  pub fn accuracy(&self) -> u32 {
    percent(self.correct_count as u64, self.reference_words.len() as u64)
  }

  /// More input words than reference words; such an attempt is never correct.
  pub fn has_extra_words(&self) -> bool {
    self.user_words.len() > self.reference_words.len()
  }

  pub fn is_fully_correct(&self) -> bool {
    !self.has_extra_words()
      && !self.reference_words.is_empty()
      && self.correct_count == self.reference_words.len()
  }

  fn word_correct(&self, i: usize) -> bool {
    let reference = self.reference_words.get(i).map(String::as_str).unwrap_or("");
    !reference.is_empty() && words_match(&self.user_words[i], reference)
  }
}

/// Compare `user_input` to `reference_text` word by word.
pub fn score(user_input: &str, reference_text: &str, mode: CheckMode) -> Comparison {
  let mut comparison = Comparison {
    user_words: tokenize(user_input, mode),
    reference_words: tokenize(reference_text, mode),
    correct_count: 0,
  };
  comparison.correct_count = (0..comparison.user_words.len())
    .filter(|&i| comparison.word_correct(i))
    .count();
  comparison
}

/// One typed word and whether it matched its position in the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordResult {
  pub word: String,
  pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Correct,
  /// Input ran past the end of the reference
  ExtraWords,
  /// Some words missing or wrong
  Incomplete,
}

/// Scored attempt as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptScore {
  pub words: Vec<WordResult>,
  pub correct_count: usize,
  pub total_count: usize,
  pub accuracy_percent: u32,
  pub verdict: Verdict,
}

/// Score an attempt and report per-word results for every typed word.
pub fn score_attempt(user_input: &str, reference_text: &str, mode: CheckMode) -> AttemptScore {
  let comparison = score(user_input, reference_text, mode);

  #[cfg(feature = "profiling")]
  crate::profile_log!(crate::profiling::EventType::AttemptScored {
    mode: mode.as_str().into(),
    correct: comparison.correct_count,
    total: comparison.reference_words.len(),
  });

  let verdict = if comparison.has_extra_words() {
    Verdict::ExtraWords
  } else if comparison.is_fully_correct() {
    Verdict::Correct
  } else {
    Verdict::Incomplete
  };

  let words = (0..comparison.user_words.len())
    .map(|i| WordResult {
      word: comparison.user_words[i].clone(),
      correct: comparison.word_correct(i),
    })
    .collect();

  AttemptScore {
    words,
    correct_count: comparison.correct_count,
    total_count: comparison.reference_words.len(),
    accuracy_percent: comparison.accuracy(),
    verdict,
  }
}

/// First letter of every reference word, uppercased: "The quick fox" -> "T Q F".
pub fn first_letter_hint(reference_text: &str, mode: CheckMode) -> String {
  tokenize(reference_text, mode)
    .iter()
    .map(|w| {
      w.chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_default()
    })
    .collect::<Vec<_>>()
    .join(" ")
}
