//! Fill-in-the-blank practice.

use rand::Rng;
use rand::seq::index;
use serde::Serialize;

/// Placeholder shown in place of a hidden word.
pub const BLANK: &str = "____";

fn is_answer_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '\'' || c == '’' || c == '-'
}

/// Split a word into its hideable head and the trailing text kept visible.
/// `None` when the word does not start with a letter, digit, apostrophe or
/// hyphen.
fn split_answer(word: &str) -> Option<(&str, &str)> {
  let end = word
    .char_indices()
    .find(|(_, c)| !is_answer_char(*c))
    .map_or(word.len(), |(i, _)| i);
  (end > 0).then(|| word.split_at(end))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClozeToken {
  Text { text: String },
  Blank { answer: String, trailing: String },
}

/// An entry's content with some words blanked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClozeCard {
  pub tokens: Vec<ClozeToken>,
}

/// Outcome of filling in a card's blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClozeResult {
  /// One flag per blank, in order
  pub marks: Vec<bool>,
  pub correct: usize,
  pub total: usize,
}

impl ClozeResult {
  pub fn is_perfect(&self) -> bool {
    self.correct == self.total
  }
}

impl ClozeCard {
  /// Blank out `max(1, floor(words * difficulty / 100))` distinct word
  /// positions chosen at random.
  ///
  /// A chosen word that does not start with an answer character (a bare
  /// symbol, say) stays visible, so a card can have fewer blanks than
  /// positions chosen.
  pub fn generate<R: Rng + ?Sized>(content: &str, difficulty: u8, rng: &mut R) -> Self {
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.is_empty() {
      return Self { tokens: Vec::new() };
    }

    let pct = usize::from(difficulty.min(100));
    let amount = (words.len() * pct / 100).max(1);
    let mut hidden = vec![false; words.len()];
    for i in index::sample(rng, words.len(), amount) {
      hidden[i] = true;
    }

    let tokens = words
      .iter()
      .zip(hidden)
      .map(|(word, hide)| match split_answer(word) {
        Some((answer, trailing)) if hide => ClozeToken::Blank {
          answer: answer.to_string(),
          trailing: trailing.to_string(),
        },
        _ => ClozeToken::Text {
          text: word.to_string(),
        },
      })
      .collect();

    Self { tokens }
  }

  pub fn blank_count(&self) -> usize {
    self
      .tokens
      .iter()
      .filter(|t| matches!(t, ClozeToken::Blank { .. }))
      .count()
  }

  /// The content with blanks shown as `____`, trailing punctuation kept.
  pub fn prompt(&self) -> String {
    self
      .tokens
      .iter()
      .map(|t| match t {
        ClozeToken::Text { text } => text.clone(),
        ClozeToken::Blank { trailing, .. } => format!("{}{}", BLANK, trailing),
      })
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Compare each answer, trimmed and case-insensitively, with its blank.
  /// Missing answers count as wrong.
  pub fn check<S: AsRef<str>>(&self, answers: &[S]) -> ClozeResult {
    let marks: Vec<bool> = self
      .tokens
      .iter()
      .filter_map(|t| match t {
        ClozeToken::Blank { answer, .. } => Some(answer),
        ClozeToken::Text { .. } => None,
      })
      .enumerate()
      .map(|(i, expected)| {
        answers
          .get(i)
          .is_some_and(|given| given.as_ref().trim().to_lowercase() == expected.to_lowercase())
      })
      .collect();

    ClozeResult {
      correct: marks.iter().filter(|m| **m).count(),
      total: marks.len(),
      marks,
    }
  }
}
