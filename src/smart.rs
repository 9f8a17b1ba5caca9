//! Content heuristics: keywords, tag suggestions, duplicate and related-entry
//! detection, and practice hints.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::Entry;

const STOP_WORDS: &[&str] = &[
  "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
  "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does", "did",
  "will", "would", "should", "could", "may", "might", "must", "can", "this", "that", "these",
  "those", "i", "you", "he", "she", "it", "we", "they", "what", "which", "who", "when", "where",
  "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "such",
  "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "just",
];

/// Topic tags and the words that trigger them.
const TOPIC_TAGS: &[(&str, &[&str])] = &[
  ("math", &["equation", "formula", "calculate", "solve", "theorem", "proof"]),
  ("science", &["experiment", "hypothesis", "theory", "observation", "data"]),
  ("history", &["century", "war", "revolution", "empire", "dynasty"]),
  ("language", &["grammar", "vocabulary", "pronunciation", "conjugation"]),
  ("programming", &["function", "variable", "loop", "array", "class", "method"]),
  ("geography", &["country", "capital", "continent", "ocean", "mountain"]),
];

const MAX_KEYWORDS: usize = 5;
const MAX_SUGGESTED_TAGS: usize = 5;
const DUPLICATE_CONTENT_PREFIX: usize = 100;

/// Lowercased words, with anything other than letters, digits and `_`
/// treated as a separator.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
  text
    .split(|c: char| !(c.is_alphanumeric() || c == '_'))
    .filter(|w| !w.is_empty())
    .map(str::to_lowercase)
}

/// The most frequent non-stop-words longer than three characters, most
/// frequent first. Ties keep first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
  let mut order: Vec<String> = Vec::new();
  let mut counts: HashMap<String, usize> = HashMap::new();

  for word in words(text) {
    if word.chars().count() <= 3 || STOP_WORDS.contains(&word.as_str()) {
      continue;
    }
    let count = counts.entry(word.clone()).or_insert(0);
    if *count == 0 {
      order.push(word);
    }
    *count += 1;
  }

  // Stable sort keeps first-seen order among equal counts
  order.sort_by(|a, b| counts[b].cmp(&counts[a]));
  order.truncate(MAX_KEYWORDS);
  order
}

/// Keywords of the title and content, followed by any matching topic tags.
pub fn suggest_tags(title: &str, content: &str) -> Vec<String> {
  let combined = format!("{} {}", title, content);
  let mut tags = extract_keywords(&combined);
  let present: Vec<String> = words(&combined).collect();

  for (tag, triggers) in TOPIC_TAGS {
    let matched = triggers.iter().any(|t| present.iter().any(|w| w == t));
    if matched && !tags.iter().any(|existing| existing == tag) {
      tags.push(tag.to_string());
    }
  }

  tags.truncate(MAX_SUGGESTED_TAGS);
  tags
}

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();

  let mut prev: Vec<usize> = (0..=b.len()).collect();
  let mut curr = vec![0; b.len() + 1];

  for (i, ca) in a.iter().enumerate() {
    curr[0] = i + 1;
    for (j, cb) in b.iter().enumerate() {
      let cost = usize::from(ca != cb);
      curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
    }
    std::mem::swap(&mut prev, &mut curr);
  }
  prev[b.len()]
}

/// `1 - distance / longer length`, in `[0, 1]`. Two empty strings are
/// identical.
pub fn similarity(a: &str, b: &str) -> f64 {
  let longest = a.chars().count().max(b.chars().count());
  if longest == 0 {
    return 1.0;
  }
  1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn content_prefix(content: &str) -> String {
  content
    .to_lowercase()
    .chars()
    .take(DUPLICATE_CONTENT_PREFIX)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Duplicate {
  pub index: usize,
  pub title: String,
  /// Rounded percentage
  pub similarity: u32,
}

/// Entries whose title and content prefix are, on average, at least
/// `threshold` similar to the candidate. Most similar first.
///
/// `skip` excludes the candidate itself when it is already in `entries`.
pub fn find_duplicates(
  title: &str,
  content: &str,
  entries: &[Entry],
  threshold: f64,
  skip: Option<usize>,
) -> Vec<Duplicate> {
  let title = title.to_lowercase();
  let content = content_prefix(content);

  let mut found: Vec<Duplicate> = entries
    .iter()
    .enumerate()
    .filter(|(i, _)| Some(*i) != skip)
    .filter_map(|(index, existing)| {
      let title_sim = similarity(&title, &existing.title.to_lowercase());
      let content_sim = similarity(&content, &content_prefix(&existing.content));
      let avg = (title_sim + content_sim) / 2.0;
      (avg >= threshold).then(|| Duplicate {
        index,
        title: existing.title.clone(),
        similarity: (avg * 100.0).round() as u32,
      })
    })
    .collect();

  found.sort_by(|a, b| b.similarity.cmp(&a.similarity));
  found
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Related {
  pub index: usize,
  pub title: String,
  pub score: f64,
}

/// Entries sharing tags, content keywords or a similar title with the entry
/// at `index`, best match first.
pub fn related_entries(entries: &[Entry], index: usize, limit: usize) -> Vec<Related> {
  let Some(entry) = entries.get(index) else {
    return Vec::new();
  };
  let keywords = extract_keywords(&entry.content);
  let title = entry.title.to_lowercase();

  let mut related: Vec<Related> = entries
    .iter()
    .enumerate()
    .filter(|(i, _)| *i != index)
    .filter_map(|(i, other)| {
      let shared_tags = entry
        .tags
        .iter()
        .filter(|tag| other.tags.iter().any(|t| t.to_lowercase() == tag.to_lowercase()))
        .count();
      let other_keywords = extract_keywords(&other.content);
      let shared_keywords = keywords.iter().filter(|k| other_keywords.contains(k)).count();

      let score = shared_tags as f64 * 10.0
        + shared_keywords as f64 * 5.0
        + similarity(&title, &other.title.to_lowercase()) * 20.0;

      (score > 0.0).then(|| Related {
        index: i,
        title: other.title.clone(),
        score,
      })
    })
    .collect();

  related.sort_by(|a, b| b.score.total_cmp(&a.score));
  related.truncate(limit);
  related
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintKind {
  FirstLetters,
  WordCount,
  Keywords,
  Structure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
  pub kind: HintKind,
  pub label: &'static str,
  pub text: String,
}

/// Progressive hints for recalling an entry's content.
pub fn practice_hints(entry: &Entry) -> Vec<Hint> {
  let words: Vec<&str> = entry.content.split_whitespace().collect();
  let first_letters = words
    .iter()
    .filter_map(|w| w.chars().next())
    .map(|c| c.to_uppercase().to_string())
    .collect::<Vec<_>>()
    .join(" ");

  let mut hints = vec![
    Hint {
      kind: HintKind::FirstLetters,
      label: "First letters",
      text: first_letters,
    },
    Hint {
      kind: HintKind::WordCount,
      label: "Word count",
      text: format!("{} words", words.len()),
    },
  ];

  let keywords = extract_keywords(&entry.content);
  if !keywords.is_empty() {
    hints.push(Hint {
      kind: HintKind::Keywords,
      label: "Key terms",
      text: keywords.join(", "),
    });
  }

  let listed = entry
    .content
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '•');
  if listed {
    let points = entry.content.lines().filter(|l| !l.trim().is_empty()).count();
    hints.push(Hint {
      kind: HintKind::Structure,
      label: "Structure",
      text: format!("{} points", points),
    });
  }

  hints
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_keywords_frequency_and_filters() {
    let text = "The mitochondria is the powerhouse of the cell. Mitochondria produce energy; \
                cell energy matters. Mitochondria again.";
    let keywords = extract_keywords(text);
    assert_eq!(
      keywords,
      vec!["mitochondria", "cell", "energy", "powerhouse", "produce"]
    );
  }

  #[test]
  fn test_extract_keywords_ties_keep_first_seen_order() {
    let keywords = extract_keywords("zebra apple mango kiwi berry grape lemon");
    assert_eq!(keywords, vec!["zebra", "apple", "mango", "kiwi", "berry"]);
  }

  #[test]
  fn test_extract_keywords_skips_stop_and_short_words() {
    assert!(extract_keywords("this that with from they were been").is_empty());
    assert!(extract_keywords("cat dog sun").is_empty());
    assert!(extract_keywords("").is_empty());
  }

  #[test]
  fn test_suggest_tags_adds_topics() {
    let tags = suggest_tags("Capital", "Paris is the capital of France");
    assert_eq!(tags, vec!["capital", "paris", "france", "geography"]);
  }

  #[test]
  fn test_suggest_tags_capped() {
    let tags = suggest_tags(
      "Theorem proof",
      "alpha bravo charlie delta foxtrot equation experiment",
    );
    assert_eq!(tags.len(), 5);
    assert_eq!(tags[0], "theorem");
  }

  #[test]
  fn test_topic_needs_whole_word() {
    let tags = suggest_tags("Warm", "warmth");
    assert!(!tags.contains(&"history".to_string()));
  }

  #[test]
  fn test_levenshtein() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("same", "same"), 0);
  }

  #[test]
  fn test_similarity() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abcd", "abcd"), 1.0);
    assert_eq!(similarity("abcd", "abcx"), 0.75);
    assert_eq!(similarity("abc", ""), 0.0);
  }

  #[test]
  fn test_find_duplicates() {
    let entries = vec![
      Entry::new("Photosynthesis", "Plants turn light into energy"),
      Entry::new("Mitosis", "Cell division"),
      Entry::new("photosynthesis", "plants turn light into energy!"),
    ];
    let dups = find_duplicates("Photosynthesis", "Plants turn light into energy", &entries, 0.8, Some(0));
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].index, 2);
    assert_eq!(dups[0].similarity, 98);
  }

  #[test]
  fn test_find_duplicates_sorted() {
    let entries = vec![
      Entry::new("abcd", "wxyz"),
      Entry::new("abcd", "wxyz"),
      Entry::new("abcx", "wxyz"),
    ];
    let dups = find_duplicates("abcd", "wxyz", &entries, 0.7, None);
    let indices: Vec<usize> = dups.iter().map(|d| d.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(dups[2].similarity, 88);
  }

  #[test]
  fn test_related_entries() {
    let entries = vec![
      Entry::new("Korean verbs", "conjugation patterns").with_tags(["korean", "grammar"]),
      Entry::new("Korean nouns", "particles").with_tags(["Korean"]),
      Entry::new("zzzz", "qqqq"),
      Entry::new("Spanish verbs", "conjugation patterns").with_tags(["grammar"]),
    ];
    let related = related_entries(&entries, 0, 5);
    let indices: Vec<usize> = related.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![3, 1]);
    assert!(related_entries(&entries, 9, 5).is_empty());
  }

  #[test]
  fn test_related_entries_limit() {
    let entries: Vec<Entry> = (0..4)
      .map(|i| Entry::new(format!("note {}", i), "shared content").with_tags(["tag"]))
      .collect();
    assert_eq!(related_entries(&entries, 0, 2).len(), 2);
  }

  #[test]
  fn test_practice_hints() {
    let entry = Entry::new("Steps", "1. boil water\n2. steep leaves\n\n3. enjoy");
    let hints = practice_hints(&entry);
    let kinds: Vec<HintKind> = hints.iter().map(|h| h.kind).collect();
    assert_eq!(
      kinds,
      vec![
        HintKind::FirstLetters,
        HintKind::WordCount,
        HintKind::Keywords,
        HintKind::Structure
      ]
    );
    assert_eq!(hints[0].text, "1 B W 2 S L 3 E");
    assert_eq!(hints[1].text, "8 words");
    assert_eq!(hints[3].text, "3 points");
  }

  #[test]
  fn test_practice_hints_plain_text() {
    let entry = Entry::new("Greeting", "hi you");
    let hints = practice_hints(&entry);
    assert_eq!(hints.len(), 2);
    assert_eq!(hints[0].text, "H Y");
  }
}
