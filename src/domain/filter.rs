//! Search and tag filtering over a folder's entries.

use super::entry::Entry;

/// What the entry list is narrowed to. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
  /// Case-insensitive substring of title and content
  pub query: String,
  /// Lowercased tags an entry must all carry
  pub tags: Vec<String>,
  pub pinned_only: bool,
}

impl EntryFilter {
  pub fn new(query: &str, tags: &str, pinned_only: bool) -> Self {
    Self {
      query: query.trim().to_lowercase(),
      tags: Self::parse_tags(tags),
      pinned_only,
    }
  }

  /// Split a comma-separated tag list, dropping blanks.
  pub fn parse_tags(text: &str) -> Vec<String> {
    text
      .split(',')
      .map(|t| t.trim().to_lowercase())
      .filter(|t| !t.is_empty())
      .collect()
  }

  pub fn matches(&self, entry: &Entry) -> bool {
    if self.pinned_only && !entry.pinned {
      return false;
    }
    if !self.query.is_empty() {
      let haystack = format!("{} {}", entry.title, entry.content).to_lowercase();
      if !haystack.contains(&self.query) {
        return false;
      }
    }
    self
      .tags
      .iter()
      .all(|wanted| entry.tags.iter().any(|t| t.to_lowercase() == *wanted))
  }

  /// Matching entries with their folder index, pinned ones first and
  /// stored order otherwise.
  pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<(usize, &'a Entry)> {
    let mut matched: Vec<(usize, &Entry)> = entries
      .iter()
      .enumerate()
      .filter(|(_, e)| self.matches(e))
      .collect();
    // stable, so indices stay ascending within each group
    matched.sort_by_key(|(_, e)| !e.pinned);
    matched
  }
}
