//! The study notebook: folders of entries plus practice analytics, backed by
//! a [`Store`].
//!
//! Every operation reads what it needs from the store and writes its result
//! back before returning. Nothing is cached between calls, so callers must
//! serialize operations on one notebook (the HTTP layer keeps it behind a
//! mutex).

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::analytics::{
  self, DailyHistory, FolderSummary, HeatmapDay, PracticeSessions, SessionKind, SessionStats,
  Streak, WeakSpot,
};
use crate::clock::Clock;
use crate::cloze::{ClozeCard, ClozeResult};
use crate::config::{
  DUPLICATE_THRESHOLD, DUPLICATE_THRESHOLD_ON_ADD, RELATED_LIMIT, WEAK_SPOT_LIMIT,
};
use crate::domain::{
  Direction, Entry, EntryFilter, EntryStats, Quality, ReviewRating, SchedulingState,
};
use crate::error::{Error, Result};
use crate::scoring::{self, AttemptScore, CheckMode};
use crate::smart::{self, Duplicate, Hint, Related};
use crate::srs::{self, ReviewSession, SessionMode, SrsStats};
use crate::store::{
  self, DEFAULT_FOLDER, FOLDER_LIST_KEY, HISTORY_KEY, LogOnError, STREAK_KEY, STUDY_TIME_KEY,
  Store,
};

/// Result of scoring a typed attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptOutcome {
  pub score: AttemptScore,
  /// Quality derived from word accuracy
  pub quality: Quality,
  /// Rating button closest to `quality`
  pub suggested: ReviewRating,
  /// Running totals of the session the attempt belonged to, if any
  pub session: Option<SessionStats>,
}

/// An entry that was just added, with near-duplicates already in the folder.
#[derive(Debug, Clone, Serialize)]
pub struct AddedEntry {
  pub index: usize,
  pub duplicates: Vec<Duplicate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickStats {
  pub total_entries: usize,
  pub total_practiced: u64,
  pub average_accuracy: u32,
  pub streak: u32,
  pub study_minutes: u64,
  pub study_time: String,
}

/// Everything the analytics dashboard shows for one folder.
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
  pub quick: QuickStats,
  pub history: DailyHistory,
  pub heatmap: Vec<HeatmapDay>,
  pub weak_spots: Vec<WeakSpot>,
  pub folders: Vec<FolderSummary>,
}

pub struct Notebook {
  store: Box<dyn Store>,
  clock: Box<dyn Clock>,
  sessions: PracticeSessions,
}

impl Notebook {
  pub fn new(store: impl Store + 'static, clock: impl Clock + 'static) -> Self {
    Self {
      store: Box::new(store),
      clock: Box::new(clock),
      sessions: PracticeSessions::default(),
    }
  }

  pub fn today(&self) -> NaiveDate {
    self.clock.today()
  }

  /// Parse the document under `key`.
  ///
  /// Text that is not JSON at all is [`Error::CorruptDocument`]. Callers
  /// that write the document back must not replace it.
  fn load_value(&self, key: &str) -> Result<Option<Value>> {
    match self.store.load(key)? {
      Some(raw) => serde_json::from_str::<Value>(&raw)
        .log_warn(&format!("Unreadable {}", key))
        .map(Some)
        .ok_or_else(|| Error::CorruptDocument(key.to_string())),
      None => Ok(None),
    }
  }

  /// Like [`Self::load_value`] for read-only use: unreadable text reads as
  /// a missing document.
  fn read_value(&self, key: &str) -> Result<Option<Value>> {
    match self.load_value(key) {
      Err(Error::CorruptDocument(_)) => Ok(None),
      other => other,
    }
  }

  // ==================== Folders ====================

  fn folder_list(raw: Option<Value>) -> Vec<String> {
    let mut folders = raw.as_ref().map(store::normalize_folders).unwrap_or_default();
    folders.retain(|f| f != DEFAULT_FOLDER);
    folders.insert(0, DEFAULT_FOLDER.to_string());
    folders
  }

  /// Folder ids in creation order. The default folder is always first.
  pub fn folders(&self) -> Result<Vec<String>> {
    Ok(Self::folder_list(self.read_value(FOLDER_LIST_KEY)?))
  }

  /// The folder list about to be rewritten. Fails rather than replace a
  /// list that cannot be read.
  fn folders_for_update(&self) -> Result<Vec<String>> {
    Ok(Self::folder_list(self.load_value(FOLDER_LIST_KEY)?))
  }

  fn ensure_folder(&self, folder: &str) -> Result<()> {
    if self.folders()?.iter().any(|f| f == folder) {
      Ok(())
    } else {
      Err(Error::FolderNotFound(folder.to_string()))
    }
  }

  fn folder_name(name: &str) -> Result<String> {
    let id = name.trim();
    if id.is_empty() {
      return Err(Error::InvalidFolderName);
    }
    Ok(id.to_string())
  }

  pub fn create_folder(&mut self, name: &str) -> Result<String> {
    let id = Self::folder_name(name)?;
    let mut folders = self.folders_for_update()?;
    if folders.contains(&id) {
      return Err(Error::FolderExists(id));
    }
    folders.push(id.clone());
    store::save_json(&mut *self.store, FOLDER_LIST_KEY, &folders)?;
    tracing::info!("Created folder '{}'", id);
    Ok(id)
  }

  /// Rename a folder, moving its entries to the new key.
  pub fn rename_folder(&mut self, folder: &str, new_name: &str) -> Result<String> {
    if folder == DEFAULT_FOLDER {
      return Err(Error::ProtectedFolder(folder.to_string()));
    }
    self.ensure_folder(folder)?;
    let id = Self::folder_name(new_name)?;
    if id == folder {
      return Ok(id);
    }

    let mut folders = self.folders_for_update()?;
    if folders.contains(&id) {
      return Err(Error::FolderExists(id));
    }

    let old_key = store::entries_key(folder);
    if let Some(raw) = self.store.load(&old_key)? {
      self.store.save(&store::entries_key(&id), &raw)?;
    }
    self.store.remove(&old_key)?;

    for f in folders.iter_mut().filter(|f| *f == folder) {
      *f = id.clone();
    }
    store::save_json(&mut *self.store, FOLDER_LIST_KEY, &folders)?;
    tracing::info!("Renamed folder '{}' to '{}'", folder, id);
    Ok(id)
  }

  /// Delete a folder and all its entries.
  pub fn delete_folder(&mut self, folder: &str) -> Result<()> {
    if folder == DEFAULT_FOLDER {
      return Err(Error::ProtectedFolder(folder.to_string()));
    }
    self.ensure_folder(folder)?;

    let folders: Vec<String> = self
      .folders_for_update()?
      .into_iter()
      .filter(|f| f != folder)
      .collect();
    self.store.remove(&store::entries_key(folder))?;
    store::save_json(&mut *self.store, FOLDER_LIST_KEY, &folders)?;
    tracing::info!("Deleted folder '{}'", folder);
    Ok(())
  }

  // ==================== Entries ====================

  pub fn entries(&self, folder: &str) -> Result<Vec<Entry>> {
    self.ensure_folder(folder)?;
    match store::load_json::<_, Value>(&*self.store, &store::entries_key(folder))? {
      Some(raw) => Ok(store::normalize_entries(&raw)),
      None => Ok(Vec::new()),
    }
  }

  pub fn save_entries(&mut self, folder: &str, entries: &[Entry]) -> Result<()> {
    self.ensure_folder(folder)?;
    store::save_json(&mut *self.store, &store::entries_key(folder), entries)
  }

  fn entry_at(entries: &[Entry], folder: &str, index: usize) -> Result<Entry> {
    entries.get(index).cloned().ok_or_else(|| Error::EntryNotFound {
      folder: folder.to_string(),
      index,
    })
  }

  fn card_text(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() || content.is_empty() {
      return Err(Error::EmptyEntry);
    }
    Ok((title.to_string(), content.to_string()))
  }

  fn clean_tags(tags: &[String]) -> Vec<String> {
    tags
      .iter()
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty())
      .collect()
  }

  /// Add an entry at the top of the folder.
  ///
  /// Title, content and tags are trimmed and blank tags dropped. Entries that
  /// look like duplicates are reported but do not block the add.
  pub fn add_entry(&mut self, folder: &str, entry: Entry) -> Result<AddedEntry> {
    let (title, content) = Self::card_text(&entry.title, &entry.content)?;
    let tags = Self::clean_tags(&entry.tags);

    let mut entries = self.entries(folder)?;
    let duplicates: Vec<Duplicate> =
      smart::find_duplicates(&title, &content, &entries, DUPLICATE_THRESHOLD_ON_ADD, None)
        .into_iter()
        // indices shift by one once the new entry is in front
        .map(|d| Duplicate {
          index: d.index + 1,
          ..d
        })
        .collect();
    if !duplicates.is_empty() {
      tracing::debug!("'{}' resembles {} existing entries", title, duplicates.len());
    }

    entries.insert(
      0,
      Entry {
        title,
        content,
        tags,
        ..entry
      },
    );
    self.save_entries(folder, &entries)?;
    Ok(AddedEntry {
      index: 0,
      duplicates,
    })
  }

  pub fn delete_entry(&mut self, folder: &str, index: usize) -> Result<Entry> {
    let mut entries = self.entries(folder)?;
    Self::entry_at(&entries, folder, index)?;
    let removed = entries.remove(index);
    self.save_entries(folder, &entries)?;
    Ok(removed)
  }

  pub fn set_pinned(&mut self, folder: &str, index: usize, pinned: bool) -> Result<()> {
    let mut entries = self.entries(folder)?;
    Self::entry_at(&entries, folder, index)?;
    entries[index].pinned = pinned;
    self.save_entries(folder, &entries)
  }

  /// Replace an entry's title, content and tags, trimmed like on add.
  ///
  /// Pin and schedule are kept. Word stats are cleared when the content
  /// changes, since they were counted against the old text.
  pub fn update_entry(
    &mut self,
    folder: &str,
    index: usize,
    title: &str,
    content: &str,
    tags: &[String],
  ) -> Result<Entry> {
    let (title, content) = Self::card_text(title, content)?;
    let mut entries = self.entries(folder)?;
    Self::entry_at(&entries, folder, index)?;

    let entry = &mut entries[index];
    if entry.content != content {
      entry.stats = EntryStats::default();
    }
    entry.title = title;
    entry.content = content;
    entry.tags = Self::clean_tags(tags);
    let updated = entry.clone();

    self.save_entries(folder, &entries)?;
    tracing::debug!("Updated entry {} in '{}'", index, folder);
    Ok(updated)
  }

  /// Entries matching `filter` with their indices, pinned first.
  pub fn filter_entries(
    &self,
    folder: &str,
    filter: &EntryFilter,
  ) -> Result<Vec<(usize, Entry)>> {
    let entries = self.entries(folder)?;
    Ok(
      filter
        .apply(&entries)
        .into_iter()
        .map(|(i, e)| (i, e.clone()))
        .collect(),
    )
  }

  /// Sorted, deduplicated indices, all of which must exist.
  fn checked_indices(entries: &[Entry], folder: &str, indices: &[usize]) -> Result<Vec<usize>> {
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();
    for &index in &indices {
      Self::entry_at(entries, folder, index)?;
    }
    Ok(indices)
  }

  /// Delete several entries at once. Nothing is deleted if any index is
  /// out of range. Returns how many were removed.
  pub fn bulk_delete(&mut self, folder: &str, indices: &[usize]) -> Result<usize> {
    let mut entries = self.entries(folder)?;
    let indices = Self::checked_indices(&entries, folder, indices)?;
    // highest first so earlier removals do not shift later ones
    for &index in indices.iter().rev() {
      entries.remove(index);
    }
    self.save_entries(folder, &entries)?;
    tracing::info!("Deleted {} entries from '{}'", indices.len(), folder);
    Ok(indices.len())
  }

  /// Add `tag` to several entries. Entries already carrying it are left
  /// alone. Returns how many entries gained the tag.
  pub fn bulk_add_tag(&mut self, folder: &str, indices: &[usize], tag: &str) -> Result<usize> {
    let tag = tag.trim();
    if tag.is_empty() {
      return Err(Error::EmptyTag);
    }
    let mut entries = self.entries(folder)?;
    let indices = Self::checked_indices(&entries, folder, indices)?;

    let mut tagged = 0;
    for index in indices {
      let tags = &mut entries[index].tags;
      if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
        tagged += 1;
      }
    }
    self.save_entries(folder, &entries)?;
    tracing::debug!("Tagged {} entries in '{}' with '{}'", tagged, folder, tag);
    Ok(tagged)
  }

  // ==================== Practice ====================

  /// Score a typed attempt at the entry's content and record it.
  ///
  /// Updates the entry's stats, the running totals of `session` (review
  /// answers pass `None`), today's history record and the streak.
  pub fn record_attempt(
    &mut self,
    folder: &str,
    index: usize,
    user_input: &str,
    mode: CheckMode,
    session: Option<SessionKind>,
  ) -> Result<AttemptOutcome> {
    self.record_attempt_with(folder, index, user_input, mode, session, Direction::Forward)
  }

  /// [`Self::record_attempt`] with a choice of which side is recalled.
  pub fn record_attempt_with(
    &mut self,
    folder: &str,
    index: usize,
    user_input: &str,
    mode: CheckMode,
    session: Option<SessionKind>,
    direction: Direction,
  ) -> Result<AttemptOutcome> {
    let mut entries = self.entries(folder)?;
    let entry = Self::entry_at(&entries, folder, index)?;
    let score = scoring::score_attempt(user_input, direction.answer(&entry), mode);

    entries[index]
      .stats
      .record(score.correct_count, score.total_count);
    self.save_entries(folder, &entries)?;

    let session = session.map(|kind| {
      let stats = self.sessions.get_mut(kind);
      stats.record(score.correct_count, score.total_count);
      *stats
    });

    let today = self.today();
    self.update_history(|history| history.record_practice(1, score.accuracy_percent, today))?;
    self.mark_streak()?;

    let quality = srs::classify(score.correct_count, score.total_count);
    tracing::debug!(
      "Attempt on '{}': {}/{} correct, quality {}",
      entry.title,
      score.correct_count,
      score.total_count,
      quality.value()
    );

    Ok(AttemptOutcome {
      score,
      quality,
      suggested: srs::suggested_rating(quality),
      session,
    })
  }

  pub fn cloze_card<R: Rng + ?Sized>(
    &self,
    folder: &str,
    index: usize,
    difficulty: u8,
    rng: &mut R,
  ) -> Result<ClozeCard> {
    let entries = self.entries(folder)?;
    let entry = Self::entry_at(&entries, folder, index)?;
    Ok(ClozeCard::generate(&entry.content, difficulty, rng))
  }

  /// Check filled-in blanks. Counts go into the session totals; the streak
  /// is marked only when every blank is right.
  pub fn record_cloze<S: AsRef<str>>(
    &mut self,
    card: &ClozeCard,
    answers: &[S],
    session: SessionKind,
  ) -> Result<(ClozeResult, SessionStats)> {
    let result = card.check(answers);
    let stats = self.sessions.get_mut(session);
    stats.record(result.correct, result.total);
    let stats = *stats;

    if result.is_perfect() {
      self.mark_streak()?;
    }
    Ok((result, stats))
  }

  pub fn session_stats(&self, kind: SessionKind) -> SessionStats {
    *self.sessions.get(kind)
  }

  pub fn reset_session(&mut self, kind: SessionKind) {
    self.sessions.reset(kind);
  }

  /// A random practice order over the folder's entries.
  pub fn shuffled_order<R: Rng + ?Sized>(&self, folder: &str, rng: &mut R) -> Result<Vec<usize>> {
    Ok(srs::shuffled_order(self.entries(folder)?.len(), rng))
  }

  /// Apply `change` to the stored history. An unreadable history is left
  /// untouched and the change skipped.
  fn update_history(&mut self, change: impl FnOnce(&mut DailyHistory)) -> Result<()> {
    let mut history = match self.load_value(HISTORY_KEY) {
      Ok(raw) => raw.as_ref().map(store::normalize_history).unwrap_or_default(),
      Err(Error::CorruptDocument(_)) => return Ok(()),
      Err(e) => return Err(e),
    };
    change(&mut history);
    store::save_json(&mut *self.store, HISTORY_KEY, &history)
  }

  fn mark_streak(&mut self) -> Result<()> {
    let today = self.today();
    let mut streak = match self.load_value(STREAK_KEY) {
      Ok(raw) => raw.as_ref().map(store::normalize_streak).unwrap_or_default(),
      Err(Error::CorruptDocument(_)) => return Ok(()),
      Err(e) => return Err(e),
    };
    if streak.mark_today(today) {
      store::save_json(&mut *self.store, STREAK_KEY, &streak)?;
    }
    Ok(())
  }

  pub fn history(&self) -> Result<DailyHistory> {
    Ok(
      self
        .read_value(HISTORY_KEY)?
        .as_ref()
        .map(store::normalize_history)
        .unwrap_or_default(),
    )
  }

  pub fn streak(&self) -> Result<Streak> {
    Ok(
      self
        .read_value(STREAK_KEY)?
        .as_ref()
        .map(store::normalize_streak)
        .unwrap_or_default(),
    )
  }

  pub fn study_minutes(&self) -> Result<u64> {
    Ok(
      self
        .read_value(STUDY_TIME_KEY)?
        .as_ref()
        .map_or(0, store::normalize_study_time),
    )
  }

  /// Fails with [`Error::CorruptDocument`] rather than reset an unreadable
  /// total.
  pub fn add_study_time(&mut self, minutes: u64) -> Result<u64> {
    let stored = self.load_value(STUDY_TIME_KEY)?;
    let total = stored
      .as_ref()
      .map_or(0, store::normalize_study_time)
      .saturating_add(minutes);
    store::save_json(&mut *self.store, STUDY_TIME_KEY, &total)?;
    Ok(total)
  }

  // ==================== Scheduling ====================

  /// Apply a review rating to an entry and store the new schedule.
  ///
  /// A rating counts as practice: it marks the streak and adds the entry
  /// to today's history without changing the day's accuracy.
  pub fn rate(&mut self, folder: &str, index: usize, quality: Quality) -> Result<SchedulingState> {
    let next = self.apply_rating(folder, index, quality)?;
    self.record_rating()?;
    Ok(next)
  }

  fn record_rating(&mut self) -> Result<()> {
    let today = self.today();
    self.update_history(|history| history.record_review(today))?;
    self.mark_streak()
  }

  fn apply_rating(
    &mut self,
    folder: &str,
    index: usize,
    quality: Quality,
  ) -> Result<SchedulingState> {
    let mut entries = self.entries(folder)?;
    let entry = Self::entry_at(&entries, folder, index)?;
    let next = srs::update(&entry.schedule(), quality, self.today());

    tracing::debug!(
      "Rated '{}' {}: next review in {} days",
      entry.title,
      quality.value(),
      next.interval
    );
    entries[index].srs = Some(next.clone());
    self.save_entries(folder, &entries)?;
    Ok(next)
  }

  /// Index of the session's current entry, checked against the store.
  ///
  /// Fails with [`Error::StaleSession`] when the entry at the snapshot's
  /// index no longer holds the same card.
  fn current_index(&self, folder: &str, session: &ReviewSession) -> Result<usize> {
    let item = session.current().ok_or(Error::SessionComplete)?;
    match self.entries(folder)?.get(item.index) {
      Some(entry) if entry.same_card(&item.entry) => Ok(item.index),
      _ => Err(Error::StaleSession),
    }
  }

  /// Score a typed answer for the session's current entry without moving
  /// on. The attempt is recorded like any other, outside the practice
  /// session totals.
  pub fn answer_current(
    &mut self,
    folder: &str,
    session: &mut ReviewSession,
    user_input: &str,
    mode: CheckMode,
  ) -> Result<AttemptOutcome> {
    let index = self.current_index(folder, session)?;
    let outcome = self.record_attempt(folder, index, user_input, mode, None)?;
    session.mark_answered();
    Ok(outcome)
  }

  /// Rate the session's current entry and move on. A stale entry leaves
  /// the session where it was.
  ///
  /// An entry answered with [`Self::answer_current`] is already in today's
  /// history, so its rating only changes the schedule.
  pub fn rate_current(
    &mut self,
    folder: &str,
    session: &mut ReviewSession,
    quality: Quality,
  ) -> Result<SchedulingState> {
    let index = self.current_index(folder, session)?;
    let next = self.apply_rating(folder, index, quality)?;
    if !session.current_answered() {
      self.record_rating()?;
    }
    session.advance();
    Ok(next)
  }

  /// Clear scheduling for one entry, or for every entry in the folder.
  /// Returns how many entries were reset.
  pub fn reset_srs(&mut self, folder: &str, index: Option<usize>) -> Result<usize> {
    let mut entries = self.entries(folder)?;
    let count = match index {
      Some(i) => {
        Self::entry_at(&entries, folder, i)?;
        entries[i].srs = None;
        1
      }
      None => {
        entries.iter_mut().for_each(|e| e.srs = None);
        entries.len()
      }
    };
    self.save_entries(folder, &entries)?;
    tracing::info!("Reset scheduling for {} entries in '{}'", count, folder);
    Ok(count)
  }

  pub fn stats(&self, folder: &str) -> Result<SrsStats> {
    Ok(srs::get_stats(&self.entries(folder)?, self.today()))
  }

  pub fn build_review_session(&self, folder: &str, mode: SessionMode) -> Result<ReviewSession> {
    let session = srs::build_session(&self.entries(folder)?, mode, self.today());
    tracing::debug!(
      "Review session for '{}' ({:?}): {} entries",
      folder,
      mode,
      session.len()
    );
    Ok(session)
  }

  // ==================== Analytics ====================

  pub fn analytics(&self, folder: &str) -> Result<Analytics> {
    let entries = self.entries(folder)?;
    let history = self.history()?;
    let study_minutes = self.study_minutes()?;

    let mut folders = Vec::new();
    for id in self.folders()? {
      let folder_entries = self.entries(&id)?;
      if !folder_entries.is_empty() {
        folders.push(analytics::folder_summary(&id, &folder_entries));
      }
    }

    Ok(Analytics {
      quick: QuickStats {
        total_entries: entries.len(),
        total_practiced: analytics::total_practiced(&entries),
        average_accuracy: analytics::overall_accuracy(&entries),
        streak: self.streak()?.current(),
        study_minutes,
        study_time: analytics::format_study_time(study_minutes),
      },
      heatmap: analytics::heatmap(&history, self.today()),
      history,
      weak_spots: analytics::weak_spots(&entries, WEAK_SPOT_LIMIT),
      folders,
    })
  }

  // ==================== Smart features ====================

  pub fn duplicates(&self, folder: &str, index: usize) -> Result<Vec<Duplicate>> {
    let entries = self.entries(folder)?;
    let entry = Self::entry_at(&entries, folder, index)?;
    Ok(smart::find_duplicates(
      &entry.title,
      &entry.content,
      &entries,
      DUPLICATE_THRESHOLD,
      Some(index),
    ))
  }

  pub fn related(&self, folder: &str, index: usize) -> Result<Vec<Related>> {
    let entries = self.entries(folder)?;
    Self::entry_at(&entries, folder, index)?;
    Ok(smart::related_entries(&entries, index, RELATED_LIMIT))
  }

  pub fn hints(&self, folder: &str, index: usize) -> Result<Vec<Hint>> {
    let entries = self.entries(folder)?;
    Ok(smart::practice_hints(&Self::entry_at(&entries, folder, index)?))
  }
}
