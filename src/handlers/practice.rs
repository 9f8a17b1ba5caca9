//! Free practice: typed recall, cloze cards and session totals.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::analytics::{SessionKind, SessionStats};
use crate::cloze::{ClozeResult, ClozeToken};
use crate::config::CLOZE_DEFAULT_DIFFICULTY;
use crate::domain::Direction;
use crate::error::{Error, Result};
use crate::notebook::AttemptOutcome;
use crate::scoring::CheckMode;
use crate::state::{AppState, PendingCloze};

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

use super::default_folder;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
  #[serde(default = "default_folder")]
  pub folder: String,
  pub index: usize,
  pub input: String,
  /// Overrides the configured check mode
  pub mode: Option<CheckMode>,
  #[serde(default)]
  pub session: SessionKind,
  /// Prompt with the content and type the title back
  #[serde(default)]
  pub reverse: bool,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
  #[serde(default = "default_folder")]
  pub folder: String,
  #[serde(default)]
  pub kind: SessionKind,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
  pub kind: SessionKind,
  #[serde(flatten)]
  pub stats: SessionStats,
  pub accuracy: u32,
  /// Attempts so far, capped at the folder size
  pub progress: u64,
  pub total_entries: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
  #[serde(default)]
  pub kind: SessionKind,
}

#[derive(Debug, Deserialize)]
pub struct ShuffleRequest {
  #[serde(default = "default_folder")]
  pub folder: String,
}

#[derive(Debug, Serialize)]
pub struct ShuffledOrder {
  pub order: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ClozeRequest {
  #[serde(default = "default_folder")]
  pub folder: String,
  pub index: usize,
  /// Percent of words to hide
  #[serde(default = "default_difficulty")]
  pub difficulty: u8,
}

fn default_difficulty() -> u8 {
  CLOZE_DEFAULT_DIFFICULTY
}

#[derive(Debug, Serialize)]
pub struct ClozeView {
  pub id: String,
  pub prompt: String,
  pub blanks: usize,
  pub tokens: Vec<ClozeToken>,
}

#[derive(Debug, Deserialize)]
pub struct ClozeAnswers {
  pub answers: Vec<String>,
  #[serde(default)]
  pub session: SessionKind,
}

#[derive(Debug, Serialize)]
pub struct ClozeChecked {
  pub folder: String,
  pub index: usize,
  #[serde(flatten)]
  pub result: ClozeResult,
  pub perfect: bool,
  pub session: SessionStats,
}

#[derive(Debug, Deserialize)]
pub struct StudyTimeRequest {
  pub minutes: u64,
}

#[derive(Debug, Serialize)]
pub struct StudyTime {
  pub minutes: u64,
  pub display: String,
}

/// POST /api/practice/check
pub async fn check(
  State(state): State<AppState>,
  Json(request): Json<CheckRequest>,
) -> Result<Json<AttemptOutcome>> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/practice/check".into(),
    method: "POST".into(),
  });

  let mode = request.mode.unwrap_or(state.check_mode);
  let direction = if request.reverse {
    Direction::Reverse
  } else {
    Direction::Forward
  };
  let outcome = state.notebook()?.record_attempt_with(
    &request.folder,
    request.index,
    &request.input,
    mode,
    Some(request.session),
    direction,
  )?;
  Ok(Json(outcome))
}

/// GET /api/practice/session
pub async fn session_stats(
  State(state): State<AppState>,
  Query(query): Query<SessionQuery>,
) -> Result<Json<SessionView>> {
  let notebook = state.notebook()?;
  let total_entries = notebook.entries(&query.folder)?.len();
  let stats = notebook.session_stats(query.kind);
  Ok(Json(SessionView {
    kind: query.kind,
    accuracy: stats.accuracy(),
    progress: stats.progress(total_entries),
    total_entries,
    stats,
  }))
}

/// POST /api/practice/session
pub async fn reset_session(
  State(state): State<AppState>,
  Json(request): Json<ResetRequest>,
) -> Result<StatusCode> {
  state.notebook()?.reset_session(request.kind);
  tracing::debug!("Reset {:?} practice session", request.kind);
  Ok(StatusCode::NO_CONTENT)
}

/// POST /api/practice/shuffle
pub async fn shuffle(
  State(state): State<AppState>,
  Json(request): Json<ShuffleRequest>,
) -> Result<Json<ShuffledOrder>> {
  let order = state
    .notebook()?
    .shuffled_order(&request.folder, &mut rand::rng())?;
  Ok(Json(ShuffledOrder { order }))
}

/// POST /api/practice/cloze
pub async fn cloze_start(
  State(state): State<AppState>,
  Json(request): Json<ClozeRequest>,
) -> Result<(StatusCode, Json<ClozeView>)> {
  let card = state.notebook()?.cloze_card(
    &request.folder,
    request.index,
    request.difficulty,
    &mut rand::rng(),
  )?;

  let view = ClozeView {
    id: String::new(),
    prompt: card.prompt(),
    blanks: card.blank_count(),
    tokens: card.tokens.clone(),
  };
  let id = state.cloze.insert(PendingCloze {
    folder: request.folder,
    index: request.index,
    card,
  })?;

  Ok((StatusCode::CREATED, Json(ClozeView { id, ..view })))
}

/// POST /api/practice/cloze/{id}/check
///
/// A card can be checked once; the pending card is consumed.
pub async fn cloze_check(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(request): Json<ClozeAnswers>,
) -> Result<Json<ClozeChecked>> {
  let pending = state
    .cloze
    .remove(&id)?
    .ok_or_else(|| Error::SessionNotFound(id.clone()))?;

  let (result, session) =
    state
      .notebook()?
      .record_cloze(&pending.card, &request.answers, request.session)?;

  Ok(Json(ClozeChecked {
    folder: pending.folder,
    index: pending.index,
    perfect: result.is_perfect(),
    result,
    session,
  }))
}

/// POST /api/practice/study-time
pub async fn add_study_time(
  State(state): State<AppState>,
  Json(request): Json<StudyTimeRequest>,
) -> Result<Json<StudyTime>> {
  let minutes = state.notebook()?.add_study_time(request.minutes)?;
  Ok(Json(StudyTime {
    minutes,
    display: crate::analytics::format_study_time(minutes),
  }))
}
