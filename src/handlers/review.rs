//! Spaced repetition review over a snapshot of a folder.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::{Maturity, Quality, SchedulingState};
use crate::error::{Error, Result};
use crate::notebook::AttemptOutcome;
use crate::scoring::{self, CheckMode};
use crate::srs::{self, RatingPreview, SessionMode, SrsBadge};
use crate::state::{ActiveReview, AppState};

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

use super::default_folder;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
  #[serde(default = "default_folder")]
  pub folder: String,
  #[serde(default)]
  pub mode: SessionMode,
}

#[derive(Debug, Serialize)]
pub struct Started {
  pub id: String,
  pub folder: String,
  pub mode: SessionMode,
  pub total: usize,
}

/// The card under review. Content stays hidden until an answer is checked.
#[derive(Debug, Serialize)]
pub struct ReviewCard {
  pub index: usize,
  pub title: String,
  pub tags: Vec<String>,
  pub first_letters: String,
  pub maturity: Maturity,
  pub badge: SrsBadge,
  pub previews: Vec<RatingPreview>,
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
  pub id: String,
  pub position: usize,
  pub total: usize,
  pub complete: bool,
  pub card: Option<ReviewCard>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub input: String,
  pub mode: Option<CheckMode>,
}

#[derive(Debug, Serialize)]
pub struct Answered {
  #[serde(flatten)]
  pub outcome: AttemptOutcome,
  /// The reference text, revealed with the result
  pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
  pub quality: u8,
}

#[derive(Debug, Serialize)]
pub struct Rated {
  pub srs: SchedulingState,
  pub next_review: String,
  pub remaining: usize,
  pub complete: bool,
}

/// POST /api/review/start
pub async fn start(
  State(state): State<AppState>,
  Json(request): Json<StartRequest>,
) -> Result<(StatusCode, Json<Started>)> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/review/start".into(),
    method: "POST".into(),
  });

  let session = state
    .notebook()?
    .build_review_session(&request.folder, request.mode)?;
  let total = session.len();
  let id = state.reviews.insert(ActiveReview {
    folder: request.folder.clone(),
    session,
  })?;

  tracing::info!(
    "Started review {} of '{}' with {} entries",
    id,
    request.folder,
    total
  );
  Ok((
    StatusCode::CREATED,
    Json(Started {
      id,
      folder: request.folder,
      mode: request.mode,
      total,
    }),
  ))
}

/// GET /api/review/{session}
pub async fn current(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ReviewView>> {
  let today = state.notebook()?.today();
  let mode = state.check_mode;

  let view = state.reviews.with(&id, |review| {
    let session = &review.session;
    let card = session.current().map(|item| {
      let srs_state = item.entry.srs.as_ref();
      ReviewCard {
        index: item.index,
        title: item.entry.title.clone(),
        tags: item.entry.tags.clone(),
        first_letters: scoring::first_letter_hint(&item.entry.content, mode),
        maturity: Maturity::of(srs_state),
        badge: srs::srs_badge(srs_state, today),
        previews: srs::rating_previews(&item.entry.schedule()),
      }
    });
    Ok(ReviewView {
      id: id.clone(),
      position: session.position(),
      total: session.len(),
      complete: session.is_complete(),
      card,
    })
  })?;

  Ok(Json(view))
}

/// POST /api/review/{session}/answer
///
/// Scores a typed answer for the current card without moving on; the card
/// advances once it is rated, and that rating is not counted again.
pub async fn answer(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(request): Json<AnswerRequest>,
) -> Result<Json<Answered>> {
  let mode = request.mode.unwrap_or(state.check_mode);

  let answered = state.reviews.with(&id, |review| {
    let content = review
      .session
      .current()
      .map(|item| item.entry.content.clone())
      .ok_or(Error::SessionComplete)?;
    let outcome = state.notebook()?.answer_current(
      &review.folder,
      &mut review.session,
      &request.input,
      mode,
    )?;
    Ok(Answered { outcome, content })
  })?;

  Ok(Json(answered))
}

/// POST /api/review/{session}/rate
pub async fn rate(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(request): Json<RateRequest>,
) -> Result<Json<Rated>> {
  let quality = Quality::new(request.quality)?;

  let rated = state.reviews.with(&id, |review| {
    let mut notebook = state.notebook()?;
    let next = notebook.rate_current(&review.folder, &mut review.session, quality)?;
    Ok(Rated {
      next_review: srs::next_review_display(Some(&next), notebook.today()),
      srs: next,
      remaining: review.session.len() - review.session.reviewed(),
      complete: review.session.is_complete(),
    })
  })?;

  Ok(Json(rated))
}

/// DELETE /api/review/{session}
pub async fn cancel(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
  match state.reviews.remove(&id)? {
    Some(_) => Ok(StatusCode::NO_CONTENT),
    None => Err(Error::SessionNotFound(id)),
  }
}
