//! JSON API over the notebook.

pub mod entries;
pub mod folders;
pub mod practice;
pub mod review;
pub mod stats;

use axum::Router;
use axum::routing::{get, post, put};
use serde::Deserialize;

use crate::state::AppState;
use crate::store::DEFAULT_FOLDER;

fn default_folder() -> String {
  DEFAULT_FOLDER.to_string()
}

/// `?folder=` selector shared by the read endpoints; defaults to the
/// default folder.
#[derive(Debug, Deserialize)]
pub struct FolderQuery {
  #[serde(default = "default_folder")]
  pub folder: String,
}

impl Default for FolderQuery {
  fn default() -> Self {
    Self {
      folder: default_folder(),
    }
  }
}

pub fn router(state: AppState) -> Router {
  Router::new()
    // Folders and entries
    .route("/api/folders", get(folders::list).post(folders::create))
    .route(
      "/api/folders/{id}",
      put(folders::rename).delete(folders::remove),
    )
    .route(
      "/api/folders/{id}/entries",
      get(entries::list).post(entries::add),
    )
    .route(
      "/api/folders/{id}/entries/{index}",
      put(entries::update).delete(entries::remove),
    )
    .route(
      "/api/folders/{id}/entries/bulk-delete",
      post(entries::bulk_delete),
    )
    .route("/api/folders/{id}/entries/bulk-tag", post(entries::bulk_tag))
    .route("/api/folders/{id}/entries/{index}/pin", put(entries::pin))
    .route(
      "/api/folders/{id}/entries/{index}/insights",
      get(entries::insights),
    )
    .route("/api/tags/suggest", post(entries::suggest_tags))
    // Free practice
    .route("/api/practice/check", post(practice::check))
    .route(
      "/api/practice/session",
      get(practice::session_stats).post(practice::reset_session),
    )
    .route("/api/practice/shuffle", post(practice::shuffle))
    .route("/api/practice/cloze", post(practice::cloze_start))
    .route("/api/practice/cloze/{id}/check", post(practice::cloze_check))
    .route("/api/practice/study-time", post(practice::add_study_time))
    // Spaced repetition review
    .route("/api/review/start", post(review::start))
    .route("/api/review/{session}", get(review::current).delete(review::cancel))
    .route("/api/review/{session}/answer", post(review::answer))
    .route("/api/review/{session}/rate", post(review::rate))
    // Dashboards
    .route("/api/stats", get(stats::srs_stats))
    .route("/api/analytics", get(stats::analytics))
    .route("/api/srs/reset", post(stats::reset_srs))
    .with_state(state)
}
