use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::notebook::Analytics;
use crate::srs::SrsStats;
use crate::state::AppState;

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

use super::{FolderQuery, default_folder};

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
  #[serde(default = "default_folder")]
  pub folder: String,
  /// Reset one entry; the whole folder when absent
  pub index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ResetDone {
  pub reset: usize,
}

/// GET /api/stats
pub async fn srs_stats(
  State(state): State<AppState>,
  Query(query): Query<FolderQuery>,
) -> Result<Json<SrsStats>> {
  Ok(Json(state.notebook()?.stats(&query.folder)?))
}

/// GET /api/analytics
pub async fn analytics(
  State(state): State<AppState>,
  Query(query): Query<FolderQuery>,
) -> Result<Json<Analytics>> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/analytics".into(),
    method: "GET".into(),
  });

  let notebook = state.notebook()?;
  let analytics = crate::profile_scope!("analytics", { notebook.analytics(&query.folder) })?;
  Ok(Json(analytics))
}

/// POST /api/srs/reset
pub async fn reset_srs(
  State(state): State<AppState>,
  Json(request): Json<ResetRequest>,
) -> Result<Json<ResetDone>> {
  let reset = state
    .notebook()?
    .reset_srs(&request.folder, request.index)?;
  Ok(Json(ResetDone { reset }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Quality;
  use crate::error::Error;
  use crate::handlers::test_support::state_with;
  use crate::scoring::CheckMode;

  #[tokio::test]
  async fn test_stats_buckets() {
    let state = state_with(&[("a", "1"), ("b", "2"), ("c", "3")]);
    {
      let mut notebook = state.notebook().unwrap();
      notebook.rate("default", 0, Quality::new(4).unwrap()).unwrap();
      notebook.rate("default", 1, Quality::new(1).unwrap()).unwrap();
    }

    let Json(stats) = srs_stats(State(state), Query(FolderQuery::default()))
      .await
      .unwrap();
    assert_eq!(stats.total_entries, 3);
    // Failed entries come back tomorrow; only the unrated one is due
    assert_eq!(stats.due, 1);
    assert_eq!(stats.young, 1);
    assert_eq!(stats.learning, 2);
  }

  #[tokio::test]
  async fn test_analytics_dashboard() {
    let state = state_with(&[("a", "one two three four")]);
    state
      .notebook()
      .unwrap()
      .record_attempt("default", 0, "one two", CheckMode::Strict, None)
      .unwrap();

    let Json(analytics) = analytics(State(state), Query(FolderQuery::default()))
      .await
      .unwrap();
    assert_eq!(analytics.quick.total_practiced, 1);
    assert_eq!(analytics.quick.average_accuracy, 50);
    assert_eq!(analytics.quick.streak, 1);
    assert_eq!(analytics.quick.study_time, "0m");
    assert_eq!(analytics.heatmap.len(), 30);
    assert_eq!(analytics.heatmap.last().unwrap().level, 1);
    assert_eq!(analytics.folders.len(), 1);
  }

  #[tokio::test]
  async fn test_reset_srs() {
    let state = state_with(&[("a", "1"), ("b", "2")]);
    {
      let mut notebook = state.notebook().unwrap();
      notebook.rate("default", 0, Quality::new(5).unwrap()).unwrap();
      notebook.rate("default", 1, Quality::new(5).unwrap()).unwrap();
    }

    let Json(done) = reset_srs(
      State(state.clone()),
      Json(ResetRequest {
        folder: "default".into(),
        index: None,
      }),
    )
    .await
    .unwrap();
    assert_eq!(done.reset, 2);
    assert!(state.notebook().unwrap().entries("default").unwrap().iter().all(|e| e.srs.is_none()));

    let err = reset_srs(
      State(state),
      Json(ResetRequest {
        folder: "other".into(),
        index: None,
      }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::FolderNotFound(_)));
  }
}
