use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

#[derive(Debug, Serialize)]
pub struct FolderList {
  pub folders: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FolderName {
  pub name: String,
}

#[derive(Debug, Serialize)]
pub struct FolderId {
  pub id: String,
}

/// GET /api/folders
pub async fn list(State(state): State<AppState>) -> Result<Json<FolderList>> {
  let folders = state.notebook()?.folders()?;
  Ok(Json(FolderList { folders }))
}

/// POST /api/folders
pub async fn create(
  State(state): State<AppState>,
  Json(request): Json<FolderName>,
) -> Result<(StatusCode, Json<FolderId>)> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/folders".into(),
    method: "POST".into(),
  });

  let id = state.notebook()?.create_folder(&request.name)?;
  Ok((StatusCode::CREATED, Json(FolderId { id })))
}

/// PUT /api/folders/{id}
pub async fn rename(
  State(state): State<AppState>,
  Path(folder): Path<String>,
  Json(request): Json<FolderName>,
) -> Result<Json<FolderId>> {
  let id = state.notebook()?.rename_folder(&folder, &request.name)?;
  Ok(Json(FolderId { id }))
}

/// DELETE /api/folders/{id}
pub async fn remove(State(state): State<AppState>, Path(folder): Path<String>) -> Result<StatusCode> {
  state.notebook()?.delete_folder(&folder)?;
  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::handlers::test_support::state_with;

  fn name(n: &str) -> Json<FolderName> {
    Json(FolderName { name: n.into() })
  }

  #[tokio::test]
  async fn test_folder_lifecycle() {
    let state = state_with(&[]);

    let (status, Json(created)) = create(State(state.clone()), name("Spanish")).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.id, "Spanish");

    let Json(renamed) = rename(State(state.clone()), Path("Spanish".into()), name("spanish"))
      .await
      .unwrap();
    assert_eq!(renamed.id, "spanish");

    let Json(listed) = list(State(state.clone())).await.unwrap();
    assert_eq!(listed.folders, vec!["default", "spanish"]);

    let status = remove(State(state.clone()), Path("spanish".into())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    let Json(listed) = list(State(state)).await.unwrap();
    assert_eq!(listed.folders, vec!["default"]);
  }

  #[tokio::test]
  async fn test_default_folder_protected() {
    let state = state_with(&[]);
    let err = remove(State(state), Path("default".into())).await.unwrap_err();
    assert!(matches!(err, Error::ProtectedFolder(_)));
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
  }
}
