//! Crate-wide error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// Quality grade outside 0-5. Never clamped.
  #[error("invalid quality {0}: expected a value between 0 and 5")]
  InvalidQuality(u8),

  #[error("storage failure: {0}")]
  Store(#[from] rusqlite::Error),

  #[error("serialization failure: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("storage unavailable")]
  StoreLock,

  /// Stored text under this key is not JSON. It is left as is.
  #[error("stored document '{0}' is unreadable")]
  CorruptDocument(String),

  #[error("folder '{0}' not found")]
  FolderNotFound(String),

  #[error("folder '{0}' already exists")]
  FolderExists(String),

  #[error("invalid folder name")]
  InvalidFolderName,

  #[error("folder '{0}' cannot be renamed or deleted")]
  ProtectedFolder(String),

  #[error("no entry at index {index} in folder '{folder}'")]
  EntryNotFound { folder: String, index: usize },

  #[error("entry title and content must not be empty")]
  EmptyEntry,

  #[error("tag must not be empty")]
  EmptyTag,

  #[error("review session '{0}' not found")]
  SessionNotFound(String),

  #[error("review session is complete")]
  SessionComplete,

  #[error("entry changed since the review session was built")]
  StaleSession,
}

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::InvalidQuality(_) | Self::InvalidFolderName | Self::EmptyEntry | Self::EmptyTag => {
        StatusCode::BAD_REQUEST
      }
      Self::ProtectedFolder(_) => StatusCode::FORBIDDEN,
      Self::FolderNotFound(_) | Self::EntryNotFound { .. } | Self::SessionNotFound(_) => {
        StatusCode::NOT_FOUND
      }
      Self::FolderExists(_) | Self::SessionComplete | Self::StaleSession => StatusCode::CONFLICT,
      Self::Store(_) | Self::Serialization(_) | Self::StoreLock | Self::CorruptDocument(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{}", self);
    }
    (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
  }
}
