use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::{Entry, EntryFilter, Maturity};
use crate::error::Result;
use crate::notebook::AddedEntry;
use crate::smart::{self, Duplicate, Hint, Related};
use crate::srs::{self, SrsBadge};
use crate::state::AppState;

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

/// An entry as listed, with its position and scheduling badge.
#[derive(Debug, Serialize)]
pub struct EntryView {
  pub index: usize,
  #[serde(flatten)]
  pub entry: Entry,
  pub accuracy: u32,
  pub maturity: &'static str,
  pub badge: SrsBadge,
  pub next_review: String,
}

#[derive(Debug, Serialize)]
pub struct EntryList {
  pub folder: String,
  pub entries: Vec<EntryView>,
}

#[derive(Debug, Deserialize)]
pub struct NewEntry {
  pub title: String,
  pub content: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub pinned: bool,
}

/// `?q=&tags=&pinned=` narrowing for the entry list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
  #[serde(default)]
  pub q: String,
  /// Comma-separated; an entry must carry all of them
  #[serde(default)]
  pub tags: String,
  #[serde(default)]
  pub pinned: bool,
}

#[derive(Debug, Deserialize)]
pub struct EntryUpdate {
  pub title: String,
  pub content: String,
  #[serde(default)]
  pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDelete {
  pub indices: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BulkTag {
  pub indices: Vec<usize>,
  pub tag: String,
}

#[derive(Debug, Serialize)]
pub struct BulkDone {
  pub affected: usize,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
  pub pinned: bool,
}

#[derive(Debug, Serialize)]
pub struct Insights {
  pub duplicates: Vec<Duplicate>,
  pub related: Vec<Related>,
  pub hints: Vec<Hint>,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TagSuggestions {
  pub tags: Vec<String>,
  pub keywords: Vec<String>,
}

/// GET /api/folders/{id}/entries
///
/// Pinned entries come first; `index` is always the stored position.
pub async fn list(
  State(state): State<AppState>,
  Path(folder): Path<String>,
  Query(query): Query<ListQuery>,
) -> Result<Json<EntryList>> {
  let filter = EntryFilter::new(&query.q, &query.tags, query.pinned);
  let notebook = state.notebook()?;
  let today = notebook.today();
  let entries = notebook
    .filter_entries(&folder, &filter)?
    .into_iter()
    .map(|(index, entry)| EntryView {
      index,
      accuracy: entry.stats.accuracy(),
      maturity: Maturity::of(entry.srs.as_ref()).as_str(),
      badge: srs::srs_badge(entry.srs.as_ref(), today),
      next_review: srs::next_review_display(entry.srs.as_ref(), today),
      entry,
    })
    .collect();

  Ok(Json(EntryList { folder, entries }))
}

/// POST /api/folders/{id}/entries
pub async fn add(
  State(state): State<AppState>,
  Path(folder): Path<String>,
  Json(request): Json<NewEntry>,
) -> Result<(StatusCode, Json<AddedEntry>)> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/folders/{id}/entries".into(),
    method: "POST".into(),
  });

  let entry = Entry {
    pinned: request.pinned,
    ..Entry::new(request.title, request.content).with_tags(request.tags)
  };
  let added = state.notebook()?.add_entry(&folder, entry)?;
  Ok((StatusCode::CREATED, Json(added)))
}

/// PUT /api/folders/{id}/entries/{index}
pub async fn update(
  State(state): State<AppState>,
  Path((folder, index)): Path<(String, usize)>,
  Json(request): Json<EntryUpdate>,
) -> Result<Json<Entry>> {
  let entry = state.notebook()?.update_entry(
    &folder,
    index,
    &request.title,
    &request.content,
    &request.tags,
  )?;
  Ok(Json(entry))
}

/// POST /api/folders/{id}/entries/bulk-delete
pub async fn bulk_delete(
  State(state): State<AppState>,
  Path(folder): Path<String>,
  Json(request): Json<BulkDelete>,
) -> Result<Json<BulkDone>> {
  let affected = state.notebook()?.bulk_delete(&folder, &request.indices)?;
  Ok(Json(BulkDone { affected }))
}

/// POST /api/folders/{id}/entries/bulk-tag
pub async fn bulk_tag(
  State(state): State<AppState>,
  Path(folder): Path<String>,
  Json(request): Json<BulkTag>,
) -> Result<Json<BulkDone>> {
  let affected = state
    .notebook()?
    .bulk_add_tag(&folder, &request.indices, &request.tag)?;
  Ok(Json(BulkDone { affected }))
}

/// DELETE /api/folders/{id}/entries/{index}
pub async fn remove(
  State(state): State<AppState>,
  Path((folder, index)): Path<(String, usize)>,
) -> Result<StatusCode> {
  let removed = state.notebook()?.delete_entry(&folder, index)?;
  tracing::info!("Deleted '{}' from '{}'", removed.title, folder);
  Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/folders/{id}/entries/{index}/pin
pub async fn pin(
  State(state): State<AppState>,
  Path((folder, index)): Path<(String, usize)>,
  Json(request): Json<PinRequest>,
) -> Result<StatusCode> {
  state
    .notebook()?
    .set_pinned(&folder, index, request.pinned)?;
  Ok(StatusCode::NO_CONTENT)
}

/// GET /api/folders/{id}/entries/{index}/insights
pub async fn insights(
  State(state): State<AppState>,
  Path((folder, index)): Path<(String, usize)>,
) -> Result<Json<Insights>> {
  let notebook = state.notebook()?;
  Ok(Json(Insights {
    duplicates: notebook.duplicates(&folder, index)?,
    related: notebook.related(&folder, index)?,
    hints: notebook.hints(&folder, index)?,
  }))
}

/// POST /api/tags/suggest
pub async fn suggest_tags(Json(request): Json<TagRequest>) -> Json<TagSuggestions> {
  let text = format!("{} {}", request.title, request.content);
  Json(TagSuggestions {
    tags: smart::suggest_tags(&request.title, &request.content),
    keywords: smart::extract_keywords(&text),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;
  use crate::handlers::test_support::state_with;

  fn new_entry(title: &str, content: &str) -> Json<NewEntry> {
    Json(NewEntry {
      title: title.into(),
      content: content.into(),
      tags: vec!["verbs".into()],
      pinned: true,
    })
  }

  #[tokio::test]
  async fn test_add_then_list() {
    let state = state_with(&[("old", "first entry")]);
    let (status, Json(added)) = add(
      State(state.clone()),
      Path("default".into()),
      new_entry("new", "second entry"),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added.index, 0);

    let Json(list) = list(State(state), Path("default".into()), Query(ListQuery::default()))
      .await
      .unwrap();
    assert_eq!(list.entries.len(), 2);
    let first = &list.entries[0];
    assert_eq!(first.entry.title, "new");
    assert!(first.entry.pinned);
    assert_eq!(first.entry.tags, vec!["verbs"]);
    assert_eq!(first.maturity, "new");
    assert_eq!(first.badge.class, "due");
    assert_eq!(list.entries[1].index, 1);
  }

  #[tokio::test]
  async fn test_add_rejects_blank_entry() {
    let state = state_with(&[]);
    let err = add(State(state), Path("default".into()), new_entry("  ", "x"))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::EmptyEntry));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_pin_and_remove() {
    let state = state_with(&[("a", "1"), ("b", "2")]);
    pin(
      State(state.clone()),
      Path(("default".into(), 1)),
      Json(PinRequest { pinned: true }),
    )
    .await
    .unwrap();
    assert!(state.notebook().unwrap().entries("default").unwrap()[1].pinned);

    let status = remove(State(state.clone()), Path(("default".into(), 0)))
      .await
      .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = remove(State(state), Path(("default".into(), 7)))
      .await
      .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_unknown_folder_is_not_found() {
    let state = state_with(&[]);
    let err = list(State(state), Path("nowhere".into()), Query(ListQuery::default()))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::FolderNotFound(_)));
  }

  #[tokio::test]
  async fn test_list_filters_with_pinned_first() {
    let state = state_with(&[("go", "went"), ("see", "saw"), ("do", "did")]);
    {
      let mut notebook = state.notebook().unwrap();
      notebook.set_pinned("default", 2, true).unwrap();
      notebook.bulk_add_tag("default", &[0, 2], "Verbs").unwrap();
    }

    let Json(all) = list(
      State(state.clone()),
      Path("default".into()),
      Query(ListQuery::default()),
    )
    .await
    .unwrap();
    let indices: Vec<usize> = all.entries.iter().map(|v| v.index).collect();
    assert_eq!(indices, vec![2, 0, 1]);

    let query = ListQuery {
      q: "W".into(),
      tags: "verbs".into(),
      pinned: false,
    };
    let Json(found) = list(State(state), Path("default".into()), Query(query))
      .await
      .unwrap();
    assert_eq!(found.entries.len(), 1);
    assert_eq!(found.entries[0].entry.title, "go");
  }

  #[tokio::test]
  async fn test_update_entry() {
    let state = state_with(&[("a", "1")]);
    let Json(entry) = update(
      State(state.clone()),
      Path(("default".into(), 0)),
      Json(EntryUpdate {
        title: " b ".into(),
        content: "2".into(),
        tags: vec!["x".into()],
      }),
    )
    .await
    .unwrap();
    assert_eq!(entry.title, "b");
    assert_eq!(state.notebook().unwrap().entries("default").unwrap()[0], entry);

    let err = update(
      State(state),
      Path(("default".into(), 3)),
      Json(EntryUpdate {
        title: "c".into(),
        content: "3".into(),
        tags: vec![],
      }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn test_bulk_routes() {
    let state = state_with(&[("a", "1"), ("b", "2"), ("c", "3")]);
    let Json(tagged) = bulk_tag(
      State(state.clone()),
      Path("default".into()),
      Json(BulkTag {
        indices: vec![0, 1],
        tag: "exam".into(),
      }),
    )
    .await
    .unwrap();
    assert_eq!(tagged.affected, 2);

    let Json(deleted) = bulk_delete(
      State(state.clone()),
      Path("default".into()),
      Json(BulkDelete {
        indices: vec![0, 2],
      }),
    )
    .await
    .unwrap();
    assert_eq!(deleted.affected, 2);
    let remaining = state.notebook().unwrap().entries("default").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "b");
    assert_eq!(remaining[0].tags, vec!["exam"]);

    let err = bulk_tag(
      State(state),
      Path("default".into()),
      Json(BulkTag {
        indices: vec![0],
        tag: " ".into(),
      }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_insights() {
    let state = state_with(&[
      ("Korean verbs", "conjugation patterns"),
      ("korean verbs", "conjugation patterns!"),
    ]);
    let Json(insights) = insights(State(state), Path(("default".into(), 0)))
      .await
      .unwrap();
    assert_eq!(insights.duplicates.len(), 1);
    assert_eq!(insights.related[0].index, 1);
    assert_eq!(insights.hints[0].text, "C P");
  }

  #[tokio::test]
  async fn test_suggest_tags() {
    let Json(suggestions) = suggest_tags(Json(TagRequest {
      title: "Verbs".into(),
      content: "conjugation".into(),
    }))
    .await;
    assert_eq!(suggestions.tags, vec!["verbs", "conjugation", "language"]);
    assert_eq!(suggestions.keywords, vec!["verbs", "conjugation"]);
  }
}
