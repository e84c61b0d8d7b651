//! Handlers for `/tags` and the per-person tag set.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tags` | All tags |
//! | `POST`   | `/tags` | Body: `{"name":"…"}`; 409 on duplicate |
//! | `DELETE` | `/tags/:id` | Cascades to links; 404 if unknown |
//! | `GET`    | `/people/:id/tags` | Linked tag names |
//! | `PUT`    | `/people/:id/tags` | Full-replace tag set |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{image::ImageStore, store::CatalogStore, tag::GroupTag};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List / create / delete ───────────────────────────────────────────────────

/// `GET /tags`
pub async fn list<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<Vec<GroupTag>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  Ok(Json(tags))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /tags` — body: `{"name":"…"}`
pub async fn create<S, I>(
  State(state): State<ApiState<S, I>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("tag name must not be empty".into()));
  }

  let existing = state.store.list_tags().await.map_err(ApiError::store)?;
  if existing.iter().any(|t| t.name == name) {
    return Err(ApiError::Conflict(format!("tag {name:?} already exists")));
  }

  let tag = state.store.add_tag(name).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(tag)))
}

/// `DELETE /tags/:id`
pub async fn delete_one<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  if state.store.delete_tag(id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("tag {id} not found")))
  }
}

// ─── Per-person tag set ───────────────────────────────────────────────────────

/// `GET /people/:id/tags`
pub async fn tags_for_person<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  if state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  let names = state
    .store
    .tag_names_for(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(names))
}

#[derive(Debug, Deserialize)]
pub struct SetTagsBody {
  #[serde(default)]
  pub tags: Vec<i64>,
}

/// `PUT /people/:id/tags` — body: `{"tags":[…]}`; replaces the whole set.
pub async fn set_person_tags<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
  Json(body): Json<SetTagsBody>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  if state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  crate::people::check_tag_ids(state.store.as_ref(), &body.tags).await?;

  state
    .store
    .set_person_tags(id, &body.tags)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
