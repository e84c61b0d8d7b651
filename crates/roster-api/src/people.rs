//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | All people with their tag names |
//! | `POST`   | `/people` | Body: [`PersonBody`]; returns 201 |
//! | `POST`   | `/people/filter` | Body: [`FilterBody`] |
//! | `GET`    | `/people/:id` | 404 if not found |
//! | `PUT`    | `/people/:id` | Overwrites attributes and tag set |
//! | `DELETE` | `/people/:id` | Cascades; releases the stored image |
//! | `POST`   | `/people/:id/image` | Raw image bytes; degrades on failure |

use std::collections::HashSet;

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use roster_core::{
  image::ImageStore,
  person::{BloodType, LoveType, Mbti, NewPerson, Person},
  store::{CatalogStore, PersonFilter},
  tag::{GroupTag, PersonTagLink, filter_by_any_tag},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Views ────────────────────────────────────────────────────────────────────

/// A person plus the names of the tags linked to them.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonView {
  #[serde(flatten)]
  pub person: Person,
  pub tags:   Vec<String>,
}

fn tag_names_of(
  person_id: i64,
  tags:  &[GroupTag],
  links: &[PersonTagLink],
) -> Vec<String> {
  links
    .iter()
    .filter(|l| l.person_id == person_id)
    .filter_map(|l| tags.iter().find(|t| t.tag_id == l.tag_id))
    .map(|t| t.name.clone())
    .collect()
}

async fn view_for<S: CatalogStore>(
  store:  &S,
  person: Person,
) -> Result<PersonView, ApiError>
where
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tags = store
    .tag_names_for(person.person_id)
    .await
    .map_err(ApiError::store)?;
  Ok(PersonView { person, tags })
}

// ─── Bodies ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /people` and `PUT /people/:id`.
///
/// `image_url` is only honoured on create; updates go through the image
/// endpoint. `tags` is the complete replacement tag set.
#[derive(Debug, Deserialize)]
pub struct PersonBody {
  pub name:        String,
  #[serde(default)]
  pub reading:     String,
  #[serde(default)]
  pub birth:       String,
  pub blood_type:  Option<BloodType>,
  pub personality: Option<Mbti>,
  pub love_type:   Option<LoveType>,
  #[serde(default)]
  pub phrase:      String,
  pub image_url:   Option<String>,
  #[serde(default)]
  pub tags:        Vec<i64>,
}

impl From<&PersonBody> for NewPerson {
  fn from(b: &PersonBody) -> Self {
    NewPerson {
      name:        b.name.clone(),
      reading:     b.reading.clone(),
      birth:       b.birth.clone(),
      blood_type:  b.blood_type,
      personality: b.personality,
      love_type:   b.love_type,
      phrase:      b.phrase.clone(),
      image_url:   b.image_url.clone(),
    }
  }
}

/// Reject tag ids that don't exist with a 400 instead of an opaque 500.
pub(crate) async fn check_tag_ids<S: CatalogStore>(
  store: &S,
  ids:   &[i64],
) -> Result<(), ApiError>
where
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let known: HashSet<i64> = store
    .list_tags()
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .map(|t| t.tag_id)
    .collect();

  match ids.iter().find(|id| !known.contains(id)) {
    Some(id) => Err(ApiError::BadRequest(format!("unknown tag id {id}"))),
    None => Ok(()),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let people = state.store.list_people().await.map_err(ApiError::store)?;
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  let links = state.store.tag_links().await.map_err(ApiError::store)?;

  let views = people
    .into_iter()
    .map(|p| {
      let tags = tag_names_of(p.person_id, &tags, &links);
      PersonView { person: p, tags }
    })
    .collect();
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people` — returns 201 + the stored person with tags.
pub async fn create<S, I>(
  State(state): State<ApiState<S, I>>,
  Json(body): Json<PersonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  check_tag_ids(state.store.as_ref(), &body.tags).await?;

  // One store call: the person and their tag links commit together.
  let person = state
    .store
    .add_person_with_tags(NewPerson::from(&body), &body.tags)
    .await
    .map_err(ApiError::store)?;

  let view = view_for(state.store.as_ref(), person).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
) -> Result<Json<PersonView>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(view_for(state.store.as_ref(), person).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /people/:id` — overwrites attributes and replaces the tag set.
pub async fn update<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
  Json(body): Json<PersonBody>,
) -> Result<Json<PersonView>, ApiError>
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
  check_tag_ids(state.store.as_ref(), &body.tags).await?;

  let person = state
    .store
    .update_person(id, NewPerson::from(&body))
    .await
    .map_err(ApiError::store)?;
  state
    .store
    .set_person_tags(id, &body.tags)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(view_for(state.store.as_ref(), person).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/:id` — 204 on success; also deletes the stored image.
pub async fn delete_one<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let deleted = state
    .store
    .delete_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

  if let Some(url) = deleted.image_url {
    // Image cleanup is best effort; the person row is already gone.
    state.images.delete(&url).await;
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Filter ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /people/filter`. All fields optional;
/// `tags` filters on membership in any of the given tags (logical OR).
#[derive(Debug, Default, Deserialize)]
pub struct FilterBody {
  pub name:        Option<String>,
  pub blood_type:  Option<BloodType>,
  pub personality: Option<Mbti>,
  pub love_type:   Option<LoveType>,
  #[serde(default)]
  pub tags:        Vec<i64>,
}

/// `POST /people/filter`
pub async fn filter<S, I>(
  State(state): State<ApiState<S, I>>,
  Json(body): Json<FilterBody>,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let filter = PersonFilter {
    name:        body.name,
    blood_type:  body.blood_type,
    personality: body.personality,
    love_type:   body.love_type,
  };
  let mut people = state
    .store
    .filter_people(&filter)
    .await
    .map_err(ApiError::store)?;

  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  let links = state.store.tag_links().await.map_err(ApiError::store)?;

  if !body.tags.is_empty() {
    let wanted: HashSet<i64> = body.tags.into_iter().collect();
    people = filter_by_any_tag(&people, &links, &wanted);
  }

  let views = people
    .into_iter()
    .map(|p| {
      let tags = tag_names_of(p.person_id, &tags, &links);
      PersonView { person: p, tags }
    })
    .collect();
  Ok(Json(views))
}

// ─── Image upload ─────────────────────────────────────────────────────────────

const ALLOWED_IMAGE_TYPES: [(&str, &str); 4] = [
  ("image/png", "png"),
  ("image/jpeg", "jpg"),
  ("image/jpg", "jpg"),
  ("image/gif", "gif"),
];

/// `POST /people/:id/image` — raw image bytes, `Content-Type` required.
///
/// Upload failure is not fatal: the handler returns the person unchanged
/// (the image store logs the cause).
pub async fn upload_image<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<PersonView>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("");
  let extension = ALLOWED_IMAGE_TYPES
    .iter()
    .find(|(mime, _)| content_type.starts_with(mime))
    .map(|(_, ext)| *ext)
    .ok_or_else(|| {
      ApiError::BadRequest(format!("unsupported image type {content_type:?}"))
    })?;

  let person = state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

  let person = match state.images.store(body.to_vec(), extension).await {
    Some(url) => {
      if let Some(old) = &person.image_url {
        state.images.delete(old).await;
      }
      state
        .store
        .set_image_url(id, Some(url))
        .await
        .map_err(ApiError::store)?
    }
    // Degraded path: keep whatever image (or none) was there before.
    None => person,
  };

  Ok(Json(view_for(state.store.as_ref(), person).await?))
}
