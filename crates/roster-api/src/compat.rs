//! Handler for `GET /compatibility?id1=…&id2=…`.

use axum::{
  Json,
  extract::{Query, State},
};
use roster_core::{compat, compat::Compatibility, image::ImageStore, store::CatalogStore};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CompatQuery {
  pub id1: i64,
  pub id2: i64,
}

/// The compatibility result plus each person's portrait, so clients can
/// render the pairing without extra lookups.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompatView {
  #[serde(flatten)]
  pub result:   Compatibility,
  pub p1_image: Option<String>,
  pub p2_image: Option<String>,
}

/// `GET /compatibility` — 404 if either person is unknown; otherwise total,
/// with `null` ranks and scores where attributes are missing.
pub async fn handler<S, I>(
  State(state): State<ApiState<S, I>>,
  Query(query): Query<CompatQuery>,
) -> Result<Json<CompatView>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let p1 = state
    .store
    .get_person(query.id1)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {} not found", query.id1)))?;
  let p2 = state
    .store
    .get_person(query.id2)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {} not found", query.id2)))?;

  let result = compat::compatibility(&p1, &p2);
  Ok(Json(CompatView {
    result,
    p1_image: p1.image_url,
    p2_image: p2.image_url,
  }))
}
