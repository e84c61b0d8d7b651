//! Handlers for `/stats` — aggregate counts and member drill-downs.

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Query, State},
};
use roster_core::{
  image::ImageStore,
  report::{self, Member},
  store::CatalogStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// Frequency counts over the whole catalog, keyed by attribute code or tag
/// name. People with an attribute unset are left out of that tally.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsView {
  pub total:       usize,
  pub personality: HashMap<String, usize>,
  pub love_type:   HashMap<String, usize>,
  pub blood_type:  HashMap<String, usize>,
  pub tags:        HashMap<String, usize>,
}

/// `GET /stats`
pub async fn overview<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<StatsView>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let people = state.store.list_people().await.map_err(ApiError::store)?;
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  let links = state.store.tag_links().await.map_err(ApiError::store)?;

  let view = StatsView {
    total:       people.len(),
    personality: report::count_by_attribute(&people, |p| {
      p.personality.map(|m| m.code().to_string())
    }),
    love_type:   report::count_by_attribute(&people, |p| {
      p.love_type.map(|l| l.code().to_string())
    }),
    blood_type:  report::count_by_attribute(&people, |p| {
      p.blood_type.map(|b| b.code().to_string())
    }),
    tags:        report::count_by_tag(&tags, &links),
  };
  Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct MembersQuery {
  pub category: String,
  pub value:    String,
}

/// `GET /stats/members?category=…&value=…` — the people behind one count.
///
/// Unknown categories and unmatched values both answer with an empty list.
pub async fn members<S, I>(
  State(state): State<ApiState<S, I>>,
  Query(query): Query<MembersQuery>,
) -> Result<Json<Vec<Member>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let people = state.store.list_people().await.map_err(ApiError::store)?;
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  let links = state.store.tag_links().await.map_err(ApiError::store)?;

  let members =
    report::members_for(&query.category, &query.value, &people, &tags, &links);
  Ok(Json(members))
}
