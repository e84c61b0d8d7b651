//! Handlers for the relationship graph.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/relations` | All edges |
//! | `POST`   | `/relations` | Upsert by unordered pair; returns 201 |
//! | `DELETE` | `/relations/:id` | Always 204, even if already gone |
//! | `GET`    | `/relations/graph` | Nodes and edges in one payload |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  image::ImageStore,
  relation::{RelationKind, RelationshipEdge},
  store::CatalogStore,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

// ─── Views ────────────────────────────────────────────────────────────────────

/// An edge as rendered to clients, with the display label attached.
#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeView {
  pub edge_id:   i64,
  pub source_id: i64,
  pub target_id: i64,
  pub kind:      RelationKind,
  pub label:     String,
  pub strength:  i64,
}

impl From<RelationshipEdge> for EdgeView {
  fn from(e: RelationshipEdge) -> Self {
    Self {
      edge_id:   e.edge_id,
      source_id: e.source_id,
      target_id: e.target_id,
      kind:      e.kind,
      label:     e.kind.label().to_string(),
      strength:  e.strength,
    }
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /relations`
pub async fn list<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<Vec<EdgeView>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let edges = state
    .store
    .list_relations()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(edges.into_iter().map(EdgeView::from).collect()))
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /relations`. The endpoint pair is unordered;
/// `kind` is parsed leniently so legacy alias codes still work.
#[derive(Debug, Deserialize)]
pub struct RelationBody {
  pub person1:  i64,
  pub person2:  i64,
  pub kind:     String,
  #[serde(default = "default_strength")]
  pub strength: i64,
}

fn default_strength() -> i64 {
  5
}

/// `POST /relations` — creates the pair's edge or overwrites its kind and
/// strength if one already exists. Returns 201 either way.
pub async fn upsert<S, I>(
  State(state): State<ApiState<S, I>>,
  Json(body): Json<RelationBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let kind: RelationKind = body.kind.parse().map_err(|_| {
    ApiError::BadRequest(format!("unknown relation kind {:?}", body.kind))
  })?;
  if body.person1 == body.person2 {
    return Err(ApiError::BadRequest(
      "a person cannot relate to themselves".into(),
    ));
  }
  for id in [body.person1, body.person2] {
    if state
      .store
      .get_person(id)
      .await
      .map_err(ApiError::store)?
      .is_none()
    {
      return Err(ApiError::NotFound(format!("person {id} not found")));
    }
  }

  let edge = state
    .store
    .upsert_relation(body.person1, body.person2, kind, body.strength)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(EdgeView::from(edge))))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /relations/:id` — idempotent, always 204.
pub async fn delete_one<S, I>(
  State(state): State<ApiState<S, I>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  state
    .store
    .delete_relation(id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Graph ────────────────────────────────────────────────────────────────────

/// `GET /relations/graph` — every person as a node plus every edge, shaped
/// for direct consumption by a graph renderer.
pub async fn graph<S, I>(
  State(state): State<ApiState<S, I>>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore,
{
  let people = state.store.list_people().await.map_err(ApiError::store)?;
  let edges = state
    .store
    .list_relations()
    .await
    .map_err(ApiError::store)?;

  let nodes: Vec<Value> = people
    .iter()
    .map(|p| {
      json!({
        "id": p.person_id,
        "name": p.name,
        "image": p.image_url,
      })
    })
    .collect();
  let relations: Vec<EdgeView> = edges.into_iter().map(EdgeView::from).collect();

  Ok(Json(json!({ "people": nodes, "relations": relations })))
}
