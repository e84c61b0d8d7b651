use std::{
  future::Future,
  sync::{Arc, Mutex},
};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use roster_core::image::ImageStore;
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

/// In-memory stand-in for the filesystem image store.
#[derive(Default)]
struct MemoryImages {
  stored:  Mutex<Vec<String>>,
  deleted: Mutex<Vec<String>>,
}

impl ImageStore for MemoryImages {
  fn store(
    &self,
    _bytes: Vec<u8>,
    extension: &str,
  ) -> impl Future<Output = Option<String>> + Send + '_ {
    let url = {
      let mut stored = self.stored.lock().unwrap();
      let url = format!("/uploads/test-{}.{extension}", stored.len());
      stored.push(url.clone());
      url
    };
    async move { Some(url) }
  }

  fn delete<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = ()> + Send + 'a {
    async move {
      self.deleted.lock().unwrap().push(url.to_string());
    }
  }
}

async fn make_state() -> ApiState<SqliteStore, MemoryImages> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  ApiState {
    store:  Arc::new(store),
    images: Arc::new(MemoryImages::default()),
  }
}

async fn oneshot_json(
  state:  ApiState<SqliteStore, MemoryImages>,
  method: &str,
  uri:    &str,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let req = builder.body(body).unwrap();
  let resp = api_router(state).oneshot(req).await.unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn create_person(
  state: &ApiState<SqliteStore, MemoryImages>,
  body:  Value,
) -> i64 {
  let (status, json) =
    oneshot_json(state.clone(), "POST", "/people", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
  json["person_id"].as_i64().unwrap()
}

// ── People ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_person_with_tags_returns_view() {
  let state = make_state().await;
  let (status, tag) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "band"})))
      .await;
  assert_eq!(status, StatusCode::CREATED);
  let tag_id = tag["tag_id"].as_i64().unwrap();

  let (status, json) = oneshot_json(
    state.clone(),
    "POST",
    "/people",
    Some(json!({
      "name": "Alice",
      "personality": "INTJ",
      "blood_type": "A",
      "tags": [tag_id],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(json["name"], "Alice");
  assert_eq!(json["personality"], "INTJ");
  assert_eq!(json["tags"], json!(["band"]));
}

#[tokio::test]
async fn create_person_with_unknown_tag_is_rejected() {
  let state = make_state().await;
  let (status, json) = oneshot_json(
    state,
    "POST",
    "/people",
    Some(json!({"name": "Alice", "tags": [999]})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(json["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn get_unknown_person_is_404() {
  let state = make_state().await;
  let (status, _) = oneshot_json(state, "GET", "/people/42", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_attributes_and_tag_set() {
  let state = make_state().await;
  let (_, t1) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "old"})))
      .await;
  let (_, t2) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "new"})))
      .await;
  let id = create_person(
    &state,
    json!({"name": "Alice", "tags": [t1["tag_id"]]}),
  )
  .await;

  let (status, json) = oneshot_json(
    state.clone(),
    "PUT",
    &format!("/people/{id}"),
    Some(json!({
      "name": "Alicia",
      "blood_type": "O",
      "tags": [t2["tag_id"]],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["name"], "Alicia");
  assert_eq!(json["blood_type"], "O");
  assert_eq!(json["tags"], json!(["new"]));
}

#[tokio::test]
async fn filter_combines_attributes_and_tags() {
  let state = make_state().await;
  let (_, tag) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "band"})))
      .await;
  let tag_id = tag["tag_id"].as_i64().unwrap();

  create_person(&state, json!({"name": "Alice", "blood_type": "A", "tags": [tag_id]}))
    .await;
  create_person(&state, json!({"name": "Albert", "blood_type": "A"})).await;
  create_person(&state, json!({"name": "Bob", "blood_type": "B", "tags": [tag_id]}))
    .await;

  let (status, json) = oneshot_json(
    state,
    "POST",
    "/people/filter",
    Some(json!({"blood_type": "A", "tags": [tag_id]})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<&str> = json
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, vec!["Alice"]);
}

// ── Tags ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_tag_name_is_409() {
  let state = make_state().await;
  let (status, _) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "band"})))
      .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, json) =
    oneshot_json(state, "POST", "/tags", Some(json!({"name": "band"}))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(json["error"].as_str().unwrap().contains("band"));
}

#[tokio::test]
async fn put_person_tags_replaces_the_whole_set() {
  let state = make_state().await;
  let (_, t1) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "a"})))
      .await;
  let (_, t2) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "b"})))
      .await;
  let id =
    create_person(&state, json!({"name": "Alice", "tags": [t1["tag_id"]]}))
      .await;

  let (status, _) = oneshot_json(
    state.clone(),
    "PUT",
    &format!("/people/{id}/tags"),
    Some(json!({"tags": [t2["tag_id"]]})),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, names) =
    oneshot_json(state, "GET", &format!("/people/{id}/tags"), None).await;
  assert_eq!(names, json!(["b"]));
}

#[tokio::test]
async fn delete_unknown_tag_is_404() {
  let state = make_state().await;
  let (status, _) = oneshot_json(state, "DELETE", "/tags/7", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Relations ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn relation_upsert_is_canonical_and_idempotent() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let b = create_person(&state, json!({"name": "Bob"})).await;

  // Reversed endpoint order on purpose.
  let (status, edge) = oneshot_json(
    state.clone(),
    "POST",
    "/relations",
    Some(json!({"person1": b, "person2": a, "kind": "friend", "strength": 7})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(edge["source_id"].as_i64().unwrap(), a.min(b));
  assert_eq!(edge["target_id"].as_i64().unwrap(), a.max(b));
  assert_eq!(edge["kind"], "friend");
  assert_eq!(edge["label"], "Friend");

  // Same pair again overwrites in place.
  let (status, edge2) = oneshot_json(
    state.clone(),
    "POST",
    "/relations",
    Some(json!({"person1": a, "person2": b, "kind": "lover", "strength": 9})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(edge2["edge_id"], edge["edge_id"]);
  assert_eq!(edge2["kind"], "lover");
  assert_eq!(edge2["strength"], 9);

  let (_, all) = oneshot_json(state, "GET", "/relations", None).await;
  assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn relation_self_loop_is_400() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let (status, _) = oneshot_json(
    state,
    "POST",
    "/relations",
    Some(json!({"person1": a, "person2": a, "kind": "friend"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn relation_unknown_kind_is_400() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let b = create_person(&state, json!({"name": "Bob"})).await;
  let (status, json) = oneshot_json(
    state,
    "POST",
    "/relations",
    Some(json!({"person1": a, "person2": b, "kind": "rival"})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(json["error"].as_str().unwrap().contains("rival"));
}

#[tokio::test]
async fn relation_legacy_alias_is_accepted() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let b = create_person(&state, json!({"name": "Bob"})).await;
  let (status, edge) = oneshot_json(
    state,
    "POST",
    "/relations",
    Some(json!({"person1": a, "person2": b, "kind": "senpai"})),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(edge["kind"], "senpai_kohai");
  assert_eq!(edge["label"], "Senpai / Kohai");
}

#[tokio::test]
async fn relation_unknown_endpoint_is_404() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let (status, _) = oneshot_json(
    state,
    "POST",
    "/relations",
    Some(json!({"person1": a, "person2": 999, "kind": "friend"})),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn relation_delete_is_idempotent() {
  let state = make_state().await;
  let (status, _) = oneshot_json(state, "DELETE", "/relations/42", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn graph_includes_nodes_and_edges() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let b = create_person(&state, json!({"name": "Bob"})).await;
  oneshot_json(
    state.clone(),
    "POST",
    "/relations",
    Some(json!({"person1": a, "person2": b, "kind": "family", "strength": 3})),
  )
  .await;

  let (status, json) =
    oneshot_json(state, "GET", "/relations/graph", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["people"].as_array().unwrap().len(), 2);
  assert_eq!(json["relations"].as_array().unwrap().len(), 1);
  assert_eq!(json["relations"][0]["label"], "Family");
}

// ── Compatibility ────────────────────────────────────────────────────────────

#[tokio::test]
async fn compatibility_best_match_scores_100() {
  let state = make_state().await;
  let a = create_person(
    &state,
    json!({"name": "Alice", "personality": "INTJ", "blood_type": "A"}),
  )
  .await;
  let b = create_person(
    &state,
    json!({"name": "Bob", "personality": "ESFJ", "blood_type": "O"}),
  )
  .await;

  let (status, json) = oneshot_json(
    state,
    "GET",
    &format!("/compatibility?id1={a}&id2={b}"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["p1_name"], "Alice");
  assert_eq!(json["personality_rank"], 1);
  assert_eq!(json["personality_score"], 100);
  // A ranks O first.
  assert_eq!(json["blood_rank"], 1);
  assert_eq!(json["blood_score"], 95);
}

#[tokio::test]
async fn compatibility_with_missing_attributes_degrades() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let b = create_person(
    &state,
    json!({"name": "Bob", "personality": "ESFJ", "blood_type": "O"}),
  )
  .await;

  let (status, json) = oneshot_json(
    state,
    "GET",
    &format!("/compatibility?id1={a}&id2={b}"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["personality_rank"], Value::Null);
  assert_eq!(json["personality_score"], Value::Null);
  assert_eq!(json["blood_score"], Value::Null);
  assert_eq!(
    json["personality_comment"],
    roster_core::compat::NO_DATA_COMMENT
  );
}

#[tokio::test]
async fn compatibility_with_unknown_person_is_404() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice"})).await;
  let (status, _) = oneshot_json(
    state,
    "GET",
    &format!("/compatibility?id1={a}&id2=999"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Stats ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_overview_counts_by_code() {
  let state = make_state().await;
  let (_, tag) =
    oneshot_json(state.clone(), "POST", "/tags", Some(json!({"name": "band"})))
      .await;
  let tag_id = tag["tag_id"].as_i64().unwrap();

  create_person(
    &state,
    json!({"name": "Alice", "blood_type": "A", "personality": "INTJ", "tags": [tag_id]}),
  )
  .await;
  create_person(&state, json!({"name": "Bob", "blood_type": "A"})).await;
  create_person(&state, json!({"name": "Carol"})).await;

  let (status, json) = oneshot_json(state, "GET", "/stats", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json["total"], 3);
  assert_eq!(json["blood_type"]["A"], 2);
  assert_eq!(json["personality"]["INTJ"], 1);
  assert_eq!(json["tags"]["band"], 1);
  // Unset attributes are skipped, not counted under an empty key.
  assert!(json["blood_type"].as_object().unwrap().get("").is_none());
}

#[tokio::test]
async fn stats_members_drills_into_one_bucket() {
  let state = make_state().await;
  let a = create_person(&state, json!({"name": "Alice", "personality": "INTJ"}))
    .await;
  create_person(&state, json!({"name": "Bob", "personality": "ESFP"})).await;

  let (status, json) = oneshot_json(
    state,
    "GET",
    "/stats/members?category=mbti&value=INTJ",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json, json!([{"id": a, "name": "Alice"}]));
}

#[tokio::test]
async fn stats_members_unknown_category_is_empty() {
  let state = make_state().await;
  create_person(&state, json!({"name": "Alice"})).await;
  let (status, json) = oneshot_json(
    state,
    "GET",
    "/stats/members?category=zodiac&value=A",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(json, json!([]));
}

// ── Images ───────────────────────────────────────────────────────────────────

async fn upload_image(
  state: ApiState<SqliteStore, MemoryImages>,
  id:    i64,
  mime:  &str,
) -> (StatusCode, Value) {
  let req = Request::builder()
    .method("POST")
    .uri(format!("/people/{id}/image"))
    .header(header::CONTENT_TYPE, mime)
    .body(Body::from(vec![0u8; 16]))
    .unwrap();
  let resp = api_router(state).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn image_upload_sets_url_and_replaces_old() {
  let state = make_state().await;
  let id = create_person(&state, json!({"name": "Alice"})).await;

  let (status, json) = upload_image(state.clone(), id, "image/png").await;
  assert_eq!(status, StatusCode::OK);
  let first = json["image_url"].as_str().unwrap().to_string();
  assert!(first.ends_with(".png"));

  let (_, json) = upload_image(state.clone(), id, "image/jpeg").await;
  let second = json["image_url"].as_str().unwrap();
  assert!(second.ends_with(".jpg"));
  assert_ne!(first, second);
  assert!(state.images.deleted.lock().unwrap().contains(&first));
}

#[tokio::test]
async fn image_upload_rejects_unknown_type() {
  let state = make_state().await;
  let id = create_person(&state, json!({"name": "Alice"})).await;
  let (status, _) = upload_image(state, id, "text/plain").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_person_releases_their_image() {
  let state = make_state().await;
  let id = create_person(&state, json!({"name": "Alice"})).await;
  let (_, json) = upload_image(state.clone(), id, "image/png").await;
  let url = json["image_url"].as_str().unwrap().to_string();

  let (status, _) =
    oneshot_json(state.clone(), "DELETE", &format!("/people/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(state.images.deleted.lock().unwrap().contains(&url));
}
