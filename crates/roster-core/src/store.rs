//! The `CatalogStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  person::{BloodType, LoveType, Mbti, NewPerson, Person},
  relation::{RelationKind, RelationshipEdge},
  tag::{GroupTag, PersonTagLink},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CatalogStore::filter_people`]. `name` is a substring
/// match; the attribute fields are exact matches. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct PersonFilter {
  pub name:        Option<String>,
  pub blood_type:  Option<BloodType>,
  pub personality: Option<Mbti>,
  pub love_type:   Option<LoveType>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster catalog backend.
///
/// Deleting a person cascades to its tag links and to every relationship
/// edge touching it; deleting a tag cascades to its links. Mutations that
/// issue more than one statement must be atomic — no half-applied state is
/// ever visible to a reader.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Create and persist a new person; the id and creation timestamp are
  /// assigned by the store.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Create a person and link the given tag set in one atomic operation.
  /// If any tag id is unknown, nothing is persisted — not even the person.
  fn add_person_with_tags<'a>(
    &'a self,
    input: NewPerson,
    tag_ids: &'a [i64],
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + 'a;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List all people, in id order.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Overwrite a person's attribute fields (everything except the image
  /// URL). Errors if the person does not exist.
  fn update_person(
    &self,
    id: i64,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Set or clear the stored image URL. Errors if the person does not
  /// exist.
  fn set_image_url(
    &self,
    id: i64,
    url: Option<String>,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Delete a person, cascading to tag links and relationship edges.
  /// Returns the deleted row so the caller can release owned resources
  /// (e.g. the stored image), or `None` if the id was unknown.
  fn delete_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// People matching `filter`; see [`PersonFilter`]. Tag filtering is a
  /// separate concern — compose with [`crate::tag::filter_by_any_tag`].
  fn filter_people<'a>(
    &'a self,
    filter: &'a PersonFilter,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  // ── Tags ──────────────────────────────────────────────────────────────

  /// Create a tag. Errors if the name is already taken.
  fn add_tag(
    &self,
    name: &str,
  ) -> impl Future<Output = Result<GroupTag, Self::Error>> + Send + '_;

  /// List all tags, in id order.
  fn list_tags(
    &self,
  ) -> impl Future<Output = Result<Vec<GroupTag>, Self::Error>> + Send + '_;

  /// Delete a tag, cascading to its links. Returns `false` if the id was
  /// unknown.
  fn delete_tag(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Tag association ───────────────────────────────────────────────────

  /// Replace the complete tag set for a person: every existing link is
  /// deleted, then one link per distinct id is inserted, atomically.
  /// Errors if the person or any tag id does not exist.
  fn set_person_tags<'a>(
    &'a self,
    person_id: i64,
    tag_ids: &'a [i64],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Names of the tags currently linked to a person; empty if none.
  fn tag_names_for(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Every person↔tag join row in the store.
  fn tag_links(
    &self,
  ) -> impl Future<Output = Result<Vec<PersonTagLink>, Self::Error>> + Send + '_;

  // ── Relationship graph ────────────────────────────────────────────────

  /// Idempotent upsert keyed by the canonical unordered pair. Endpoints
  /// may arrive in either order; a second call for the same pair updates
  /// kind and strength in place instead of inserting a duplicate. Errors
  /// on a self-loop or a missing endpoint.
  fn upsert_relation(
    &self,
    a: i64,
    b: i64,
    kind: RelationKind,
    strength: i64,
  ) -> impl Future<Output = Result<RelationshipEdge, Self::Error>> + Send + '_;

  /// Delete an edge by id. Deleting an unknown id is a silent no-op.
  fn delete_relation(
    &self,
    edge_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All edges, each already in canonical `(lo, hi)` orientation.
  fn list_relations(
    &self,
  ) -> impl Future<Output = Result<Vec<RelationshipEdge>, Self::Error>> + Send + '_;
}
