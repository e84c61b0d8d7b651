//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::CatalogStore`]
//! plus an [`roster_core::image::ImageStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(state))
//! ```

pub mod compat;
pub mod error;
pub mod people;
pub mod relations;
pub mod stats;
pub mod tags;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::{image::ImageStore, store::CatalogStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S, I> {
  pub store:  Arc<S>,
  pub images: Arc<I>,
}

// Derived Clone would demand S: Clone and I: Clone; the Arcs are enough.
impl<S, I> Clone for ApiState<S, I> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), images: self.images.clone() }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, I>(state: ApiState<S, I>) -> Router<()>
where
  S: CatalogStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: ImageStore + Send + Sync + 'static,
{
  Router::new()
    // People
    .route(
      "/people",
      get(people::list::<S, I>).post(people::create::<S, I>),
    )
    .route("/people/filter", post(people::filter::<S, I>))
    .route(
      "/people/{id}",
      get(people::get_one::<S, I>)
        .put(people::update::<S, I>)
        .delete(people::delete_one::<S, I>),
    )
    .route("/people/{id}/image", post(people::upload_image::<S, I>))
    .route(
      "/people/{id}/tags",
      get(tags::tags_for_person::<S, I>).put(tags::set_person_tags::<S, I>),
    )
    // Tags
    .route("/tags", get(tags::list::<S, I>).post(tags::create::<S, I>))
    .route("/tags/{id}", axum::routing::delete(tags::delete_one::<S, I>))
    // Relationship graph
    .route(
      "/relations",
      get(relations::list::<S, I>).post(relations::upsert::<S, I>),
    )
    .route(
      "/relations/{id}",
      axum::routing::delete(relations::delete_one::<S, I>),
    )
    .route("/relations/graph", get(relations::graph::<S, I>))
    // Compatibility
    .route("/compatibility", get(compat::handler::<S, I>))
    // Stats
    .route("/stats", get(stats::overview::<S, I>))
    .route("/stats/members", get(stats::members::<S, I>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
