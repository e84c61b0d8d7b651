//! Core types and trait definitions for the Roster people catalog.
//!
//! Everything here is storage- and transport-agnostic: no HTTP, no database.
//! The other workspace crates all depend on this one.

// Store impls use native `async fn` against the `impl Future` trait methods.
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod compat;
pub mod error;
pub mod image;
pub mod person;
pub mod relation;
pub mod report;
pub mod store;
pub mod tag;

pub use error::{Error, Result};
