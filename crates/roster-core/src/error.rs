//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(i64),

  #[error("tag not found: {0}")]
  TagNotFound(i64),

  #[error("a person cannot have a relationship with themselves: {0}")]
  SelfRelation(i64),

  #[error("unknown blood type code: {0:?}")]
  UnknownBloodType(String),

  #[error("unknown personality type code: {0:?}")]
  UnknownPersonality(String),

  #[error("unknown love type code: {0:?}")]
  UnknownLoveType(String),

  #[error("unknown relation kind code: {0:?}")]
  UnknownRelationKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
