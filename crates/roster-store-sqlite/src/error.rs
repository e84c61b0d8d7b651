//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("person not found: {0}")]
  PersonNotFound(i64),

  #[error("tag not found: {0}")]
  TagNotFound(i64),

  #[error("a tag named {0:?} already exists")]
  DuplicateTag(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
