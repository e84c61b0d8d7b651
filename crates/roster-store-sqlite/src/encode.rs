//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Typed attribute codes are
//! stored as their canonical code strings; a NULL or empty column decodes to
//! `None` (old rows used empty strings for "unset").

use chrono::{DateTime, Utc};
use roster_core::{
  person::{BloodType, LoveType, Mbti, Person},
  relation::{RelationKind, RelationshipEdge},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Attribute codes ─────────────────────────────────────────────────────────

pub fn encode_blood(b: Option<BloodType>) -> Option<&'static str> {
  b.map(BloodType::code)
}

pub fn decode_blood(s: Option<&str>) -> Result<Option<BloodType>> {
  match s {
    None | Some("") => Ok(None),
    Some(code) => Ok(Some(code.parse().map_err(Error::Core)?)),
  }
}

pub fn encode_mbti(m: Option<Mbti>) -> Option<&'static str> {
  m.map(Mbti::code)
}

pub fn decode_mbti(s: Option<&str>) -> Result<Option<Mbti>> {
  match s {
    None | Some("") => Ok(None),
    Some(code) => Ok(Some(code.parse().map_err(Error::Core)?)),
  }
}

pub fn encode_love(l: Option<LoveType>) -> Option<&'static str> {
  l.map(LoveType::code)
}

pub fn decode_love(s: Option<&str>) -> Result<Option<LoveType>> {
  match s {
    None | Some("") => Ok(None),
    Some(code) => Ok(Some(code.parse().map_err(Error::Core)?)),
  }
}

// ─── RelationKind ────────────────────────────────────────────────────────────

pub fn encode_relation_kind(k: RelationKind) -> &'static str { k.code() }

/// Decoding goes through `FromStr`, so legacy `senpai`/`kohai` rows written
/// by older versions still load (as [`RelationKind::SenpaiKohai`]).
pub fn decode_relation_kind(s: &str) -> Result<RelationKind> {
  Ok(s.parse().map_err(Error::Core)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:   i64,
  pub created_at:  String,
  pub name:        String,
  pub reading:     String,
  pub birth:       String,
  pub blood_type:  Option<String>,
  pub personality: Option<String>,
  pub love_type:   Option<String>,
  pub phrase:      String,
  pub image_url:   Option<String>,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:   self.person_id,
      created_at:  decode_dt(&self.created_at)?,
      name:        self.name,
      reading:     self.reading,
      birth:       self.birth,
      blood_type:  decode_blood(self.blood_type.as_deref())?,
      personality: decode_mbti(self.personality.as_deref())?,
      love_type:   decode_love(self.love_type.as_deref())?,
      phrase:      self.phrase,
      image_url:   self.image_url,
    })
  }
}

/// Raw strings read directly from a `relationships` row.
pub struct RawEdge {
  pub edge_id:       i64,
  pub source_id:     i64,
  pub target_id:     i64,
  pub relation_kind: String,
  pub strength:      i64,
}

impl RawEdge {
  pub fn into_edge(self) -> Result<RelationshipEdge> {
    Ok(RelationshipEdge {
      edge_id:   self.edge_id,
      source_id: self.source_id,
      target_id: self.target_id,
      kind:      decode_relation_kind(&self.relation_kind)?,
      strength:  self.strength,
    })
  }
}
