//! Person — the registered entity of the catalog.
//!
//! A person carries free-text identity fields plus three optional typed
//! attributes (blood type, personality type, love type). The typed attributes
//! drive the compatibility engine and the aggregation reporter; everything
//! else is presentation data.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─── BloodType ───────────────────────────────────────────────────────────────

/// ABO blood-type code.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum BloodType {
  A,
  B,
  O,
  Ab,
}

impl BloodType {
  pub const ALL: [BloodType; 4] = [Self::A, Self::B, Self::O, Self::Ab];

  /// The code stored in the database and exposed over the API.
  pub fn code(self) -> &'static str {
    match self {
      Self::A => "A",
      Self::B => "B",
      Self::O => "O",
      Self::Ab => "AB",
    }
  }
}

impl FromStr for BloodType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "A" => Ok(Self::A),
      "B" => Ok(Self::B),
      "O" => Ok(Self::O),
      "AB" => Ok(Self::Ab),
      other => Err(Error::UnknownBloodType(other.to_string())),
    }
  }
}

impl fmt::Display for BloodType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

// ─── Mbti ────────────────────────────────────────────────────────────────────

/// One of the sixteen four-letter personality type codes.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mbti {
  Intj,
  Intp,
  Entj,
  Entp,
  Infj,
  Infp,
  Enfj,
  Enfp,
  Istj,
  Isfj,
  Estj,
  Esfj,
  Istp,
  Isfp,
  Estp,
  Esfp,
}

impl Mbti {
  pub const ALL: [Mbti; 16] = [
    Self::Intj,
    Self::Intp,
    Self::Entj,
    Self::Entp,
    Self::Infj,
    Self::Infp,
    Self::Enfj,
    Self::Enfp,
    Self::Istj,
    Self::Isfj,
    Self::Estj,
    Self::Esfj,
    Self::Istp,
    Self::Isfp,
    Self::Estp,
    Self::Esfp,
  ];

  pub fn code(self) -> &'static str {
    match self {
      Self::Intj => "INTJ",
      Self::Intp => "INTP",
      Self::Entj => "ENTJ",
      Self::Entp => "ENTP",
      Self::Infj => "INFJ",
      Self::Infp => "INFP",
      Self::Enfj => "ENFJ",
      Self::Enfp => "ENFP",
      Self::Istj => "ISTJ",
      Self::Isfj => "ISFJ",
      Self::Estj => "ESTJ",
      Self::Esfj => "ESFJ",
      Self::Istp => "ISTP",
      Self::Isfp => "ISFP",
      Self::Estp => "ESTP",
      Self::Esfp => "ESFP",
    }
  }

  /// Display label with the common type nickname.
  pub fn label(self) -> &'static str {
    match self {
      Self::Intj => "INTJ (Architect)",
      Self::Intp => "INTP (Logician)",
      Self::Entj => "ENTJ (Commander)",
      Self::Entp => "ENTP (Debater)",
      Self::Infj => "INFJ (Advocate)",
      Self::Infp => "INFP (Mediator)",
      Self::Enfj => "ENFJ (Protagonist)",
      Self::Enfp => "ENFP (Campaigner)",
      Self::Istj => "ISTJ (Logistician)",
      Self::Isfj => "ISFJ (Defender)",
      Self::Estj => "ESTJ (Executive)",
      Self::Esfj => "ESFJ (Consul)",
      Self::Istp => "ISTP (Virtuoso)",
      Self::Isfp => "ISFP (Adventurer)",
      Self::Estp => "ESTP (Entrepreneur)",
      Self::Esfp => "ESFP (Entertainer)",
    }
  }
}

impl FromStr for Mbti {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    Self::ALL
      .into_iter()
      .find(|m| m.code() == s)
      .ok_or_else(|| Error::UnknownPersonality(s.to_string()))
  }
}

impl fmt::Display for Mbti {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

// ─── LoveType ────────────────────────────────────────────────────────────────

/// One of the sixteen secondary ("love type") codes.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoveType {
  Lcro,
  Lcre,
  Lcpo,
  Lcpe,
  Laro,
  Lare,
  Lapo,
  Lape,
  Fcro,
  Fcre,
  Fcpo,
  Fcpe,
  Faro,
  Fare,
  Fapo,
  Fape,
}

impl LoveType {
  pub const ALL: [LoveType; 16] = [
    Self::Lcro,
    Self::Lcre,
    Self::Lcpo,
    Self::Lcpe,
    Self::Laro,
    Self::Lare,
    Self::Lapo,
    Self::Lape,
    Self::Fcro,
    Self::Fcre,
    Self::Fcpo,
    Self::Fcpe,
    Self::Faro,
    Self::Fare,
    Self::Fapo,
    Self::Fape,
  ];

  pub fn code(self) -> &'static str {
    match self {
      Self::Lcro => "LCRO",
      Self::Lcre => "LCRE",
      Self::Lcpo => "LCPO",
      Self::Lcpe => "LCPE",
      Self::Laro => "LARO",
      Self::Lare => "LARE",
      Self::Lapo => "LAPO",
      Self::Lape => "LAPE",
      Self::Fcro => "FCRO",
      Self::Fcre => "FCRE",
      Self::Fcpo => "FCPO",
      Self::Fcpe => "FCPE",
      Self::Faro => "FARO",
      Self::Fare => "FARE",
      Self::Fapo => "FAPO",
      Self::Fape => "FAPE",
    }
  }
}

impl FromStr for LoveType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    Self::ALL
      .into_iter()
      .find(|l| l.code() == s)
      .ok_or_else(|| Error::UnknownLoveType(s.to_string()))
  }
}

impl fmt::Display for LoveType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A registered person. `person_id` and `created_at` are store-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:   i64,
  pub created_at:  DateTime<Utc>,
  pub name:        String,
  /// Phonetic reading of the name.
  pub reading:     String,
  /// Free-text birth string; never parsed.
  pub birth:       String,
  pub blood_type:  Option<BloodType>,
  pub personality: Option<Mbti>,
  pub love_type:   Option<LoveType>,
  pub phrase:      String,
  pub image_url:   Option<String>,
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::CatalogStore::add_person`] and
/// [`crate::store::CatalogStore::update_person`]. On update the `image_url`
/// field is ignored; images change only through
/// [`crate::store::CatalogStore::set_image_url`].
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
  pub name:        String,
  pub reading:     String,
  pub birth:       String,
  pub blood_type:  Option<BloodType>,
  pub personality: Option<Mbti>,
  pub love_type:   Option<LoveType>,
  pub phrase:      String,
  pub image_url:   Option<String>,
}

impl NewPerson {
  /// Convenience constructor with all optional fields empty.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }
}
