//! Relationship edges — the undirected social graph between people.
//!
//! Every edge is stored in canonical orientation: the numerically smaller
//! person id is always the source. The pair itself is unordered; callers may
//! pass endpoints in either order and the store resolves them to the same
//! edge.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

// ─── RelationKind ────────────────────────────────────────────────────────────

/// The kind of relationship an edge represents.
///
/// The legacy codes `senpai` and `kohai` are accepted on input (old rows and
/// old clients still produce them) and resolve to [`Self::SenpaiKohai`]; they
/// were never distinct kinds, only a pre-merge spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
  Friend,
  Lover,
  Family,
  SenpaiKohai,
}

impl RelationKind {
  pub const ALL: [RelationKind; 4] =
    [Self::Friend, Self::Lover, Self::Family, Self::SenpaiKohai];

  /// The canonical code stored in the database.
  pub fn code(self) -> &'static str {
    match self {
      Self::Friend => "friend",
      Self::Lover => "lover",
      Self::Family => "family",
      Self::SenpaiKohai => "senpai_kohai",
    }
  }

  /// Human-readable display label.
  pub fn label(self) -> &'static str {
    match self {
      Self::Friend => "Friend",
      Self::Lover => "Lover",
      Self::Family => "Family",
      Self::SenpaiKohai => "Senpai / Kohai",
    }
  }
}

impl FromStr for RelationKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "friend" => Ok(Self::Friend),
      "lover" => Ok(Self::Lover),
      "family" => Ok(Self::Family),
      // Legacy aliases from before the two directions were merged.
      "senpai_kohai" | "senpai" | "kohai" => Ok(Self::SenpaiKohai),
      other => Err(Error::UnknownRelationKind(other.to_string())),
    }
  }
}

// Deserialise through `FromStr` so legacy alias codes are accepted wherever
// a kind arrives as JSON.
impl<'de> Deserialize<'de> for RelationKind {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

impl fmt::Display for RelationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

// ─── Canonical pair ──────────────────────────────────────────────────────────

/// Normalise an unordered pair of person ids to `(lo, hi)` orientation.
///
/// Rejects self-loops; the graph has no edge from a person to themselves.
pub fn canonical_pair(a: i64, b: i64) -> Result<(i64, i64), Error> {
  if a == b {
    return Err(Error::SelfRelation(a));
  }
  Ok((a.min(b), a.max(b)))
}

// ─── RelationshipEdge ────────────────────────────────────────────────────────

/// One undirected edge of the relationship graph.
///
/// Invariant: `source_id < target_id`, and at most one edge exists per
/// unordered pair (enforced by the store's uniqueness constraint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEdge {
  pub edge_id:   i64,
  pub source_id: i64,
  pub target_id: i64,
  pub kind:      RelationKind,
  pub strength:  i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonical_pair_orders_smaller_id_first() {
    assert_eq!(canonical_pair(5, 3).unwrap(), (3, 5));
    assert_eq!(canonical_pair(3, 5).unwrap(), (3, 5));
  }

  #[test]
  fn canonical_pair_rejects_self_loop() {
    assert!(matches!(canonical_pair(7, 7), Err(Error::SelfRelation(7))));
  }

  #[test]
  fn legacy_codes_resolve_to_senpai_kohai() {
    let canonical: RelationKind = "senpai_kohai".parse().unwrap();
    let senpai: RelationKind = "senpai".parse().unwrap();
    let kohai: RelationKind = "kohai".parse().unwrap();

    assert_eq!(senpai, RelationKind::SenpaiKohai);
    assert_eq!(kohai, RelationKind::SenpaiKohai);
    assert_eq!(senpai.label(), canonical.label());
    assert_eq!(kohai.label(), canonical.label());
  }

  #[test]
  fn unknown_code_is_rejected() {
    assert!("rival".parse::<RelationKind>().is_err());
  }

  #[test]
  fn kind_deserialises_legacy_alias_from_json() {
    let kind: RelationKind = serde_json::from_str("\"kohai\"").unwrap();
    assert_eq!(kind, RelationKind::SenpaiKohai);
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"senpai_kohai\"");
  }
}
