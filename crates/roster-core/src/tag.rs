//! Group tags and the person↔tag association.
//!
//! Tags are a flat namespace of unique names. The association to people is a
//! plain join row with full-replace update semantics; there is no partial or
//! incremental tagging at this layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::person::Person;

/// A user-defined group tag with a unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTag {
  pub tag_id: i64,
  pub name:   String,
}

/// One person↔tag join row. At most one exists per `(person_id, tag_id)`
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonTagLink {
  pub person_id: i64,
  pub tag_id:    i64,
}

/// Keep only the people linked to at least one of `tag_ids` (logical OR).
///
/// An empty `tag_ids` set means "no tag filter" and returns everyone.
pub fn filter_by_any_tag(
  people:  &[Person],
  links:   &[PersonTagLink],
  tag_ids: &HashSet<i64>,
) -> Vec<Person> {
  if tag_ids.is_empty() {
    return people.to_vec();
  }

  let tagged: HashSet<i64> = links
    .iter()
    .filter(|l| tag_ids.contains(&l.tag_id))
    .map(|l| l.person_id)
    .collect();

  people
    .iter()
    .filter(|p| tagged.contains(&p.person_id))
    .cloned()
    .collect()
}
