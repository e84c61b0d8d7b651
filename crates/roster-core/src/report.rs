//! Aggregation reporter — frequency counts over the full person set.
//!
//! Read-only and forgiving: records with a missing attribute are silently
//! skipped, and an unknown member-lookup category yields an empty result
//! rather than an error.

use std::{
  collections::HashMap,
  hash::Hash,
};

use serde::{Deserialize, Serialize};

use crate::{
  person::Person,
  tag::{GroupTag, PersonTagLink},
};

/// An `(id, name)` pair returned by [`members_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
  pub id:   i64,
  pub name: String,
}

/// Tally the distinct non-empty values of one selected attribute.
pub fn count_by_attribute<T, F>(
  people: &[Person],
  select: F,
) -> HashMap<T, usize>
where
  T: Eq + Hash,
  F: Fn(&Person) -> Option<T>,
{
  let mut counts = HashMap::new();
  for person in people {
    if let Some(value) = select(person) {
      *counts.entry(value).or_insert(0) += 1;
    }
  }
  counts
}

/// Tally, per tag name, the number of distinct people linked to it.
///
/// Tags with no links are omitted, matching a join-then-group-by count.
pub fn count_by_tag(
  tags:  &[GroupTag],
  links: &[PersonTagLink],
) -> HashMap<String, usize> {
  let mut per_tag: HashMap<i64, usize> = HashMap::new();
  // Links are unique per (person, tag) pair, so counting rows counts people.
  for link in links {
    *per_tag.entry(link.tag_id).or_insert(0) += 1;
  }

  tags
    .iter()
    .filter_map(|t| per_tag.get(&t.tag_id).map(|n| (t.name.clone(), *n)))
    .collect()
}

/// The people matching one category/value selection, as `(id, name)` pairs.
///
/// Categories: `mbti`, `love`, and `blood` filter on attribute equality
/// against the code string; `tag` filters on membership in the named tag.
/// Any other category returns an empty sequence.
pub fn members_for(
  category: &str,
  value:    &str,
  people:   &[Person],
  tags:     &[GroupTag],
  links:    &[PersonTagLink],
) -> Vec<Member> {
  let matches: Vec<&Person> = match category {
    "mbti" => people
      .iter()
      .filter(|p| p.personality.is_some_and(|m| m.code() == value))
      .collect(),
    "love" => people
      .iter()
      .filter(|p| p.love_type.is_some_and(|l| l.code() == value))
      .collect(),
    "blood" => people
      .iter()
      .filter(|p| p.blood_type.is_some_and(|b| b.code() == value))
      .collect(),
    "tag" => {
      let Some(tag) = tags.iter().find(|t| t.name == value) else {
        return Vec::new();
      };
      let member_ids: Vec<i64> = links
        .iter()
        .filter(|l| l.tag_id == tag.tag_id)
        .map(|l| l.person_id)
        .collect();
      people
        .iter()
        .filter(|p| member_ids.contains(&p.person_id))
        .collect()
    }
    _ => Vec::new(),
  };

  matches
    .into_iter()
    .map(|p| Member { id: p.person_id, name: p.name.clone() })
    .collect()
}
