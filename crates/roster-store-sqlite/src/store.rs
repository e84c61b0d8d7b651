//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::{collections::BTreeSet, future::Future, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  person::{NewPerson, Person},
  relation::{RelationKind, RelationshipEdge, canonical_pair},
  store::{CatalogStore, PersonFilter},
  tag::{GroupTag, PersonTagLink},
};

use crate::{
  Error, Result,
  encode::{
    RawEdge, RawPerson, encode_blood, encode_dt, encode_love, encode_mbti,
    encode_relation_kind,
  },
  schema::SCHEMA,
};

const PERSON_COLS: &str = "person_id, created_at, name, reading, birth, \
                           blood_type, personality, love_type, phrase, image_url";

fn raw_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:   row.get(0)?,
    created_at:  row.get(1)?,
    name:        row.get(2)?,
    reading:     row.get(3)?,
    birth:       row.get(4)?,
    blood_type:  row.get(5)?,
    personality: row.get(6)?,
    love_type:   row.get(7)?,
    phrase:      row.get(8)?,
    image_url:   row.get(9)?,
  })
}

fn raw_edge(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEdge> {
  Ok(RawEdge {
    edge_id:       row.get(0)?,
    source_id:     row.get(1)?,
    target_id:     row.get(2)?,
    relation_kind: row.get(3)?,
    strength:      row.get(4)?,
  })
}

fn person_exists(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM people WHERE person_id = ?1",
        rusqlite::params![id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

// Closure-local outcomes: tokio_rusqlite closures can only fail with its own
// error type, so domain conditions travel out as values.
enum TagReplace {
  Done,
  MissingPerson,
  MissingTag(i64),
}

enum PersonCreate {
  Done(i64),
  MissingTag(i64),
}

enum Upsert {
  Done(RawEdge),
  MissingPerson(i64),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);

    let name = input.name.clone();
    let reading = input.reading.clone();
    let birth = input.birth.clone();
    let blood = encode_blood(input.blood_type);
    let mbti = encode_mbti(input.personality);
    let love = encode_love(input.love_type);
    let phrase = input.phrase.clone();
    let image_url = input.image_url.clone();

    let person_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (
             created_at, name, reading, birth,
             blood_type, personality, love_type, phrase, image_url
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            at_str, name, reading, birth, blood, mbti, love, phrase, image_url,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Person {
      person_id,
      created_at,
      name:        input.name,
      reading:     input.reading,
      birth:       input.birth,
      blood_type:  input.blood_type,
      personality: input.personality,
      love_type:   input.love_type,
      phrase:      input.phrase,
      image_url:   input.image_url,
    })
  }

  async fn add_person_with_tags(
    &self,
    input: NewPerson,
    tag_ids: &[i64],
  ) -> Result<Person> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);

    let name = input.name.clone();
    let reading = input.reading.clone();
    let birth = input.birth.clone();
    let blood = encode_blood(input.blood_type);
    let mbti = encode_mbti(input.personality);
    let love = encode_love(input.love_type);
    let phrase = input.phrase.clone();
    let image_url = input.image_url.clone();

    let distinct: Vec<i64> = tag_ids
      .iter()
      .copied()
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO people (
             created_at, name, reading, birth,
             blood_type, personality, love_type, phrase, image_url
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            at_str, name, reading, birth, blood, mbti, love, phrase, image_url,
          ],
        )?;
        let person_id = tx.last_insert_rowid();

        for tag_id in &distinct {
          let known: Option<i64> = tx
            .query_row(
              "SELECT tag_id FROM group_tags WHERE tag_id = ?1",
              rusqlite::params![tag_id],
              |row| row.get(0),
            )
            .optional()?;
          if known.is_none() {
            // Dropping the transaction rolls the person insert back too.
            return Ok(PersonCreate::MissingTag(*tag_id));
          }
          tx.execute(
            "INSERT INTO person_tags (person_id, tag_id) VALUES (?1, ?2)",
            rusqlite::params![person_id, tag_id],
          )?;
        }

        tx.commit()?;
        Ok(PersonCreate::Done(person_id))
      })
      .await?;

    match outcome {
      PersonCreate::Done(person_id) => Ok(Person {
        person_id,
        created_at,
        name:        input.name,
        reading:     input.reading,
        birth:       input.birth,
        blood_type:  input.blood_type,
        personality: input.personality,
        love_type:   input.love_type,
        phrase:      input.phrase,
        image_url:   input.image_url,
      }),
      PersonCreate::MissingTag(id) => Err(Error::TagNotFound(id)),
    }
  }

  async fn get_person(&self, id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM people WHERE person_id = ?1"),
              rusqlite::params![id],
              raw_person,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PERSON_COLS} FROM people ORDER BY person_id"))?;
        let rows = stmt
          .query_map([], raw_person)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update_person(&self, id: i64, input: NewPerson) -> Result<Person> {
    let name = input.name;
    let reading = input.reading;
    let birth = input.birth;
    let blood = encode_blood(input.blood_type);
    let mbti = encode_mbti(input.personality);
    let love = encode_love(input.love_type);
    let phrase = input.phrase;

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE people SET
             name = ?1, reading = ?2, birth = ?3,
             blood_type = ?4, personality = ?5, love_type = ?6, phrase = ?7
           WHERE person_id = ?8",
          rusqlite::params![name, reading, birth, blood, mbti, love, phrase, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM people WHERE person_id = ?1"),
              rusqlite::params![id],
              raw_person,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::PersonNotFound(id))
      .and_then(RawPerson::into_person)
  }

  async fn set_image_url(&self, id: i64, url: Option<String>) -> Result<Person> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE people SET image_url = ?1 WHERE person_id = ?2",
          rusqlite::params![url, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM people WHERE person_id = ?1"),
              rusqlite::params![id],
              raw_person,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .ok_or(Error::PersonNotFound(id))
      .and_then(RawPerson::into_person)
  }

  async fn delete_person(&self, id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!("SELECT {PERSON_COLS} FROM people WHERE person_id = ?1"),
            rusqlite::params![id],
            raw_person,
          )
          .optional()?;

        if existing.is_some() {
          // Tag links and relationship edges go with it via ON DELETE CASCADE.
          conn.execute(
            "DELETE FROM people WHERE person_id = ?1",
            rusqlite::params![id],
          )?;
        }
        Ok(existing)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn filter_people(&self, filter: &PersonFilter) -> Result<Vec<Person>> {
    let name_pattern = filter.name.as_deref().map(|n| format!("%{n}%"));
    let blood = encode_blood(filter.blood_type);
    let mbti = encode_mbti(filter.personality);
    let love = encode_love(filter.love_type);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLS} FROM people
           WHERE (?1 IS NULL OR name LIKE ?1)
             AND (?2 IS NULL OR blood_type = ?2)
             AND (?3 IS NULL OR personality = ?3)
             AND (?4 IS NULL OR love_type = ?4)
           ORDER BY person_id"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![name_pattern, blood, mbti, love],
            raw_person,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Tags ──────────────────────────────────────────────────────────────────

  fn add_tag(
    &self,
    name: &str,
  ) -> impl Future<Output = Result<GroupTag>> + Send + '_ {
    let name = name.to_owned();
    async move {
      let insert_name = name.clone();

      let tag_id: Option<i64> = self
        .conn
        .call(move |conn| {
          let taken: Option<i64> = conn
            .query_row(
              "SELECT tag_id FROM group_tags WHERE name = ?1",
              rusqlite::params![insert_name],
              |row| row.get(0),
            )
            .optional()?;
          if taken.is_some() {
            return Ok(None);
          }
          conn.execute(
            "INSERT INTO group_tags (name) VALUES (?1)",
            rusqlite::params![insert_name],
          )?;
          Ok(Some(conn.last_insert_rowid()))
        })
        .await?;

      match tag_id {
        Some(tag_id) => Ok(GroupTag { tag_id, name }),
        None => Err(Error::DuplicateTag(name)),
      }
    }
  }

  async fn list_tags(&self) -> Result<Vec<GroupTag>> {
    let tags = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT tag_id, name FROM group_tags ORDER BY tag_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(GroupTag { tag_id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tags)
  }

  async fn delete_tag(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "DELETE FROM group_tags WHERE tag_id = ?1",
          rusqlite::params![id],
        )?;
        Ok(changed > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Tag association ───────────────────────────────────────────────────────

  async fn set_person_tags(&self, person_id: i64, tag_ids: &[i64]) -> Result<()> {
    // Dedup up front; at most one link per (person, tag) pair.
    let distinct: Vec<i64> = tag_ids
      .iter()
      .copied()
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !person_exists(&tx, person_id)? {
          return Ok(TagReplace::MissingPerson);
        }
        for tag_id in &distinct {
          let known: Option<i64> = tx
            .query_row(
              "SELECT tag_id FROM group_tags WHERE tag_id = ?1",
              rusqlite::params![tag_id],
              |row| row.get(0),
            )
            .optional()?;
          if known.is_none() {
            return Ok(TagReplace::MissingTag(*tag_id));
          }
        }

        // Full replace: drop everything, reinsert the new set.
        tx.execute(
          "DELETE FROM person_tags WHERE person_id = ?1",
          rusqlite::params![person_id],
        )?;
        for tag_id in &distinct {
          tx.execute(
            "INSERT INTO person_tags (person_id, tag_id) VALUES (?1, ?2)",
            rusqlite::params![person_id, tag_id],
          )?;
        }

        tx.commit()?;
        Ok(TagReplace::Done)
      })
      .await?;

    match outcome {
      TagReplace::Done => Ok(()),
      TagReplace::MissingPerson => Err(Error::PersonNotFound(person_id)),
      TagReplace::MissingTag(id) => Err(Error::TagNotFound(id)),
    }
  }

  async fn tag_names_for(&self, person_id: i64) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.name
           FROM person_tags pt
           JOIN group_tags t ON t.tag_id = pt.tag_id
           WHERE pt.person_id = ?1
           ORDER BY t.tag_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }

  async fn tag_links(&self) -> Result<Vec<PersonTagLink>> {
    let links = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, tag_id FROM person_tags ORDER BY person_id, tag_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PersonTagLink { person_id: row.get(0)?, tag_id: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(links)
  }

  // ── Relationship graph ────────────────────────────────────────────────────

  async fn upsert_relation(
    &self,
    a:        i64,
    b:        i64,
    kind:     RelationKind,
    strength: i64,
  ) -> Result<RelationshipEdge> {
    let (lo, hi) = canonical_pair(a, b).map_err(Error::Core)?;
    let kind_str = encode_relation_kind(kind);

    let outcome = self
      .conn
      .call(move |conn| {
        for id in [lo, hi] {
          if !person_exists(conn, id)? {
            return Ok(Upsert::MissingPerson(id));
          }
        }

        // The UNIQUE (source_id, target_id) constraint turns a second insert
        // for the same pair into an in-place update.
        conn.execute(
          "INSERT INTO relationships (source_id, target_id, relation_kind, strength)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (source_id, target_id) DO UPDATE SET
             relation_kind = excluded.relation_kind,
             strength      = excluded.strength",
          rusqlite::params![lo, hi, kind_str, strength],
        )?;

        let raw = conn.query_row(
          "SELECT edge_id, source_id, target_id, relation_kind, strength
           FROM relationships WHERE source_id = ?1 AND target_id = ?2",
          rusqlite::params![lo, hi],
          raw_edge,
        )?;
        Ok(Upsert::Done(raw))
      })
      .await?;

    match outcome {
      Upsert::Done(raw) => raw.into_edge(),
      Upsert::MissingPerson(id) => Err(Error::PersonNotFound(id)),
    }
  }

  async fn delete_relation(&self, edge_id: i64) -> Result<()> {
    // Idempotent: deleting an unknown edge is not an error.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM relationships WHERE edge_id = ?1",
          rusqlite::params![edge_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_relations(&self) -> Result<Vec<RelationshipEdge>> {
    let raws: Vec<RawEdge> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT edge_id, source_id, target_id, relation_kind, strength
           FROM relationships ORDER BY edge_id",
        )?;
        let rows = stmt
          .query_map([], raw_edge)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEdge::into_edge).collect()
  }
}
