//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,       -- ISO 8601 UTC; store-assigned
    name        TEXT NOT NULL,
    reading     TEXT NOT NULL DEFAULT '',
    birth       TEXT NOT NULL DEFAULT '',
    blood_type  TEXT,                -- 'A' | 'B' | 'O' | 'AB' | NULL
    personality TEXT,                -- sixteen four-letter codes | NULL
    love_type   TEXT,                -- sixteen four-letter codes | NULL
    phrase      TEXT NOT NULL DEFAULT '',
    image_url   TEXT
);

CREATE TABLE IF NOT EXISTS group_tags (
    tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name   TEXT NOT NULL UNIQUE
);

-- Join rows follow full-replace update semantics; the composite key makes
-- a duplicate (person, tag) pair impossible even under a buggy writer.
CREATE TABLE IF NOT EXISTS person_tags (
    person_id INTEGER NOT NULL REFERENCES people(person_id)   ON DELETE CASCADE,
    tag_id    INTEGER NOT NULL REFERENCES group_tags(tag_id)  ON DELETE CASCADE,
    PRIMARY KEY (person_id, tag_id)
);

-- Undirected edges stored in canonical orientation: source_id < target_id.
-- The UNIQUE pair constraint is what makes the upsert safe against
-- concurrent writers racing on the same pair.
CREATE TABLE IF NOT EXISTS relationships (
    edge_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id     INTEGER NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    target_id     INTEGER NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    relation_kind TEXT    NOT NULL,
    strength      INTEGER NOT NULL,
    UNIQUE (source_id, target_id),
    CHECK  (source_id < target_id)
);

CREATE INDEX IF NOT EXISTS person_tags_tag_idx    ON person_tags(tag_id);
CREATE INDEX IF NOT EXISTS relationships_src_idx  ON relationships(source_id);
CREATE INDEX IF NOT EXISTS relationships_tgt_idx  ON relationships(target_id);

PRAGMA user_version = 1;
";
