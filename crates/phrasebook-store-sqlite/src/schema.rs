//! SQL schema for the Phrasebook SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! SQLite has no array column type, so `examples` and the tag sets are
//! stored as JSON-encoded arrays; the category filter compiles to a
//! `json_each` membership predicate over `context_diversity`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS idioms (
    id                     TEXT PRIMARY KEY,
    text                   TEXT NOT NULL,
    meaning                TEXT NOT NULL,
    explanation            TEXT NOT NULL,
    examples               TEXT NOT NULL DEFAULT '[]',  -- JSON array
    frequency_of_use       REAL NOT NULL DEFAULT 0,
    literal_transparency   REAL NOT NULL DEFAULT 0,
    translation_difficulty REAL NOT NULL DEFAULT 0,
    category_theme         TEXT NOT NULL DEFAULT '[]',  -- JSON array
    sentiment              TEXT NOT NULL DEFAULT '[]',  -- JSON array
    context_diversity      TEXT NOT NULL DEFAULT '[]',  -- JSON array
    depiction              TEXT NOT NULL DEFAULT '[]',  -- JSON array
    alternative_depiction  TEXT NOT NULL DEFAULT '[]',  -- JSON array
    meaning_depiction      TEXT NOT NULL DEFAULT '[]',  -- JSON array
    favorite               INTEGER NOT NULL DEFAULT 0,
    upvotes                INTEGER NOT NULL DEFAULT 0,
    downvotes              INTEGER NOT NULL DEFAULT 0,
    created_at             TEXT NOT NULL,               -- ISO 8601 UTC
    updated_at             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id              TEXT PRIMARY KEY,
    installation_id TEXT NOT NULL,
    api_key         TEXT NOT NULL UNIQUE,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idioms_text_idx     ON idioms(text);
CREATE INDEX IF NOT EXISTS idioms_favorite_idx ON idioms(favorite);

PRAGMA user_version = 1;
";
