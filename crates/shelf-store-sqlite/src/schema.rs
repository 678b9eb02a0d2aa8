//! SQL schema for the shelf SQLite store.
//!
//! Executed at connection startup. The version is recorded in
//! `PRAGMA user_version`; there are no migrations beyond version 1.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
-- Books are strictly append-only.
-- `author` is a display name, not a reference into `authors`.
-- `search_count` is never written after insert.
CREATE TABLE IF NOT EXISTS books (
    id           INTEGER PRIMARY KEY,
    title        TEXT NOT NULL,
    author       TEXT NOT NULL,
    language     TEXT,
    year         INTEGER,
    search_count INTEGER DEFAULT 0
);

-- One row per distinct name; first write wins.
CREATE TABLE IF NOT EXISTS authors (
    id         INTEGER PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    birth_date TEXT,
    death_date TEXT
);

PRAGMA user_version = 1;
";
