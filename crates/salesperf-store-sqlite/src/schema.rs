//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Canonical records. `bonus` is written for readers of the raw table; the
-- store re-derives it on every read.
CREATE TABLE IF NOT EXISTS performance_records (
    record_id    TEXT PRIMARY KEY,
    category     TEXT NOT NULL,
    target_value REAL NOT NULL,
    actual_value REAL NOT NULL,
    year         INTEGER NOT NULL,
    bonus        INTEGER NOT NULL
);

-- Salesman documents. `records_json` holds the embedded snapshot list as a
-- JSON array of {rid, category, targetValue, actualValue, year, bonus}.
CREATE TABLE IF NOT EXISTS salesmen (
    salesman_id  TEXT PRIMARY KEY,
    firstname    TEXT NOT NULL,
    lastname     TEXT NOT NULL,
    records_json TEXT NOT NULL DEFAULT '[]'
);

PRAGMA user_version = 1;
";
