//! SQL schema for the kudos SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;

CREATE TABLE IF NOT EXISTS candidates (
    candidate_id INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    position     TEXT NOT NULL,
    active       INTEGER NOT NULL DEFAULT 1   -- 0 = removed; cast votes are kept for audit
);

-- One row per voter identity. The PRIMARY KEY carries the whole
-- at-most-one-vote guarantee: an insert either lands or conflicts.
CREATE TABLE IF NOT EXISTS voters (
    identity    TEXT PRIMARY KEY,
    voter_id    TEXT NOT NULL UNIQUE,
    voter_name  TEXT NOT NULL,
    voter_email TEXT,
    voted_at    TEXT NOT NULL                 -- ISO 8601 UTC; server-assigned
);

-- One row per (voter, awarded candidate); ord preserves selection order.
CREATE TABLE IF NOT EXISTS choices (
    voter_identity TEXT NOT NULL REFERENCES voters(identity) ON DELETE CASCADE,
    candidate_id   INTEGER NOT NULL REFERENCES candidates(candidate_id),
    ord            INTEGER NOT NULL,
    UNIQUE (voter_identity, candidate_id)
);

CREATE INDEX IF NOT EXISTS choices_candidate_idx ON choices(candidate_id);

PRAGMA user_version = 1;
";
