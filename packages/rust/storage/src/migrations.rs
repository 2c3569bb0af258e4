//! SQL migration definitions for the EndorseTrack database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a set of SQL statements executed within a transaction.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: imports, endorsers, endorsements",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version   INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- One row per bulk document import (provenance)
CREATE TABLE IF NOT EXISTS imports (
    id           TEXT PRIMARY KEY,
    slug         TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    text         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_imports_slug ON imports(slug);

-- Known endorsing entities (the registry; read-only during resolution)
CREATE TABLE IF NOT EXISTS endorsers (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    slug TEXT
);

CREATE INDEX IF NOT EXISTS idx_endorsers_name ON endorsers(name);

-- Extracted endorsement records; (raw_text, sections) is the dedup key
CREATE TABLE IF NOT EXISTS endorsements (
    id                TEXT PRIMARY KEY,
    import_id         TEXT NOT NULL REFERENCES imports(id) ON DELETE CASCADE,
    raw_text          TEXT NOT NULL,
    sections          TEXT NOT NULL,
    endorser_name     TEXT,
    endorser_detail   TEXT NOT NULL DEFAULT '',
    citation_url      TEXT,
    citation_name     TEXT,
    citation_date_raw TEXT,
    endorsed_on       TEXT,
    resolved_endorser INTEGER REFERENCES endorsers(id),
    created_at        TEXT NOT NULL,
    UNIQUE(raw_text, sections)
);

CREATE INDEX IF NOT EXISTS idx_endorsements_import ON endorsements(import_id);
CREATE INDEX IF NOT EXISTS idx_endorsements_resolved ON endorsements(resolved_endorser);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}
