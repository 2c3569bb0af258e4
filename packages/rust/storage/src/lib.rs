//! libSQL persistence collaborator for EndorseTrack.
//!
//! The [`Storage`] struct wraps a local libSQL database holding import
//! provenance, the endorser registry, and extracted endorsement records.
//!
//! Idempotence contract: records are keyed on `(raw_text, sections)` with a
//! conflict-ignoring insert, so re-importing the same document never
//! duplicates records. That contract lives here, not in the pipeline.

mod migrations;

use std::path::Path;

use chrono::Utc;
use libsql::{Connection, Database, params};
use uuid::Uuid;

use endorsetrack_shared::{
    Citation, EndorseTrackError, EndorsementRecord, EndorserId, EndorserRecord, Result,
    SECTION_SEPARATOR,
};

/// Summary row for one recorded import.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub id: String,
    pub slug: String,
    pub created_at: String,
    pub record_count: u64,
    pub resolved_count: u64,
}

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| EndorseTrackError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Open a database at `path` in read-only mode (for reporting tools).
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    EndorseTrackError::Storage(format!(
                        "migration v{} failed: {e}",
                        migration.version
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(EndorseTrackError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Import operations
    // -----------------------------------------------------------------------

    /// Record one bulk import (slug, content hash, and full document text).
    pub async fn insert_import(
        &self,
        id: &str,
        slug: &str,
        content_hash: &str,
        text: &str,
    ) -> Result<()> {
        self.check_writable()?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO imports (id, slug, content_hash, created_at, text)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, slug, content_hash, now.as_str(), text],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;
        Ok(())
    }

    /// List recorded imports with their record and resolution counts.
    pub async fn list_imports(&self) -> Result<Vec<ImportSummary>> {
        let mut rows = self
            .conn
            .query(
                "SELECT i.id, i.slug, i.created_at,
                        COUNT(e.id),
                        COUNT(e.resolved_endorser)
                 FROM imports i
                 LEFT JOIN endorsements e ON e.import_id = i.id
                 GROUP BY i.id
                 ORDER BY i.created_at",
                params![],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(ImportSummary {
                id: row
                    .get::<String>(0)
                    .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
                slug: row
                    .get::<String>(1)
                    .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
                created_at: row
                    .get::<String>(2)
                    .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
                record_count: row.get::<i64>(3).unwrap_or(0) as u64,
                resolved_count: row.get::<i64>(4).unwrap_or(0) as u64,
            });
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Endorsement operations
    // -----------------------------------------------------------------------

    /// Insert one endorsement record, ignoring duplicates by
    /// `(raw_text, sections)`. Returns `true` when a new row was inserted.
    pub async fn insert_endorsement(
        &self,
        import_id: &str,
        record: &EndorsementRecord,
    ) -> Result<bool> {
        self.check_writable()?;
        let id = Uuid::now_v7().to_string();
        let now = Utc::now().to_rfc3339();
        let affected = self
            .conn
            .execute(
                "INSERT INTO endorsements
                   (id, import_id, raw_text, sections, endorser_name, endorser_detail,
                    citation_url, citation_name, citation_date_raw, endorsed_on,
                    resolved_endorser, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(raw_text, sections) DO NOTHING",
                params![
                    id.as_str(),
                    import_id,
                    record.raw_text.as_str(),
                    record.sections.joined(),
                    record.endorser_name.as_deref(),
                    record.endorser_detail.as_str(),
                    record.citation.url.as_deref(),
                    record.citation.name.as_deref(),
                    record.citation.date_raw.as_deref(),
                    record.endorsed_on.map(|d| d.to_string()),
                    record.resolved.map(|id| id.0),
                    now.as_str(),
                ],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;
        Ok(affected > 0)
    }

    /// List the records of one import, in insertion order.
    pub async fn list_endorsements(&self, import_id: &str) -> Result<Vec<EndorsementRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT raw_text, sections, endorser_name, endorser_detail,
                        citation_url, citation_name, citation_date_raw, endorsed_on,
                        resolved_endorser
                 FROM endorsements WHERE import_id = ?1 ORDER BY created_at, id",
                params![import_id],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(row_to_record(&row)?);
        }
        Ok(results)
    }

    /// Records with an endorser name but no confirmed registry identity.
    /// Returns `(endorsement id, endorser name)` pairs.
    pub async fn unresolved_endorsements(&self) -> Result<Vec<(String, String)>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, endorser_name FROM endorsements
                 WHERE resolved_endorser IS NULL AND endorser_name IS NOT NULL
                 ORDER BY created_at, id",
                params![],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push((
                row.get::<String>(0)
                    .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
                row.get::<String>(1)
                    .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
            ));
        }
        Ok(results)
    }

    /// Write back a confirmed registry identity for one record.
    pub async fn set_resolved(&self, endorsement_id: &str, endorser: EndorserId) -> Result<()> {
        self.check_writable()?;
        self.conn
            .execute(
                "UPDATE endorsements SET resolved_endorser = ?1 WHERE id = ?2",
                params![endorser.0, endorsement_id],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Endorser registry
    // -----------------------------------------------------------------------

    /// Add an endorser to the registry. Returns the generated identity.
    pub async fn insert_endorser(&self, name: &str, slug: Option<&str>) -> Result<EndorserId> {
        self.check_writable()?;
        self.conn
            .execute(
                "INSERT INTO endorsers (name, slug) VALUES (?1, ?2)",
                params![name, slug],
            )
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;
        Ok(EndorserId(self.conn.last_insert_rowid()))
    }

    /// Load the full registry snapshot for in-memory resolution.
    pub async fn load_endorsers(&self) -> Result<Vec<EndorserRecord>> {
        let mut rows = self
            .conn
            .query("SELECT id, name FROM endorsers ORDER BY id", params![])
            .await
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            results.push(EndorserRecord {
                id: EndorserId(
                    row.get::<i64>(0)
                        .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
                ),
                name: row
                    .get::<String>(1)
                    .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
            });
        }
        Ok(results)
    }
}

/// Convert a database row to an [`EndorsementRecord`].
fn row_to_record(row: &libsql::Row) -> Result<EndorsementRecord> {
    let sections: String = row
        .get(1)
        .map_err(|e| EndorseTrackError::Storage(e.to_string()))?;
    let endorsed_on: Option<String> = row.get::<String>(7).ok();

    Ok(EndorsementRecord {
        raw_text: row
            .get::<String>(0)
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
        sections: sections
            .split(SECTION_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect(),
        endorser_name: row.get::<String>(2).ok(),
        endorser_detail: row
            .get::<String>(3)
            .map_err(|e| EndorseTrackError::Storage(e.to_string()))?,
        citation: Citation {
            url: row.get::<String>(4).ok(),
            name: row.get::<String>(5).ok(),
            date_raw: row.get::<String>(6).ok(),
        },
        endorsed_on: endorsed_on.and_then(|s| s.parse().ok()),
        resolved: row.get::<i64>(8).ok().map(EndorserId),
    })
}
