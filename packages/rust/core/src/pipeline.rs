//! End-to-end import transform: document text → ordered endorsement records.
//!
//! Single-threaded, single-pass, one document per call. No per-statement
//! failure aborts the batch; partially-filled records are emitted for
//! downstream human review. Persistence (and its idempotence) is the
//! storage collaborator's job, not the pipeline's.

use tracing::{debug, info, instrument};

use endorsetrack_extract::parse_statement;
use endorsetrack_shared::{AppConfig, EndorsementRecord, ImportConfig, ResolverPolicy};
use endorsetrack_wikitext::{RefTable, SectionWalker, split_statements};

use crate::resolver::{EndorserRegistry, Resolver};

/// Configuration for one import run, merged from [`AppConfig`] and CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Section walking knobs (heading base offset, terminal headings).
    pub walker: ImportConfig,
    /// Resolver match-tier policy.
    pub resolver: ResolverPolicy,
}

impl From<&AppConfig> for ImportOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            walker: config.import.clone(),
            resolver: config.resolver.clone(),
        }
    }
}

/// Progress callback for reporting import status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called for each record as it is emitted.
    fn record_emitted(&self, raw_text: &str, current: usize);
    /// Called when the transform completes.
    fn done(&self, record_count: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_emitted(&self, _raw_text: &str, _current: usize) {}
    fn done(&self, _record_count: usize) {}
}

/// Run the full import transform on one document.
///
/// 1. Collect named reference definitions
/// 2. Walk sections, expanding short-form references
/// 3. Split bullets into per-entity statements
/// 4. Extract citation, name/detail, and date per statement
/// 5. Resolve names against the registry
///
/// The output order follows document order. Concurrent imports of different
/// documents must call this independently; the registry is only read.
#[instrument(skip_all, fields(doc_len = text.len()))]
pub fn import_document(
    text: &str,
    registry: &dyn EndorserRegistry,
    opts: &ImportOptions,
    progress: &dyn ProgressReporter,
) -> Vec<EndorsementRecord> {
    progress.phase("Collecting reference definitions");
    let refs = RefTable::collect(text);
    debug!(definitions = refs.len(), "reference table built");

    progress.phase("Walking sections");
    let walker = SectionWalker::new(&opts.walker);
    let raw_statements = walker.walk(text, &refs);
    debug!(statements = raw_statements.len(), "section walk complete");

    progress.phase("Parsing and resolving statements");
    let resolver = Resolver::new(opts.resolver.clone());
    let mut records: Vec<EndorsementRecord> = Vec::new();

    for raw in raw_statements {
        let (label, statements) = split_statements(&raw.raw_text);
        for statement in statements {
            let mut sections = raw.sections.clone();
            if let Some(label) = &label {
                sections.push(label.clone());
            }

            let parsed = parse_statement(&statement);
            let mut record = EndorsementRecord::new(statement, sections, parsed);
            if let Some(name) = &record.endorser_name {
                record.resolved = resolver.resolve(name, registry).resolved();
            }

            progress.record_emitted(&record.raw_text, records.len() + 1);
            records.push(record);
        }
    }

    info!(records = records.len(), "import transform complete");
    progress.done(records.len());
    records
}

/// SHA-256 hex digest of the document text, recorded as import provenance.
pub fn content_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
