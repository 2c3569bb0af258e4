//! Core domain types for the EndorseTrack import pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator used when flattening a section path for display and dedup keys.
pub const SECTION_SEPARATOR: &str = " > ";

// ---------------------------------------------------------------------------
// ImportId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one bulk document import (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportId(pub Uuid);

impl ImportId {
    /// Generate a new time-sortable import identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ImportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ImportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// SectionPath
// ---------------------------------------------------------------------------

/// An explicit stack of open section names, root first.
///
/// The section tracker mutates one instance as it walks a document; every
/// emitted statement carries a *clone*, never a reference, so statements are
/// immune to later stack mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionPath(Vec<String>);

impl SectionPath {
    /// Empty path (document root).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Push a section name onto the stack.
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// Pop entries until at most `depth` remain. A request deeper than the
    /// current stack clamps to empty; it never underflows or fails.
    pub fn pop_to_depth(&mut self, depth: usize) {
        self.0.truncate(depth);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Flatten to the canonical `A > B > C` form used as a dedup key.
    pub fn joined(&self) -> String {
        self.0.join(SECTION_SEPARATOR)
    }
}

impl std::fmt::Display for SectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.joined())
    }
}

impl<S: Into<String>> FromIterator<S> for SectionPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// RawStatement
// ---------------------------------------------------------------------------

/// One unparsed fragment emitted by the section tracker, tagged with the
/// section path as of its bullet. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatement {
    /// Raw markup text of the fragment (joined across physical lines).
    pub raw_text: String,
    /// Snapshot of the section stack at emission.
    pub sections: SectionPath,
}

// ---------------------------------------------------------------------------
// Citation
// ---------------------------------------------------------------------------

/// Structured citation fields parsed from embedded reference bodies.
///
/// All fields are optional because hand-authored source data is inconsistent;
/// an unparseable reference leaves its fields absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Publisher / work / website name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw date string exactly as authored, before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_raw: Option<String>,
}

// ---------------------------------------------------------------------------
// ParsedStatement
// ---------------------------------------------------------------------------

/// Canonical output of the per-statement extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStatement {
    /// Endorsing entity name, if one survived markup stripping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorser_name: Option<String>,
    /// Descriptive detail after the name; empty when none was present.
    pub endorser_detail: String,
    /// Parsed citation metadata.
    pub citation: Citation,
    /// Normalized citation date, when the raw date matched its grammar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsed_on: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Registry types
// ---------------------------------------------------------------------------

/// Identity key of a known endorser in the external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndorserId(pub i64);

impl std::fmt::Display for EndorserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registry entry. Read-only from the pipeline's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorserRecord {
    pub id: EndorserId,
    pub name: String,
}

/// Outcome of resolving a candidate name against the registry.
///
/// A tier yielding several candidates is ambiguous and collapses to
/// [`MatchResult::NoMatch`]; it is never silently resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Resolved(EndorserId),
    NoMatch,
}

impl MatchResult {
    pub fn resolved(&self) -> Option<EndorserId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::NoMatch => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EndorsementRecord
// ---------------------------------------------------------------------------

/// Terminal pipeline output: one citation-backed endorsement mention.
///
/// `(raw_text, sections.joined())` is the natural dedup key consumers use to
/// make re-imports idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementRecord {
    /// Raw statement text this record was parsed from.
    pub raw_text: String,
    /// Section path governing the statement.
    pub sections: SectionPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorser_name: Option<String>,
    pub endorser_detail: String,
    pub citation: Citation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsed_on: Option<NaiveDate>,
    /// Registry identity when resolution found exactly one candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<EndorserId>,
}

impl EndorsementRecord {
    /// Assemble a record from a raw statement and its parse/resolution results.
    pub fn new(raw_text: String, sections: SectionPath, parsed: ParsedStatement) -> Self {
        Self {
            raw_text,
            sections,
            endorser_name: parsed.endorser_name,
            endorser_detail: parsed.endorser_detail,
            citation: parsed.citation,
            endorsed_on: parsed.endorsed_on,
            resolved: None,
        }
    }

    /// The `(raw_text, flattened sections)` dedup key.
    pub fn dedup_key(&self) -> (String, String) {
        (self.raw_text.clone(), self.sections.joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_id_roundtrip() {
        let id = ImportId::new();
        let s = id.to_string();
        let parsed: ImportId = s.parse().expect("parse ImportId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn section_path_pop_clamps_to_empty() {
        let mut path: SectionPath = ["Endorsements", "State officials"].into_iter().collect();
        path.pop_to_depth(5);
        assert_eq!(path.len(), 2);
        path.pop_to_depth(0);
        assert!(path.is_empty());
        // A second over-deep pop is still a no-op, never an underflow.
        path.pop_to_depth(0);
        assert!(path.is_empty());
    }

    #[test]
    fn section_path_joined_form() {
        let path: SectionPath = ["Endorsements", "Texas"].into_iter().collect();
        assert_eq!(path.joined(), "Endorsements > Texas");
        assert_eq!(path.to_string(), "Endorsements > Texas");
    }

    #[test]
    fn emitted_statement_is_immune_to_later_pushes() {
        let mut live: SectionPath = ["Endorsements"].into_iter().collect();
        let statement = RawStatement {
            raw_text: "[[Jane Doe]]".into(),
            sections: live.clone(),
        };
        live.push("Nevada");
        assert_eq!(statement.sections.len(), 1);
        assert_eq!(live.len(), 2);
    }

    #[test]
    fn record_serialization_skips_absent_fields() {
        let record = EndorsementRecord::new(
            "[[Jane Doe]]".into(),
            ["Endorsements"].into_iter().collect(),
            ParsedStatement {
                endorser_name: Some("Jane Doe".into()),
                ..Default::default()
            },
        );
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"endorser_name\":\"Jane Doe\""));
        assert!(!json.contains("endorsed_on"));
        assert!(!json.contains("resolved"));

        let parsed: EndorsementRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
    }
}
