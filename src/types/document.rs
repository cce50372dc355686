//! Document and analysis records, plus the document lifecycle state machine.
//!
//! The lifecycle is a closed set of states with a single transition
//! function ([`DocumentRecord::transition`]) as the only writer of
//! `status`. Callers persist the record through a store immediately
//! after each transition, so stored state always reflects the last
//! definitive outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PipelineError;

/// Unique identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Discovered, content not yet retrieved.
    Pending,
    /// Content retrieved successfully.
    Scraped,
    /// Analysis in progress.
    Analyzing,
    /// At least one analysis persisted.
    Analyzed,
    /// Last attempt failed definitively.
    Error,
}

impl DocumentStatus {
    /// Stable lowercase name, used for persistence and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Scraped => "scraped",
            DocumentStatus::Analyzing => "analyzing",
            DocumentStatus::Analyzed => "analyzed",
            DocumentStatus::Error => "error",
        }
    }

    /// Whether an analysis may begin from this state. Re-analysis of an
    /// already analyzed document is allowed; it re-enters `Analyzing`
    /// without passing through `Pending`.
    pub fn can_begin_analysis(&self) -> bool {
        matches!(self, DocumentStatus::Scraped | DocumentStatus::Analyzed)
    }

    /// The closed edge set of the lifecycle.
    fn can_transition_to(self, next: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, next),
            (Pending, Scraped)
                | (Pending, Error)
                | (Scraped, Analyzing)
                | (Scraped, Error)
                | (Analyzed, Analyzing)
                | (Analyzing, Analyzed)
                | (Analyzing, Error)
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "scraped" => Ok(DocumentStatus::Scraped),
            "analyzing" => Ok(DocumentStatus::Analyzing),
            "analyzed" => Ok(DocumentStatus::Analyzed),
            "error" => Ok(DocumentStatus::Error),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// Kind of analysis produced for a document.
///
/// The pipeline itself always produces `CustomPrompt`; the other kinds
/// exist so externally produced analyses share the same record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    CustomPrompt,
    Summary,
    ActionItems,
    Topics,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::CustomPrompt => "custom_prompt",
            AnalysisKind::Summary => "summary",
            AnalysisKind::ActionItems => "action_items",
            AnalysisKind::Topics => "topics",
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom_prompt" => Ok(AnalysisKind::CustomPrompt),
            "summary" => Ok(AnalysisKind::Summary),
            "action_items" => Ok(AnalysisKind::ActionItems),
            "topics" => Ok(AnalysisKind::Topics),
            other => Err(format!("unknown analysis kind: {other}")),
        }
    }
}

/// A tracked meeting-minutes document.
///
/// The URL is the unique key across the whole corpus; discovery never
/// creates a second record for a URL it has already seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,

    /// Human-readable title, derived from the listing row.
    pub title: String,

    /// Stable source URL (unique key).
    pub url: String,

    /// Opaque reference into the object cache; absent until the
    /// extracted text has been cached once.
    pub cache_location: Option<String>,

    /// SHA-256 hash of the cached text, recorded alongside
    /// `cache_location` for change detection.
    pub content_hash: Option<String>,

    pub status: DocumentStatus,

    /// When content was last retrieved successfully.
    pub scraped_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Create a freshly discovered document in `Pending` state.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            title: title.into(),
            url: url.into(),
            cache_location: None,
            content_hash: None,
            status: DocumentStatus::Pending,
            scraped_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the document to `next`, validating against the lifecycle
    /// edge set. On rejection the record is left untouched and the
    /// caller gets a precondition error.
    ///
    /// This is the only place `status` is written.
    pub fn transition(&mut self, next: DocumentStatus) -> Result<DocumentStatus, PipelineError> {
        if !self.status.can_transition_to(next) {
            return Err(PipelineError::Precondition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(next)
    }

    /// Record a successful content retrieval timestamp.
    pub fn mark_scraped_now(&mut self) {
        self.scraped_at = Some(Utc::now());
    }
}

/// An immutable analysis result. Documents accumulate these over time;
/// re-analysis appends, it never overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub document_id: DocumentId,
    pub kind: AnalysisKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(document_id: DocumentId, kind: AnalysisKind, content: impl Into<String>) -> Self {
        Self {
            id: AnalysisId::new(),
            document_id,
            kind,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One row of the listing page: a candidate minutes document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub title: String,
    pub url: String,
    pub date: String,
}

/// Raw bytes of a fetched document plus its declared content type.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_pending() {
        let doc = DocumentRecord::new("Minutes", "https://example.gov/minutes/1");
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert!(doc.cache_location.is_none());
        assert!(doc.scraped_at.is_none());
    }

    #[test]
    fn valid_transitions_advance_status() {
        let mut doc = DocumentRecord::new("Minutes", "https://example.gov/minutes/1");
        doc.transition(DocumentStatus::Scraped).unwrap();
        doc.transition(DocumentStatus::Analyzing).unwrap();
        doc.transition(DocumentStatus::Analyzed).unwrap();
        // Re-analysis is allowed without returning to Pending.
        doc.transition(DocumentStatus::Analyzing).unwrap();
        doc.transition(DocumentStatus::Error).unwrap();
    }

    #[test]
    fn invalid_transition_is_rejected_without_mutation() {
        let mut doc = DocumentRecord::new("Minutes", "https://example.gov/minutes/1");
        let err = doc.transition(DocumentStatus::Analyzed).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Precondition {
                from: DocumentStatus::Pending,
                to: DocumentStatus::Analyzed,
            }
        ));
        assert_eq!(doc.status, DocumentStatus::Pending);
    }

    #[test]
    fn analysis_entry_requires_scraped_or_analyzed() {
        let mut doc = DocumentRecord::new("Minutes", "https://example.gov/minutes/1");
        assert!(!doc.status.can_begin_analysis());
        assert!(doc.transition(DocumentStatus::Analyzing).is_err());

        doc.transition(DocumentStatus::Scraped).unwrap();
        assert!(doc.status.can_begin_analysis());
    }

    #[test]
    fn status_round_trips_through_string() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Scraped,
            DocumentStatus::Analyzing,
            DocumentStatus::Analyzed,
            DocumentStatus::Error,
        ] {
            assert_eq!(status.as_str().parse::<DocumentStatus>().unwrap(), status);
        }
    }
}
