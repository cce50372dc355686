//! Storage traits for document records, analyses, and cached text.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{AnalysisRecord, DocumentId, DocumentRecord, DocumentStatus};

/// Relational store for documents and their analyses.
///
/// The pipeline is the single writer; it assumes sequential access and
/// relies only on the store's own transaction boundaries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a batch of new documents atomically. Either all rows are
    /// created or none are; URL uniqueness is enforced.
    async fn insert_documents(&self, documents: &[DocumentRecord]) -> Result<()>;

    /// Find a document by its URL (exact match).
    async fn find_by_url(&self, url: &str) -> Result<Option<DocumentRecord>>;

    /// Find a document by id.
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<DocumentRecord>>;

    /// All documents currently in the given lifecycle state.
    async fn find_by_status(&self, status: DocumentStatus) -> Result<Vec<DocumentRecord>>;

    /// Update an existing document in place.
    async fn update_document(&self, document: &DocumentRecord) -> Result<()>;

    /// Persist a new analysis. Analyses are append-only.
    async fn create_analysis(&self, analysis: &AnalysisRecord) -> Result<()>;

    /// All analyses for a document, oldest first.
    async fn analyses_for_document(&self, id: DocumentId) -> Result<Vec<AnalysisRecord>>;
}

/// Object cache for extracted text, keyed by an opaque string the
/// content resolver derives deterministically from document identity.
///
/// Writes are best-effort from the resolver's point of view: a failed
/// `put` forgoes future caching but never fails resolution.
#[async_trait]
pub trait TextCache: Send + Sync {
    /// Store text under a key, overwriting any previous value.
    async fn put(&self, key: &str, text: &str) -> Result<()>;

    /// Retrieve text by key; `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;
}
