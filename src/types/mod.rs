//! Domain types for the minutes pipeline.

pub mod document;

pub use document::{
    AnalysisId, AnalysisKind, AnalysisRecord, DocumentId, DocumentRecord, DocumentStatus,
    FetchedDocument, ListingEntry,
};
