//! Government meeting-minutes acquisition and analysis pipeline.
//!
//! Discovers meeting documents from a public listing page, extracts
//! their text regardless of source format (HTML or PDF), and produces
//! structured analysis through a large-language-model — splitting
//! content into size-bounded pieces when it exceeds the model's
//! context budget.
//!
//! # Design
//!
//! - Trait seams at every external boundary ([`Fetcher`], [`Model`],
//!   [`DocumentStore`], [`TextCache`]); the pipeline owns the logic,
//!   implementations own the transport.
//! - An explicit lifecycle state machine
//!   (`PENDING → SCRAPED → ANALYZING → ANALYZED`, with `ERROR` on any
//!   definitive failure) whose single transition function is the only
//!   writer of state, persisted on every step.
//! - Sequential, one-document-at-a-time processing; repeated runs are
//!   scheduled and serialized by the caller.
//!
//! # Usage
//!
//! ```rust,ignore
//! use civic_minutes::{
//!     FetchConfig, HttpFetcher, MemoryTextCache, OpenAiModel, Pipeline, SqliteStore,
//! };
//!
//! let store = SqliteStore::new("sqlite:./minutes.db?mode=rwc").await?;
//! let cache = MemoryTextCache::new();
//! let fetcher = HttpFetcher::new(FetchConfig::default())?;
//! let model = OpenAiModel::from_env()?;
//!
//! let pipeline = Pipeline::new(store, cache, fetcher, model);
//! let report = pipeline.discover_and_scrape().await?;
//! let analyzed = pipeline.analyze_pending().await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Fetcher, Model, stores)
//! - [`types`] - Document and analysis records, lifecycle states
//! - [`extract`] - Content-type-aware text extraction
//! - [`pipeline`] - Discovery, resolution, chunking, analysis
//! - [`fetchers`] - HTTP fetcher implementation
//! - [`model`] - Model client implementations
//! - [`stores`] - Storage implementations (memory, SQLite)
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod model;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::{AnalysisConfig, FetchConfig, PipelineConfig};
pub use error::{ExtractError, FetchError, ModelError, PipelineError, Result};
pub use extract::{detect_media_kind, extract, MediaKind};
pub use fetchers::HttpFetcher;
pub use model::OpenAiModel;
pub use pipeline::{chunk_text, Pipeline, ScrapeReport};
pub use stores::{MemoryStore, MemoryTextCache, SqliteStore};
pub use traits::{DocumentStore, Fetcher, Model, TextCache};
pub use types::document::{
    AnalysisId, AnalysisKind, AnalysisRecord, DocumentId, DocumentRecord, DocumentStatus,
    FetchedDocument, ListingEntry,
};
