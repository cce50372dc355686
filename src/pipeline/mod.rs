//! The document acquisition and analysis pipeline.
//!
//! [`Pipeline`] wires a document store, a text cache, a fetcher, and a
//! model behind the caller-facing operations: discovery, scraping,
//! single-document analysis, and batch analysis. Documents are
//! processed start-to-finish, one at a time; repeated runs are
//! scheduled (and serialized) by the caller.

pub mod analyze;
pub mod chunk;
pub mod discover;
pub mod prompts;
pub mod resolve;

pub use chunk::chunk_text;
pub use resolve::{cache_key, hash_content, resolve_content};

use tracing::warn;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::traits::{fetcher::Fetcher, model::Model, store::DocumentStore, store::TextCache};
use crate::types::document::{AnalysisRecord, DocumentId, DocumentRecord};

/// Outcome of a discovery-and-scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Newly discovered documents.
    pub documents_found: usize,

    /// Documents whose content was retrieved successfully.
    pub documents_scraped: usize,
}

/// The assembled pipeline.
pub struct Pipeline<S, C, F, M> {
    store: S,
    cache: C,
    fetcher: F,
    model: M,
    config: PipelineConfig,
}

impl<S, C, F, M> Pipeline<S, C, F, M>
where
    S: DocumentStore,
    C: TextCache,
    F: Fetcher,
    M: Model,
{
    /// Assemble a pipeline with the default configuration.
    pub fn new(store: S, cache: C, fetcher: F, model: M) -> Self {
        Self::with_config(store, cache, fetcher, model, PipelineConfig::default())
    }

    /// Assemble a pipeline with explicit configuration.
    pub fn with_config(store: S, cache: C, fetcher: F, model: M, config: PipelineConfig) -> Self {
        Self {
            store,
            cache,
            fetcher,
            model,
            config,
        }
    }

    /// Find listing entries not yet known and record them as `Pending`
    /// documents. Empty when nothing is new.
    pub async fn discover_new(&self) -> Result<Vec<DocumentRecord>> {
        discover::discover_new(&self.store, &self.fetcher).await
    }

    /// Retrieve content for one pending document.
    pub async fn scrape_document(&self, document: &mut DocumentRecord) -> Result<()> {
        analyze::scrape_document(document, &self.store, &self.cache, &self.fetcher).await
    }

    /// Discovery followed by a scrape of each new document. A failed
    /// scrape is recorded on that document and does not stop the run.
    pub async fn discover_and_scrape(&self) -> Result<ScrapeReport> {
        let mut new_documents = self.discover_new().await?;
        let documents_found = new_documents.len();

        let mut documents_scraped = 0;
        for document in &mut new_documents {
            match self.scrape_document(document).await {
                Ok(()) => documents_scraped += 1,
                Err(e) => {
                    warn!(title = %document.title, error = %e, "scrape failed, continuing");
                }
            }
        }

        Ok(ScrapeReport {
            documents_found,
            documents_scraped,
        })
    }

    /// Analyze one document, optionally with a caller-supplied prompt.
    /// Appends a new analysis record on success.
    pub async fn analyze_document(
        &self,
        document: &mut DocumentRecord,
        custom_prompt: Option<&str>,
    ) -> Result<AnalysisRecord> {
        analyze::analyze_document(
            document,
            custom_prompt,
            &self.config,
            &self.store,
            &self.cache,
            &self.fetcher,
            &self.model,
        )
        .await
    }

    /// Analyze a document looked up by id. Convenience entry point
    /// for API layers that hold only the identifier.
    pub async fn analyze_document_by_id(
        &self,
        id: DocumentId,
        custom_prompt: Option<&str>,
    ) -> Result<AnalysisRecord> {
        let mut document = self.store.find_by_id(id).await?.ok_or_else(|| {
            PipelineError::Storage(format!("unknown document id: {id}").into())
        })?;
        self.analyze_document(&mut document, custom_prompt).await
    }

    /// Analyze every scraped document, independently. Returns the
    /// number of successes.
    pub async fn analyze_pending(&self) -> Result<usize> {
        analyze::analyze_pending(
            &self.config,
            &self.store,
            &self.cache,
            &self.fetcher,
            &self.model,
        )
        .await
    }

    /// The underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying text cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
