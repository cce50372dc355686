//! In-memory storage implementations for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{PipelineError, Result};
use crate::traits::store::{DocumentStore, TextCache};
use crate::types::document::{AnalysisRecord, DocumentId, DocumentRecord, DocumentStatus};

/// In-memory document store.
///
/// Useful for testing and development; data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentId, DocumentRecord>>,
    analyses: RwLock<Vec<AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Number of stored analyses.
    pub fn analysis_count(&self) -> usize {
        self.analyses.read().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_documents(&self, documents: &[DocumentRecord]) -> Result<()> {
        let mut store = self.documents.write().unwrap();

        // Validate the whole batch before touching the map so the
        // insert stays atomic.
        let mut seen: Vec<&str> = Vec::with_capacity(documents.len());
        for doc in documents {
            let duplicate = store.values().any(|existing| existing.url == doc.url)
                || seen.contains(&doc.url.as_str());
            if duplicate {
                return Err(PipelineError::Storage(
                    format!("duplicate document URL: {}", doc.url).into(),
                ));
            }
            seen.push(&doc.url);
        }

        for doc in documents {
            store.insert(doc.id, doc.clone());
        }
        Ok(())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<DocumentRecord>> {
        Ok(self
            .documents
            .read()
            .unwrap()
            .values()
            .find(|doc| doc.url == url)
            .cloned())
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<DocumentRecord>> {
        Ok(self.documents.read().unwrap().get(&id).cloned())
    }

    async fn find_by_status(&self, status: DocumentStatus) -> Result<Vec<DocumentRecord>> {
        let mut docs: Vec<DocumentRecord> = self
            .documents
            .read()
            .unwrap()
            .values()
            .filter(|doc| doc.status == status)
            .cloned()
            .collect();
        docs.sort_by_key(|doc| doc.created_at);
        Ok(docs)
    }

    async fn update_document(&self, document: &DocumentRecord) -> Result<()> {
        let mut store = self.documents.write().unwrap();
        if !store.contains_key(&document.id) {
            return Err(PipelineError::Storage(
                format!("unknown document id: {}", document.id).into(),
            ));
        }
        store.insert(document.id, document.clone());
        Ok(())
    }

    async fn create_analysis(&self, analysis: &AnalysisRecord) -> Result<()> {
        if !self.documents.read().unwrap().contains_key(&analysis.document_id) {
            return Err(PipelineError::Storage(
                format!("analysis references unknown document: {}", analysis.document_id).into(),
            ));
        }
        self.analyses.write().unwrap().push(analysis.clone());
        Ok(())
    }

    async fn analyses_for_document(&self, id: DocumentId) -> Result<Vec<AnalysisRecord>> {
        Ok(self
            .analyses
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.document_id == id)
            .cloned()
            .collect())
    }
}

/// In-memory text cache.
#[derive(Default)]
pub struct MemoryTextCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[async_trait]
impl TextCache for MemoryTextCache {
    async fn put(&self, key: &str, text: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), text.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn batch_insert_rejects_duplicate_urls_atomically() {
        let store = MemoryStore::new();
        let first = DocumentRecord::new("A", "https://example.gov/minutes/1");
        store.insert_documents(std::slice::from_ref(&first)).await.unwrap();

        let batch = vec![
            DocumentRecord::new("B", "https://example.gov/minutes/2"),
            DocumentRecord::new("C", "https://example.gov/minutes/1"),
        ];
        assert!(store.insert_documents(&batch).await.is_err());
        // Nothing from the failed batch landed.
        assert_eq!(store.document_count(), 1);
    }

    #[tokio::test]
    async fn find_by_status_filters() {
        let store = MemoryStore::new();
        let mut scraped = DocumentRecord::new("A", "https://example.gov/minutes/1");
        scraped.transition(DocumentStatus::Scraped).unwrap();
        let pending = DocumentRecord::new("B", "https://example.gov/minutes/2");
        store
            .insert_documents(&[scraped.clone(), pending])
            .await
            .unwrap();

        let found = store.find_by_status(DocumentStatus::Scraped).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, scraped.id);
    }

    #[tokio::test]
    async fn analyses_require_existing_document() {
        let store = MemoryStore::new();
        let doc = DocumentRecord::new("A", "https://example.gov/minutes/1");
        let orphan = AnalysisRecord::new(
            DocumentId::new(),
            crate::types::document::AnalysisKind::CustomPrompt,
            "text",
        );
        assert!(store.create_analysis(&orphan).await.is_err());

        store.insert_documents(std::slice::from_ref(&doc)).await.unwrap();
        let analysis = AnalysisRecord::new(
            doc.id,
            crate::types::document::AnalysisKind::CustomPrompt,
            "text",
        );
        store.create_analysis(&analysis).await.unwrap();
        assert_eq!(store.analyses_for_document(doc.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cache_round_trip() {
        let cache = MemoryTextCache::new();
        assert_eq!(cache.get("documents/k").await.unwrap(), None);
        cache.put("documents/k", "cached text").await.unwrap();
        assert_eq!(
            cache.get("documents/k").await.unwrap().as_deref(),
            Some("cached text")
        );
    }
}
