//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline without network or model calls.
//! Both mocks record their calls so tests can assert on interaction
//! counts (e.g. "a cache hit performs no fetch").

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::error::{FetchError, FetchResult, ModelError, ModelResult, PipelineError, Result};
use crate::traits::{fetcher::Fetcher, model::Model, store::TextCache};
use crate::types::document::{FetchedDocument, ListingEntry};

/// A fetcher that serves scripted listings and documents.
#[derive(Default)]
pub struct MockFetcher {
    listing: RwLock<Vec<ListingEntry>>,
    documents: RwLock<HashMap<String, FetchedDocument>>,
    listing_calls: AtomicUsize,
    document_calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the listing response.
    pub fn with_listing(self, entries: Vec<ListingEntry>) -> Self {
        *self.listing.write().unwrap() = entries;
        self
    }

    /// Script a document response for a URL.
    pub fn with_document(
        self,
        url: impl Into<String>,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Self {
        self.documents.write().unwrap().insert(
            url.into(),
            FetchedDocument {
                bytes,
                content_type: content_type.map(|s| s.to_string()),
            },
        );
        self
    }

    /// Script an HTML document whose body contains `text`.
    pub fn with_html_document(self, url: impl Into<String>, text: &str) -> Self {
        self.with_document(url, html_page(text), Some("text/html"))
    }

    /// How many times the listing was fetched.
    pub fn listing_call_count(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    /// How many document fetches occurred.
    pub fn document_call_count(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_listing(&self) -> FetchResult<Vec<ListingEntry>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.read().unwrap().clone())
    }

    async fn fetch_document(&self, url: &str) -> FetchResult<FetchedDocument> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("no scripted response for {url}").into()))
    }
}

/// One scripted model reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail the call.
    Fail,
}

/// A model that replays scripted replies in order, then falls back to
/// a default reply. Every received prompt is recorded.
pub struct MockModel {
    script: RwLock<VecDeque<MockReply>>,
    default_reply: MockReply,
    prompts: RwLock<Vec<String>>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self {
            script: RwLock::new(VecDeque::new()),
            default_reply: MockReply::Text("mock analysis".to_string()),
            prompts: RwLock::new(Vec::new()),
        }
    }
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one scripted reply.
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.script.write().unwrap().push_back(reply);
        self
    }

    /// Append scripted text replies in order.
    pub fn with_replies<I, T>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        {
            let mut script = self.script.write().unwrap();
            for reply in replies {
                script.push_back(MockReply::Text(reply.into()));
            }
        }
        self
    }

    /// Change the reply used once the script runs out.
    pub fn with_default_reply(mut self, reply: MockReply) -> Self {
        self.default_reply = reply;
        self
    }

    /// All prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }
}

#[async_trait]
impl Model for MockModel {
    async fn invoke(&self, prompt: &str) -> ModelResult<String> {
        self.prompts.write().unwrap().push(prompt.to_string());
        let reply = self
            .script
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail => Err(ModelError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// A cache whose writes always fail, for exercising the best-effort
/// cache-write path.
#[derive(Default)]
pub struct FailingTextCache;

impl FailingTextCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextCache for FailingTextCache {
    async fn put(&self, _key: &str, _text: &str) -> Result<()> {
        Err(PipelineError::Storage("cache unavailable".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Wrap plain text into a minimal HTML page, for document fixtures.
pub fn html_page(text: &str) -> Vec<u8> {
    format!("<html><body><main><p>{text}</p></main></body></html>").into_bytes()
}

/// A listing entry fixture.
pub fn listing_entry(url: &str, date: &str) -> ListingEntry {
    ListingEntry {
        title: format!("Board Meeting Minutes - {date}"),
        url: url.to_string(),
        date: date.to_string(),
    }
}
