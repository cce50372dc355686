//! Fetcher trait for listing and document retrieval.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::document::{FetchedDocument, ListingEntry};

/// Network retrieval of the listing page and of individual documents.
///
/// Implementations wrap a transport (HTTP in production, scripted
/// responses in tests). All failures are reported as [`FetchError`]
/// values, never as faults that abort sibling work.
///
/// [`FetchError`]: crate::error::FetchError
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch and parse the listing page into candidate minutes
    /// documents, in page order.
    async fn fetch_listing(&self) -> FetchResult<Vec<ListingEntry>>;

    /// Fetch one document's raw bytes plus its declared content type.
    async fn fetch_document(&self, url: &str) -> FetchResult<FetchedDocument>;
}
