//! Discovery: diff the listing page against known records.

use tracing::{debug, info};

use crate::error::Result;
use crate::traits::{fetcher::Fetcher, store::DocumentStore};
use crate::types::document::DocumentRecord;

/// Fetch the listing and create one `Pending` record per URL not
/// already known. Creations are persisted atomically as one batch.
/// Returns the new records; an unchanged listing yields an empty vec,
/// not an error.
pub async fn discover_new<S, F>(store: &S, fetcher: &F) -> Result<Vec<DocumentRecord>>
where
    S: DocumentStore,
    F: Fetcher,
{
    let entries = fetcher.fetch_listing().await?;
    debug!(candidates = entries.len(), "listing fetched");

    let mut new_documents: Vec<DocumentRecord> = Vec::new();
    for entry in entries {
        if store.find_by_url(&entry.url).await?.is_some() {
            continue;
        }
        // Guard against the same URL appearing twice on one listing.
        if new_documents.iter().any(|doc| doc.url == entry.url) {
            continue;
        }
        info!(title = %entry.title, url = %entry.url, "discovered new document");
        new_documents.push(DocumentRecord::new(entry.title, entry.url));
    }

    if new_documents.is_empty() {
        info!("no new documents found");
        return Ok(new_documents);
    }

    store.insert_documents(&new_documents).await?;
    info!(count = new_documents.len(), "new documents recorded");
    Ok(new_documents)
}
