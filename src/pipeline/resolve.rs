//! Content resolution: cached text first, fetch-and-extract second.

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::extract;
use crate::traits::{fetcher::Fetcher, store::TextCache};
use crate::types::document::DocumentRecord;

/// Resolve a document's text.
///
/// Prefers a previously cached copy; falls back to fetching and
/// extracting from the document's URL. Freshly extracted text is
/// cached best-effort under a deterministic key, and the new cache
/// location (plus a content hash) is recorded on the record — the
/// caller persists that on its next store update. A successful
/// resolution always yields non-empty text.
pub async fn resolve_content<C, F>(
    document: &mut DocumentRecord,
    cache: &C,
    fetcher: &F,
) -> Result<String>
where
    C: TextCache,
    F: Fetcher,
{
    if let Some(location) = &document.cache_location {
        match cache.get(location).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                debug!(url = %document.url, location = %location, "content served from cache");
                return Ok(text);
            }
            Ok(_) => {
                debug!(url = %document.url, location = %location, "cache miss, fetching");
            }
            Err(e) => {
                warn!(url = %document.url, error = %e, "cache read failed, fetching");
            }
        }
    }

    let fetched = match fetcher.fetch_document(&document.url).await {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(url = %document.url, error = %e, "document fetch failed");
            return Err(PipelineError::ContentUnavailable {
                url: document.url.clone(),
            });
        }
    };

    let text = match extract::extract(
        &fetched.bytes,
        fetched.content_type.as_deref(),
        &document.url,
    ) {
        Ok(text) => text,
        Err(e) => {
            warn!(url = %document.url, error = %e, "extraction failed");
            return Err(PipelineError::ContentUnavailable {
                url: document.url.clone(),
            });
        }
    };

    if text.trim().is_empty() {
        warn!(url = %document.url, "extraction produced empty text");
        return Err(PipelineError::ContentUnavailable {
            url: document.url.clone(),
        });
    }

    if document.cache_location.is_none() {
        let key = cache_key(document);
        match cache.put(&key, &text).await {
            Ok(()) => {
                info!(url = %document.url, location = %key, "cached extracted text");
                document.content_hash = Some(hash_content(&text));
                document.cache_location = Some(key);
            }
            Err(e) => {
                // Best-effort: resolution still succeeds, we just
                // forgo caching for next time.
                warn!(url = %document.url, error = %e, "cache write failed");
            }
        }
    }

    Ok(text)
}

/// Deterministic cache key derived from document identity and title.
pub fn cache_key(document: &DocumentRecord) -> String {
    format!(
        "documents/{}_{}.txt",
        document.id,
        document.title.replace(' ', "_")
    )
}

/// SHA-256 hash of extracted text, recorded for change detection.
pub fn hash_content(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_deterministic_and_title_derived() {
        let doc = DocumentRecord::new("Board Meeting Minutes - May 6, 2025", "https://example.gov/m");
        let key = cache_key(&doc);
        assert_eq!(key, cache_key(&doc));
        assert!(key.starts_with(&format!("documents/{}_", doc.id)));
        assert!(key.ends_with("Board_Meeting_Minutes_-_May_6,_2025.txt"));
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }
}
