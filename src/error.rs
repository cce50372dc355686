//! Typed errors for the minutes pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

use crate::types::document::DocumentStatus;

/// Errors that can occur while fetching the listing page or a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (timeout, non-2xx, malformed response).
    /// Retryable by caller-level scheduling, not retried internally.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The listing page did not have the expected structure.
    #[error("listing parse failed: {reason}")]
    Parse { reason: String },

    /// URL could not be parsed or resolved.
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Errors that can occur while converting raw bytes into plain text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// PDF could not be parsed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// Markup document could not be processed.
    #[error("HTML extraction failed: {0}")]
    Html(String),

    /// Input parsed cleanly but yielded no text at all.
    #[error("document contained no extractable text")]
    EmptyContent,
}

/// Errors from the model service boundary.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Request to the model service failed at the transport level.
    #[error("model request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The model service answered with an error.
    #[error("model API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The model answered but produced no usable output.
    #[error("model returned empty output")]
    Empty,

    /// The client could not be configured (missing API key, etc.).
    #[error("model configuration error: {0}")]
    Config(String),
}

/// Top-level pipeline error covering every component boundary.
///
/// Nothing propagates past the orchestrator or discovery entry points
/// except as one of these variants; callers always also get a persisted
/// lifecycle state to inspect.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetch operation failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Text extraction failed
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Both the cache path and the fetch-and-extract path failed.
    #[error("content unavailable for {url}")]
    ContentUnavailable { url: String },

    /// Model invocation failed or returned unusable output
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Operation requested against an ineligible lifecycle state.
    #[error("invalid lifecycle transition: {from} -> {to}")]
    Precondition {
        from: DocumentStatus,
        to: DocumentStatus,
    },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;
