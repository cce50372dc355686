//! Model trait for LLM invocation.

use async_trait::async_trait;

use crate::error::ModelResult;

/// A single synchronous call to a large-language-model.
///
/// Implementations wrap specific providers and handle request
/// mechanics; the pipeline only needs prompt-in, text-out. No
/// streaming.
#[async_trait]
pub trait Model: Send + Sync {
    /// Send one prompt and return the model's text response.
    async fn invoke(&self, prompt: &str) -> ModelResult<String>;
}
