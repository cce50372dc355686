//! Pipeline configuration.
//!
//! Builder-style config structs with sensible defaults. Secrets (the
//! model API key) are loaded by the model client itself, not here.

use std::path::Path;
use std::time::Duration;

use crate::pipeline::prompts;

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// The public page enumerating available meeting documents.
    pub listing_url: String,

    /// User agent sent with every request.
    pub user_agent: String,

    /// Transport timeout applied to each request.
    pub timeout: Duration,

    /// Polite delay between consecutive requests (milliseconds).
    pub rate_limit_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://sfbos.org/meetings/full-board-meetings".to_string(),
            user_agent: "CivicMinutesBot/1.0".to_string(),
            timeout: Duration::from_secs(30),
            rate_limit_ms: 0,
        }
    }
}

impl FetchConfig {
    /// Create a config pointed at a listing URL.
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            ..Default::default()
        }
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the delay between requests (milliseconds).
    pub fn with_rate_limit(mut self, ms: u64) -> Self {
        self.rate_limit_ms = ms;
        self
    }
}

/// Sizing parameters for the analysis strategy decision.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Approximate chars-per-token ratio used for estimation.
    pub chars_per_token: usize,

    /// Tokens reserved for the model's response.
    pub response_reserve_tokens: usize,

    /// Estimated-token ceiling for a single direct model call.
    pub single_call_token_budget: usize,

    /// Chunk size (characters) used by the summarization stage.
    pub summarize_chunk_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            chars_per_token: 4,
            response_reserve_tokens: 500,
            single_call_token_budget: 8_000,
            summarize_chunk_chars: 20_000,
        }
    }
}

impl AnalysisConfig {
    /// Rough token cost of analyzing `text` with `prompt` in one call.
    pub fn estimated_tokens(&self, text: &str, prompt: &str) -> usize {
        text.len() / self.chars_per_token
            + prompt.len() / self.chars_per_token
            + self.response_reserve_tokens
    }

    /// Whether a direct single-call analysis fits the budget.
    pub fn fits_single_call(&self, text: &str, prompt: &str) -> bool {
        self.estimated_tokens(text, prompt) <= self.single_call_token_budget
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub analysis: AnalysisConfig,

    /// Prompt used when the caller does not supply one.
    pub default_prompt: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            default_prompt: prompts::DEFAULT_ANALYSIS_PROMPT.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the analysis sizing parameters.
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    /// Set the default analysis prompt.
    pub fn with_default_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_prompt = prompt.into();
        self
    }

    /// Load the default prompt from a prompt file if one exists,
    /// keeping the built-in default otherwise.
    pub fn with_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = prompts::load_prompt_file(path.as_ref()) {
            self.default_prompt = prompt;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_matches_formula() {
        let config = AnalysisConfig::default();
        let text = "x".repeat(4_000);
        let prompt = "y".repeat(400);
        assert_eq!(config.estimated_tokens(&text, &prompt), 1_000 + 100 + 500);
        assert!(config.fits_single_call(&text, &prompt));
    }

    #[test]
    fn oversized_text_exceeds_budget() {
        let config = AnalysisConfig::default();
        let text = "x".repeat(45_000);
        assert!(!config.fits_single_call(&text, "prompt"));
    }
}
