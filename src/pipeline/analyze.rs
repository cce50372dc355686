//! The analysis orchestrator: lifecycle transitions, strategy
//! selection, and model invocation.

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{ModelError, PipelineError, Result};
use crate::pipeline::chunk::chunk_text;
use crate::pipeline::prompts;
use crate::pipeline::resolve::resolve_content;
use crate::traits::{fetcher::Fetcher, model::Model, store::DocumentStore, store::TextCache};
use crate::types::document::{AnalysisKind, AnalysisRecord, DocumentRecord, DocumentStatus};

/// Retrieve a pending document's content, advancing it to `Scraped`
/// on success or `Error` on failure. The extracted text is cached by
/// the resolver as a side effect, so analysis can reuse it.
pub async fn scrape_document<S, C, F>(
    document: &mut DocumentRecord,
    store: &S,
    cache: &C,
    fetcher: &F,
) -> Result<()>
where
    S: DocumentStore,
    C: TextCache,
    F: Fetcher,
{
    if document.status != DocumentStatus::Pending {
        return Err(PipelineError::Precondition {
            from: document.status,
            to: DocumentStatus::Scraped,
        });
    }

    info!(title = %document.title, url = %document.url, "scraping document");
    match resolve_content(document, cache, fetcher).await {
        Ok(_) => {
            document.mark_scraped_now();
            document.transition(DocumentStatus::Scraped)?;
            store.update_document(document).await?;
            info!(title = %document.title, "document scraped");
            Ok(())
        }
        Err(e) => {
            warn!(title = %document.title, error = %e, "scrape failed");
            fail_document(document, store).await?;
            Err(e)
        }
    }
}

/// Analyze one document with the caller-supplied prompt or the
/// configured default.
///
/// Entry requires `Scraped` or `Analyzed` (re-analysis is allowed and
/// appends another record). Every failure path moves the document to
/// `Error` before returning, so state always reflects the last
/// definitive outcome.
pub async fn analyze_document<S, C, F, M>(
    document: &mut DocumentRecord,
    custom_prompt: Option<&str>,
    config: &PipelineConfig,
    store: &S,
    cache: &C,
    fetcher: &F,
    model: &M,
) -> Result<AnalysisRecord>
where
    S: DocumentStore,
    C: TextCache,
    F: Fetcher,
    M: Model,
{
    info!(title = %document.title, "starting analysis");
    document.transition(DocumentStatus::Analyzing)?;
    store.update_document(document).await?;

    let text = match resolve_content(document, cache, fetcher).await {
        Ok(text) => text,
        Err(e) => {
            warn!(title = %document.title, error = %e, "could not retrieve content");
            fail_document(document, store).await?;
            return Err(e);
        }
    };

    let prompt = custom_prompt.unwrap_or(&config.default_prompt);
    let content = match run_analysis(&text, prompt, config, model).await {
        Ok(content) => content,
        Err(e) => {
            warn!(title = %document.title, error = %e, "analysis failed");
            fail_document(document, store).await?;
            return Err(e);
        }
    };

    let analysis = AnalysisRecord::new(document.id, AnalysisKind::CustomPrompt, content);
    if let Err(e) = store.create_analysis(&analysis).await {
        warn!(title = %document.title, error = %e, "failed to persist analysis");
        fail_document(document, store).await?;
        return Err(e);
    }

    document.transition(DocumentStatus::Analyzed)?;
    store.update_document(document).await?;
    info!(title = %document.title, "analysis complete");
    Ok(analysis)
}

/// Analyze all `Scraped` documents independently; one failure never
/// blocks another. Returns the number of successful analyses.
pub async fn analyze_pending<S, C, F, M>(
    config: &PipelineConfig,
    store: &S,
    cache: &C,
    fetcher: &F,
    model: &M,
) -> Result<usize>
where
    S: DocumentStore,
    C: TextCache,
    F: Fetcher,
    M: Model,
{
    let pending = store.find_by_status(DocumentStatus::Scraped).await?;
    info!(count = pending.len(), "analyzing pending documents");

    let mut analyzed = 0;
    for mut document in pending {
        match analyze_document(&mut document, None, config, store, cache, fetcher, model).await {
            Ok(_) => analyzed += 1,
            Err(e) => {
                warn!(title = %document.title, error = %e, "skipping failed document");
            }
        }
    }

    info!(analyzed, "batch analysis finished");
    Ok(analyzed)
}

/// Run the size-gated analysis strategy over resolved text.
///
/// Within the single-call budget this is one model call on the full
/// text. Over budget it is two-stage: summarize fixed-size chunks
/// (skipping ones that fail), then analyze the combined summary with
/// the original prompt.
async fn run_analysis<M: Model>(
    text: &str,
    prompt: &str,
    config: &PipelineConfig,
    model: &M,
) -> Result<String> {
    let sizing = &config.analysis;
    if sizing.fits_single_call(text, prompt) {
        let output = model
            .invoke(&prompts::direct_prompt(prompt, text))
            .await
            .map_err(PipelineError::Model)?;
        return require_output(output);
    }

    info!(
        chars = text.len(),
        "content exceeds single-call budget, using two-stage analysis"
    );

    let chunks = chunk_text(text, sizing.summarize_chunk_chars);
    let total = chunks.len();
    let mut summaries: Vec<String> = Vec::with_capacity(total);

    for (index, chunk) in chunks.iter().enumerate() {
        let part = index + 1;
        match model
            .invoke(&prompts::chunk_summary_prompt(part, total, chunk))
            .await
        {
            Ok(summary) if !summary.trim().is_empty() => summaries.push(summary),
            Ok(_) => warn!(part, total, "chunk summary was empty, skipping"),
            Err(e) => warn!(part, total, error = %e, "chunk summarization failed, skipping"),
        }
    }

    if summaries.is_empty() {
        warn!("no chunk produced a summary");
        return Err(PipelineError::Model(ModelError::Empty));
    }

    let combined = summaries.join("\n\n");
    let output = model
        .invoke(&prompts::combined_prompt(prompt, &combined))
        .await
        .map_err(PipelineError::Model)?;
    require_output(output)
}

fn require_output(output: String) -> Result<String> {
    if output.trim().is_empty() {
        Err(PipelineError::Model(ModelError::Empty))
    } else {
        Ok(output)
    }
}

/// Move a document to `Error` and persist that before reporting the
/// original failure to the caller.
async fn fail_document<S: DocumentStore>(
    document: &mut DocumentRecord,
    store: &S,
) -> Result<()> {
    document.transition(DocumentStatus::Error)?;
    store.update_document(document).await
}
