//! Prompts used by the analysis orchestrator.
//!
//! The default analysis prompt can be overridden per call or replaced
//! wholesale from a prompt file (first non-comment content wins).

use std::path::Path;

/// Default analysis prompt, used when the caller supplies none.
pub const DEFAULT_ANALYSIS_PROMPT: &str = "\
Please analyze these meeting minutes and provide:

1. **Executive Summary**: Brief overview of key outcomes
2. **Key Decisions**: List votes, resolutions, ordinances
3. **Budget Impact**: Financial implications and costs
4. **Action Items**: Follow-up tasks and deadlines
5. **Policy Changes**: New or modified policies
6. **Community Impact**: How this affects residents
";

/// Prompt used for the per-chunk summarization stage.
pub const SUMMARIZE_PROMPT: &str = "\
Summarize these meeting minutes, focusing on:
- Key decisions and votes
- Major agenda items discussed
- Action items and deadlines
- Financial items and budget decisions
- Public comments themes

Keep the summary comprehensive but under 1500 words.

Document to summarize:
";

/// Assemble the single-call analysis prompt.
pub fn direct_prompt(prompt: &str, content: &str) -> String {
    format!("{prompt}\n\nPlease analyze the following meeting minutes:\n\n{content}")
}

/// Assemble the summarization prompt for one chunk.
pub fn chunk_summary_prompt(part: usize, total: usize, chunk: &str) -> String {
    format!("{SUMMARIZE_PROMPT}\n\nPart {part} of {total}:\n{chunk}")
}

/// Assemble the final analysis prompt over the combined chunk summaries.
pub fn combined_prompt(prompt: &str, combined_summary: &str) -> String {
    format!(
        "{prompt}\n\nBased on the following comprehensive summary of the meeting minutes:\n\n{combined_summary}"
    )
}

/// Read a prompt from a file, skipping blank lines and `#` comments.
/// Returns `None` when the file is missing, unreadable, or contains
/// nothing but comments.
pub fn load_prompt_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_prompt_contains_both_parts() {
        let assembled = direct_prompt("Analyze this.", "Meeting called to order.");
        assert!(assembled.starts_with("Analyze this."));
        assert!(assembled.ends_with("Meeting called to order."));
    }

    #[test]
    fn chunk_prompt_labels_parts() {
        let assembled = chunk_summary_prompt(2, 3, "chunk text");
        assert!(assembled.contains("Part 2 of 3:"));
        assert!(assembled.contains("chunk text"));
    }

    #[test]
    fn prompt_file_skips_comments() {
        let dir = std::env::temp_dir();
        let path = dir.join("civic_minutes_prompt_test.txt");
        std::fs::write(&path, "# comment\n\nFirst line\nSecond line\n").unwrap();
        let loaded = load_prompt_file(&path).unwrap();
        assert_eq!(loaded, "First line\nSecond line");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_prompt_file_yields_none() {
        assert!(load_prompt_file(Path::new("/nonexistent/prompts.txt")).is_none());
    }
}
