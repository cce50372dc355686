//! Content-type-aware text extraction.
//!
//! Pure functions converting raw bytes of either HTML or PDF into
//! normalized plain text. No side effects, no I/O beyond the bytes
//! given; every failure surfaces as a definite [`ExtractError`].

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::ExtractError;

/// How a document's bytes should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Binary page-description format.
    Pdf,
    /// Markup document.
    Markup,
}

/// Elements stripped before taking visible text.
const BOILERPLATE_SELECTORS: &[&str] = &["nav", "script", "style", "header", "footer"];

/// Content containers, most specific first.
const CONTENT_SELECTORS: &[&str] = &["main", "div.content", "div.main-content", "body"];

/// Decide the extraction path: declared content type first, URL suffix
/// as the fallback, markup as the default.
pub fn detect_media_kind(declared_content_type: Option<&str>, url: &str) -> MediaKind {
    if let Some(content_type) = declared_content_type {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("application/pdf") {
            return MediaKind::Pdf;
        }
        if content_type.contains("text/html") || content_type.contains("xhtml") {
            return MediaKind::Markup;
        }
    }
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().ends_with(".pdf") {
        MediaKind::Pdf
    } else {
        MediaKind::Markup
    }
}

/// Extract plain text from raw document bytes.
pub fn extract(
    bytes: &[u8],
    declared_content_type: Option<&str>,
    url: &str,
) -> Result<String, ExtractError> {
    match detect_media_kind(declared_content_type, url) {
        MediaKind::Pdf => extract_pdf(bytes),
        MediaKind::Markup => extract_html(bytes),
    }
}

/// Extract text from a PDF page by page. Pages yielding only
/// whitespace are skipped; remaining pages are joined with a blank
/// line. All pages empty is [`ExtractError::EmptyContent`], distinct
/// from a parse failure.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let page_count = pages.len();
    let non_empty: Vec<String> = pages
        .into_iter()
        .map(|page| page.trim().to_string())
        .filter(|page| !page.is_empty())
        .collect();

    debug!(
        pages = page_count,
        non_empty = non_empty.len(),
        "extracted PDF pages"
    );

    if non_empty.is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    Ok(non_empty.join("\n\n"))
}

/// Extract visible text from a markup document: strip non-content
/// elements, then take text from the most specific content container
/// found, falling back to the whole body.
pub fn extract_html(bytes: &[u8]) -> Result<String, ExtractError> {
    let raw = String::from_utf8_lossy(bytes);
    let document = Html::parse_document(&raw);

    // Remove boilerplate by deleting each element's serialized form
    // from the serialized document, then re-parsing.
    let mut cleaned = document.root_element().html();
    for selector_str in BOILERPLATE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let element_html = element.html();
                if !element_html.is_empty() {
                    cleaned = cleaned.replace(&element_html, "");
                }
            }
        }
    }

    let stripped = Html::parse_document(&cleaned);
    let text = container_text(&stripped);
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyContent);
    }
    Ok(text)
}

fn container_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(container) = document.select(&selector).next() {
                return joined_text(container);
            }
        }
    }
    String::new()
}

/// Visible text joined with newlines, structure-insensitive.
fn joined_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_wins_over_suffix() {
        assert_eq!(
            detect_media_kind(Some("application/pdf"), "https://example.gov/doc.html"),
            MediaKind::Pdf
        );
        assert_eq!(
            detect_media_kind(Some("text/html; charset=utf-8"), "https://example.gov/doc.pdf"),
            MediaKind::Markup
        );
    }

    #[test]
    fn suffix_decides_when_type_absent_or_ambiguous() {
        assert_eq!(
            detect_media_kind(None, "https://example.gov/minutes.pdf"),
            MediaKind::Pdf
        );
        assert_eq!(
            detect_media_kind(None, "https://example.gov/minutes.PDF?v=2"),
            MediaKind::Pdf
        );
        assert_eq!(
            detect_media_kind(Some("application/octet-stream"), "https://example.gov/minutes"),
            MediaKind::Markup
        );
    }

    #[test]
    fn html_extraction_prefers_main_container() {
        let html = b"<html><body>\
            <nav>Site nav</nav>\
            <main><p>Call to order.</p><p>Roll call.</p></main>\
            <footer>Copyright</footer>\
            </body></html>";
        let text = extract(html, Some("text/html"), "https://example.gov/minutes").unwrap();
        assert!(text.contains("Call to order."));
        assert!(text.contains("Roll call."));
        assert!(!text.contains("Site nav"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn html_extraction_strips_scripts_and_styles() {
        let html = b"<html><body>\
            <script>var x = 1;</script>\
            <style>.a { color: red; }</style>\
            <div class=\"content\">Agenda item one</div>\
            </body></html>";
        let text = extract_html(html).unwrap();
        assert!(text.contains("Agenda item one"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn html_extraction_falls_back_to_body() {
        let html = b"<html><body><p>Only body text here.</p></body></html>";
        let text = extract_html(html).unwrap();
        assert_eq!(text, "Only body text here.");
    }

    #[test]
    fn empty_html_is_empty_content() {
        let err = extract_html(b"<html><body><nav>menu</nav></body></html>").unwrap_err();
        assert!(matches!(err, ExtractError::EmptyContent));
    }

    #[test]
    fn invalid_pdf_is_a_parse_failure() {
        let err = extract_pdf(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn text_joined_with_newlines() {
        let html = b"<html><body><main><h1>Minutes</h1><p>Item 1</p><p>Item 2</p></main></body></html>";
        let text = extract_html(html).unwrap();
        assert_eq!(text, "Minutes\nItem 1\nItem 2");
    }
}
