//! HTTP fetcher for the listing page and individual documents.
//!
//! Uses `reqwest` for transport and the `scraper` crate (CSS
//! selectors) to locate the meetings table and its minutes links.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;
use crate::types::document::{FetchedDocument, ListingEntry};

/// Fetcher backed by a configured `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Build a fetcher from config. The transport timeout lives on the
    /// client so a hung call cannot stall the pipeline indefinitely.
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Network(Box::new(e)))?;
        Ok(Self { client, config })
    }

    async fn get(&self, url: &str) -> FetchResult<reqwest::Response> {
        if self.config.rate_limit_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.rate_limit_ms)).await;
        }

        debug!(url = %url, "HTTP fetch starting");
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            FetchError::Network(Box::new(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(
                format!("HTTP {status} for {url}").into(),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_listing(&self) -> FetchResult<Vec<ListingEntry>> {
        let response = self.get(&self.config.listing_url).await?;
        // Resolve row links against the final URL, in case of redirects.
        let base = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Network(Box::new(e)))?;

        let entries = parse_listing(&html, &base)?;
        info!(count = entries.len(), "found meeting minutes entries");
        Ok(entries)
    }

    async fn fetch_document(&self, url: &str) -> FetchResult<FetchedDocument> {
        let response = self.get(url).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(Box::new(e)))?
            .to_vec();

        debug!(url = %url, bytes = bytes.len(), content_type = ?content_type, "document fetched");
        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }
}

/// Parse the listing page into candidate minutes entries.
///
/// Table policy: prefer a table whose header row mentions "minutes"
/// (case-insensitive); otherwise the first table on the page; no table
/// at all is a parse failure. Rows without a resolvable minutes link
/// are silently skipped.
pub fn parse_listing(html: &str, base: &Url) -> FetchResult<Vec<ListingEntry>> {
    let document = Html::parse_document(html);

    let table_selector = selector("table")?;
    let tables: Vec<ElementRef<'_>> = document.select(&table_selector).collect();
    if tables.is_empty() {
        return Err(FetchError::Parse {
            reason: "no table found on listing page".to_string(),
        });
    }

    let table = tables
        .iter()
        .find(|t| header_mentions_minutes(**t))
        .copied()
        .unwrap_or(tables[0]);

    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let mut entries = Vec::new();
    for row in table.select(&row_selector) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        // Expect at least date, agenda, minutes columns. Header rows
        // use <th> and fall out here.
        if cells.len() < 3 {
            continue;
        }

        let date = cell_text(cells[0]);
        let Some(href) = minutes_href(&cells) else {
            continue;
        };
        let Ok(resolved) = base.join(&href) else {
            debug!(href = %href, "skipping row with unresolvable minutes link");
            continue;
        };

        entries.push(ListingEntry {
            title: format!("Board Meeting Minutes - {date}"),
            url: resolved.to_string(),
            date,
        });
    }

    Ok(entries)
}

/// Locate the minutes link for a row: the third column's link if it
/// has one, otherwise any column's link whose target contains
/// "minutes" (case-insensitive).
fn minutes_href(cells: &[ElementRef<'_>]) -> Option<String> {
    let link_selector = Selector::parse("a[href]").ok()?;

    if let Some(link) = cells[2].select(&link_selector).next() {
        if let Some(href) = link.value().attr("href") {
            return Some(href.to_string());
        }
    }

    for cell in cells {
        for link in cell.select(&link_selector) {
            if let Some(href) = link.value().attr("href") {
                if href.to_ascii_lowercase().contains("minutes") {
                    return Some(href.to_string());
                }
            }
        }
    }

    None
}

fn header_mentions_minutes(table: ElementRef<'_>) -> bool {
    let Ok(row_selector) = Selector::parse("tr") else {
        return false;
    };
    let Some(header_row) = table.select(&row_selector).next() else {
        return false;
    };
    header_row
        .text()
        .collect::<String>()
        .to_ascii_lowercase()
        .contains("minutes")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(css: &str) -> FetchResult<Selector> {
    Selector::parse(css).map_err(|e| FetchError::Parse {
        reason: format!("selector {css}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.gov/meetings").unwrap()
    }

    #[test]
    fn rows_with_minutes_links_are_extracted() {
        let html = r#"
        <table>
          <tr><th>Date</th><th>Agenda</th><th>Minutes</th></tr>
          <tr>
            <td>January 7, 2025</td>
            <td><a href="/agenda-0107">Agenda</a></td>
            <td><a href="/minutes-0107">Minutes</a></td>
          </tr>
          <tr>
            <td>January 14, 2025</td>
            <td><a href="/agenda-0114">Agenda</a></td>
            <td><a href="https://example.gov/minutes-0114.pdf">Minutes</a></td>
          </tr>
        </table>
        "#;

        let entries = parse_listing(html, &base()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://example.gov/minutes-0107");
        assert_eq!(entries[0].date, "January 7, 2025");
        assert_eq!(entries[0].title, "Board Meeting Minutes - January 7, 2025");
        assert_eq!(entries[1].url, "https://example.gov/minutes-0114.pdf");
    }

    #[test]
    fn three_rows_two_links_yield_two_entries() {
        let html = r#"
        <table>
          <tr><th>Date</th><th>Agenda</th><th>Minutes</th></tr>
          <tr>
            <td>February 4, 2025</td><td></td>
            <td><a href="/minutes-0204">Minutes</a></td>
          </tr>
          <tr>
            <td>February 11, 2025</td><td></td>
            <td><a href="/minutes-0211">Minutes</a></td>
          </tr>
          <tr>
            <td>February 18, 2025</td><td></td><td>Not yet available</td>
          </tr>
        </table>
        "#;

        let entries = parse_listing(html, &base()).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn minutes_link_found_outside_third_column() {
        let html = r#"
        <table>
          <tr><th>Date</th><th>Documents</th><th>Notes</th></tr>
          <tr>
            <td>March 3, 2025</td>
            <td><a href="/docs/minutes-0303.pdf">Meeting record</a></td>
            <td>approved</td>
          </tr>
        </table>
        "#;

        let entries = parse_listing(html, &base()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://example.gov/docs/minutes-0303.pdf");
    }

    #[test]
    fn table_with_minutes_header_preferred_over_first() {
        let html = r#"
        <table>
          <tr><th>Name</th><th>Phone</th><th>Office</th></tr>
          <tr><td>Clerk</td><td>555-0100</td><td><a href="/contact">Contact</a></td></tr>
        </table>
        <table>
          <tr><th>Date</th><th>Agenda</th><th>Minutes</th></tr>
          <tr>
            <td>April 1, 2025</td><td></td>
            <td><a href="/minutes-0401">Minutes</a></td>
          </tr>
        </table>
        "#;

        let entries = parse_listing(html, &base()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://example.gov/minutes-0401");
    }

    #[test]
    fn first_table_used_when_no_header_mentions_minutes() {
        let html = r#"
        <table>
          <tr><th>Date</th><th>Agenda</th><th>Record</th></tr>
          <tr>
            <td>May 6, 2025</td><td></td>
            <td><a href="/minutes-0506">Record</a></td>
          </tr>
        </table>
        "#;

        let entries = parse_listing(html, &base()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn rows_with_too_few_columns_are_skipped() {
        let html = r#"
        <table>
          <tr><th>Date</th><th>Agenda</th><th>Minutes</th></tr>
          <tr><td colspan="3">No meetings scheduled</td></tr>
          <tr>
            <td>June 3, 2025</td><td></td>
            <td><a href="/minutes-0603">Minutes</a></td>
          </tr>
        </table>
        "#;

        let entries = parse_listing(html, &base()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn page_without_table_is_a_parse_error() {
        let err = parse_listing("<html><body><p>maintenance</p></body></html>", &base())
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }
}
