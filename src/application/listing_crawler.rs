//! Listing crawler
//!
//! Walks the paginated listing one page at a time, following the "next"
//! link until there is none. Cards are deduplicated by link across the whole
//! crawl; the first occurrence wins.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::domain::ListingRecord;
use crate::infrastructure::parsing::{ListingCard, ListingPage};
use crate::infrastructure::{
    AppConfig, FetchError, HttpClient, ListingPageParser, PageFetcher, write_listing_csv,
};

/// Errors that end a crawl early
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid page URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Outcome of a crawl. Records collected before an error are kept.
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub records: Vec<ListingRecord>,
    pub pages_visited: usize,
    pub skipped_cards: usize,
    pub duplicate_cards: usize,
    pub error: Option<CrawlError>,
}

/// Accumulates records in first-seen order, keyed by link
#[derive(Debug, Default)]
struct RecordCollector {
    seen_links: HashSet<String>,
    records: Vec<ListingRecord>,
    skipped: usize,
    duplicates: usize,
}

impl RecordCollector {
    fn absorb(&mut self, card: ListingCard) {
        let record = match card.clone().into_record() {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping animal due to missing data ({}): {}", e, card);
                self.skipped += 1;
                return;
            }
        };

        if self.seen_links.insert(record.link.clone()) {
            self.records.push(record);
        } else {
            debug!("Duplicate link skipped: {}", record.link);
            self.duplicates += 1;
        }
    }
}

/// Sequential crawler over a [`PageFetcher`]
pub struct ListingCrawler<F: PageFetcher> {
    fetcher: F,
    parser: ListingPageParser,
}

impl<F: PageFetcher> ListingCrawler<F> {
    pub fn new(fetcher: F, parser: ListingPageParser) -> Self {
        Self { fetcher, parser }
    }

    /// Crawl from `start_url` until the page chain ends or a page fails
    pub async fn crawl(&self, start_url: &str) -> CrawlReport {
        let mut collector = RecordCollector::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages_visited = 0;
        let mut failure = None;
        let mut cursor = Some(start_url.to_string());

        while let Some(url) = cursor.take() {
            if !visited.insert(url.clone()) {
                warn!("Next page {} was already visited; stopping pagination", url);
                break;
            }

            match self.visit(&url).await {
                Ok(page) => {
                    pages_visited += 1;
                    for card in page.cards {
                        collector.absorb(card);
                    }
                    info!(
                        "Processed page: {} (next: {})",
                        url,
                        page.next_page.as_deref().unwrap_or("(no more pages)")
                    );
                    cursor = page.next_page;
                }
                Err(e) => {
                    error!("Error fetching page {}: {}", url, e);
                    failure = Some(e);
                }
            }
        }

        CrawlReport {
            records: collector.records,
            pages_visited,
            skipped_cards: collector.skipped,
            duplicate_cards: collector.duplicates,
            error: failure,
        }
    }

    async fn visit(&self, url: &str) -> Result<ListingPage, CrawlError> {
        let page_url = Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let page = self.fetcher.fetch(url).await?;
        if !page.is_success() {
            return Err(CrawlError::HttpStatus {
                url: url.to_string(),
                status: page.status,
            });
        }

        Ok(self.parser.parse_page(&page.body, &page_url))
    }
}

/// Crawl `base_url` with the configured client and write the CSV.
///
/// An empty result is reported and nothing is written. A write failure is
/// logged; the report is still returned.
pub async fn run_listing_crawl(
    config: &AppConfig,
    base_url: &str,
    output: &Path,
) -> anyhow::Result<CrawlReport> {
    let client = HttpClient::new(&config.http, 1)?;
    let parser = ListingPageParser::with_config(&config.parsing.listing)?;
    let crawler = ListingCrawler::new(client, parser);

    info!("Starting crawl at {}", base_url);
    let report = crawler.crawl(base_url).await;
    info!(
        "Crawl finished: {} records from {} pages ({} skipped, {} duplicates)",
        report.records.len(),
        report.pages_visited,
        report.skipped_cards,
        report.duplicate_cards
    );

    if report.records.is_empty() {
        warn!("No data was scraped.");
        return Ok(report);
    }

    match write_listing_csv(output, &report.records) {
        Ok(()) => info!("Data saved to {}", output.display()),
        Err(e) => error!("Failed to save data: {}", e),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeFetcher, listing_card_html, listing_page_html};

    const BASE: &str = "https://dogcat.com.ua/adoption?animal=2";

    fn crawler(fetcher: FakeFetcher) -> ListingCrawler<FakeFetcher> {
        ListingCrawler::new(fetcher, ListingPageParser::new().unwrap())
    }

    #[tokio::test]
    async fn test_single_page_without_next_link() {
        let fetcher = FakeFetcher::new().with_page(
            BASE,
            200,
            listing_page_html(&[listing_card_html("1728", "/pet/piksel", "Піксель")], None),
        );

        let report = crawler(fetcher).crawl(BASE).await;

        assert!(report.error.is_none());
        assert_eq!(report.pages_visited, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].link, "https://dogcat.com.ua/pet/piksel");
        assert_eq!(report.records[0].sex, "Хлопчик");
        assert_eq!(report.records[0].age, "1 місяць");
    }

    #[tokio::test]
    async fn test_duplicate_link_keeps_first_seen() {
        let page2 = "https://dogcat.com.ua/adoption?animal=2&page=2";
        let fetcher = FakeFetcher::new()
            .with_page(
                BASE,
                200,
                listing_page_html(
                    &[listing_card_html("1", "/pet/a", "Перший")],
                    Some("/adoption?animal=2&page=2"),
                ),
            )
            .with_page(
                page2,
                200,
                listing_page_html(
                    &[
                        listing_card_html("99", "/pet/a", "Інший"),
                        listing_card_html("2", "/pet/b", "Другий"),
                    ],
                    None,
                ),
            );

        let report = crawler(fetcher).crawl(BASE).await;

        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Перший", "Другий"]);
        assert_eq!(report.records[0].pet_id, "1");
        assert_eq!(report.duplicate_cards, 1);
        assert_eq!(report.pages_visited, 2);
    }

    #[tokio::test]
    async fn test_error_status_stops_and_keeps_records() {
        let fetcher = FakeFetcher::new()
            .with_page(
                BASE,
                200,
                listing_page_html(&[listing_card_html("1", "/pet/a", "Перший")], Some("/page/2")),
            )
            .with_page("https://dogcat.com.ua/page/2", 503, "");

        let report = crawler(fetcher).crawl(BASE).await;

        assert_eq!(report.records.len(), 1);
        assert!(matches!(report.error, Some(CrawlError::HttpStatus { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_transport_error_stops_crawl() {
        let fetcher = FakeFetcher::new().with_transport_error(BASE);

        let report = crawler(fetcher).crawl(BASE).await;

        assert!(report.records.is_empty());
        assert_eq!(report.pages_visited, 0);
        assert!(matches!(report.error, Some(CrawlError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_next_link_back_to_visited_page_stops() {
        let fetcher = FakeFetcher::new().with_page(
            BASE,
            200,
            listing_page_html(&[listing_card_html("1", "/pet/a", "Перший")], Some(BASE)),
        );

        let report = crawler(fetcher.clone()).crawl(BASE).await;

        assert!(report.error.is_none());
        assert_eq!(report.pages_visited, 1);
        assert_eq!(fetcher.requests(), [BASE]);
    }

    #[tokio::test]
    async fn test_incomplete_card_is_skipped() {
        let incomplete = r#"<div class="animalCard"><h5>Без посилання</h5></div>"#.to_string();
        let fetcher = FakeFetcher::new().with_page(
            BASE,
            200,
            listing_page_html(&[incomplete, listing_card_html("2", "/pet/b", "Другий")], None),
        );

        let report = crawler(fetcher).crawl(BASE).await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped_cards, 1);
    }
}
