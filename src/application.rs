//! Application layer module
//!
//! The two pipelines (listing crawl and profile fetch) and the CSV reader
//! that connects them.

pub mod listing_crawler;
pub mod profile_fetcher;
pub mod targets;

pub use listing_crawler::{CrawlError, CrawlReport, ListingCrawler, run_listing_crawl};
pub use profile_fetcher::{
    CounterSnapshot, FetchCounters, FetchOutcome, ProfileFetcher, ProfileRunReport, RunContext,
    run_profile_fetch,
};
pub use targets::{TargetList, TargetsError, read_targets, read_targets_from};
