//! adoption-scraper - listing crawler and profile fetcher for a pet
//! adoption site
//!
//! The listing crawler walks the paginated catalogue and writes one CSV row
//! per animal. The profile fetcher reads that CSV, fetches every profile
//! page concurrently and writes the extracted details as JSON.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_utils;
