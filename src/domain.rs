//! Domain module - records produced by the two scraping pipelines
//!
//! Each module is its own file in the domain/ directory;
//! public exports are defined here for convenience.

pub mod listing;
pub mod profile;

pub use listing::ListingRecord;
pub use profile::{ProfileDetail, ProfileRecord, ProfileTarget};
