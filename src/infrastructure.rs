//! Infrastructure layer: configuration, logging, HTTP, HTML parsing and
//! output writers

pub mod config;
pub mod export;
pub mod http_client;
pub mod logging;
pub mod parsing;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, HttpConfig, LoggingConfig};
pub use export::{ExportError, write_listing_csv, write_profiles_json};
pub use http_client::{FetchError, FetchedPage, HttpClient, PageFetcher};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{ListingPageParser, ParsingConfig, ParsingError, ProfilePageParser};
