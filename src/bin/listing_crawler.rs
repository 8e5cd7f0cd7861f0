//! listing-crawler: walk the adoption listing and save every animal card
//! to CSV

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use adoption_scraper::application::run_listing_crawl;
use adoption_scraper::infrastructure::{ConfigManager, init_logging_with_config};

const TOOL_NAME: &str = "listing-crawler";

#[derive(Parser, Debug)]
#[command(name = TOOL_NAME)]
#[command(about = "Scrape a paginated site for animal data and save to CSV.")]
#[command(version)]
struct Cli {
    /// The base URL to start scraping from (e.g. https://dogcat.com.ua/adoption?animal=2)
    base_url: String,

    /// Path to the output CSV file [default: ./data/cats/data.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConfigManager::resolve(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{TOOL_NAME}: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging_with_config(TOOL_NAME, &config.logging) {
        eprintln!("{TOOL_NAME}: {e:#}");
        return ExitCode::FAILURE;
    }

    let output = cli.output.unwrap_or_else(|| config.crawler.default_output.clone());
    if let Err(e) = run_listing_crawl(&config, &cli.base_url, &output).await {
        error!("Crawl could not start: {:#}", e);
    }

    ExitCode::SUCCESS
}
