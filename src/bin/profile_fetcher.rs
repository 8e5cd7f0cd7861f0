//! profile-fetcher: fetch every adoption profile listed in a CSV file and
//! save the details as JSON

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use adoption_scraper::application::run_profile_fetch;
use adoption_scraper::infrastructure::{ConfigManager, init_logging_with_config};

const TOOL_NAME: &str = "profile-fetcher";

#[derive(Parser, Debug)]
#[command(name = TOOL_NAME)]
#[command(about = "Extract adoption profiles from URLs listed in a CSV file.")]
#[command(version)]
struct Cli {
    /// Path to the CSV file containing 'pet_id' and 'link' columns
    csv_path: PathBuf,

    /// Path to the output JSON file [default: ./data/cats/adoption_profiles.json]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of concurrent requests [default: 10]
    #[arg(short = 'n', long)]
    concurrency: Option<NonZeroUsize>,

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

    let output = cli.output.unwrap_or_else(|| config.profiles.default_output.clone());
    let concurrency = cli
        .concurrency
        .map_or(config.profiles.concurrency, NonZeroUsize::get);

    info!("Reading targets from {}", cli.csv_path.display());
    if let Err(e) = run_profile_fetch(&config, &cli.csv_path, &output, concurrency).await {
        error!("Profile fetch could not start: {:#}", e);
    }

    ExitCode::SUCCESS
}
