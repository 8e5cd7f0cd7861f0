//! Concurrent profile fetcher
//!
//! Every target gets its own task, spawned up front. Tasks pass through a
//! shared semaphore for the duration of the request and body read only;
//! extraction and bookkeeping run outside the gate. Results and counters
//! live in a [`RunContext`] handed to each task.

use futures::future::join_all;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

use super::targets::read_targets;
use crate::domain::{ProfileRecord, ProfileTarget};
use crate::infrastructure::{
    AppConfig, HttpClient, PageFetcher, ProfilePageParser, write_profiles_json,
};

/// How one target ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    MissingInfo,
    Failed,
}

/// Run counters, updated from many tasks at once
#[derive(Debug, Default)]
pub struct FetchCounters {
    links: AtomicUsize,
    success: AtomicUsize,
    fail: AtomicUsize,
    missing_info: AtomicUsize,
}

impl FetchCounters {
    /// Count a created task; returns its 1-based sequence number
    fn next_link(&self) -> usize {
        self.links.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn record(&self, outcome: FetchOutcome) {
        let counter = match outcome {
            FetchOutcome::Success => &self.success,
            FetchOutcome::MissingInfo => &self.missing_info,
            FetchOutcome::Failed => &self.fail,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            links: self.links.load(Ordering::SeqCst),
            success: self.success.load(Ordering::SeqCst),
            fail: self.fail.load(Ordering::SeqCst),
            missing_info: self.missing_info.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time copy of [`FetchCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub links: usize,
    pub success: usize,
    pub fail: usize,
    pub missing_info: usize,
}

/// Shared sink for one run
#[derive(Debug, Default)]
pub struct RunContext {
    results: Mutex<Vec<ProfileRecord>>,
    counters: FetchCounters,
}

impl RunContext {
    pub fn counters(&self) -> &FetchCounters {
        &self.counters
    }

    async fn push(&self, record: ProfileRecord) {
        self.results.lock().await.push(record);
    }
}

/// Records in completion order plus the final counters
#[derive(Debug, Default)]
pub struct ProfileRunReport {
    pub profiles: Vec<ProfileRecord>,
    pub counters: CounterSnapshot,
}

/// Semaphore-bounded profile fetcher
pub struct ProfileFetcher<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
    parser: Arc<ProfilePageParser>,
    concurrency: usize,
}

impl<F: PageFetcher + 'static> ProfileFetcher<F> {
    /// `concurrency` is the maximum number of requests in flight; 0 is
    /// treated as 1
    pub fn new(fetcher: F, parser: ProfilePageParser, concurrency: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            parser: Arc::new(parser),
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch every target and wait for all of them
    pub async fn run(&self, targets: Vec<ProfileTarget>) -> ProfileRunReport {
        let gate = Arc::new(Semaphore::new(self.concurrency));
        let context = Arc::new(RunContext::default());

        let handles: Vec<_> = targets
            .into_iter()
            .map(|target| {
                let n = context.counters.next_link();
                info!("Fetching ({}): {}", n, target.link);
                tokio::spawn(fetch_profile(
                    Arc::clone(&self.fetcher),
                    Arc::clone(&self.parser),
                    Arc::clone(&gate),
                    Arc::clone(&context),
                    target,
                ))
            })
            .collect();

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                error!("Profile task aborted: {}", e);
                context.counters.record(FetchOutcome::Failed);
            }
        }

        let profiles = std::mem::take(&mut *context.results.lock().await);
        ProfileRunReport {
            profiles,
            counters: context.counters.snapshot(),
        }
    }
}

async fn fetch_profile<F: PageFetcher>(
    fetcher: Arc<F>,
    parser: Arc<ProfilePageParser>,
    gate: Arc<Semaphore>,
    context: Arc<RunContext>,
    target: ProfileTarget,
) {
    let fetched = {
        let _permit = match gate.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("  -> Concurrency gate closed for {}: {}", target.link, e);
                context.counters.record(FetchOutcome::Failed);
                return;
            }
        };
        fetcher.fetch(&target.link).await
    };

    let outcome = match fetched {
        Ok(page) if page.is_ok() => match parser.extract(&page.body) {
            Some(detail) => {
                info!("  -> Extracted profile for {}", target.link);
                context.push(ProfileRecord::from_detail(target, detail)).await;
                FetchOutcome::Success
            }
            None => {
                warn!("  -> Profile info not found for {}", target.link);
                FetchOutcome::MissingInfo
            }
        },
        Ok(page) => {
            error!("  -> Failed to fetch {}, status code: {}", target.link, page.status);
            FetchOutcome::Failed
        }
        Err(e) => {
            error!("  -> Error fetching {}: {}", target.link, e);
            FetchOutcome::Failed
        }
    };

    context.counters.record(outcome);
}

fn log_summary(counters: &CounterSnapshot) {
    info!("Total URLs processed: {}", counters.links);
    info!("Successful extractions: {}", counters.success);
    info!("Missing profile info: {}", counters.missing_info);
    info!("Failed fetches/errors: {}", counters.fail);
}

/// Read targets from `csv_path`, fetch them and write the JSON output.
///
/// An unreadable input file is an error; a write failure is logged and the
/// counters are still returned.
pub async fn run_profile_fetch(
    config: &AppConfig,
    csv_path: &Path,
    output: &Path,
    concurrency: usize,
) -> anyhow::Result<CounterSnapshot> {
    let targets = read_targets(csv_path)?;
    if targets.skipped_rows > 0 {
        warn!("{} rows skipped in {}", targets.skipped_rows, csv_path.display());
    }

    let client = HttpClient::new(&config.http, concurrency)?;
    let parser = ProfilePageParser::with_config(&config.parsing.profile)?;
    let fetcher = ProfileFetcher::new(client, parser, concurrency);

    let report = fetcher.run(targets.targets).await;

    match write_profiles_json(output, &report.profiles) {
        Ok(()) => info!("Extracted adoption profiles saved to {}", output.display()),
        Err(e) => error!("Failed to save profiles: {}", e),
    }
    log_summary(&report.counters);

    Ok(report.counters)
}
