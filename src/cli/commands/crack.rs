//! `zipsweep crack`: keyspace search against an encrypted ZIP archive

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use crate::archive::ZipEntryArchive;
use crate::cli::Output;
use crate::cli::output::format_count;
use crate::config::{ConfigOverrides, OutputOverrides, SearchOverrides, SweepConfig};
use crate::error::SearchError;
use crate::parallel::CancelToken;
use crate::search::{
    Driver, ProgressSample, RoundPlan, RoundReport, SearchObserver, SearchResult, SearchStart,
    StopReason,
};

#[derive(Args, Debug)]
pub struct CrackArgs {
    /// Encrypted single-entry ZIP archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Where to save the recovered key [default: result/password.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Ordered candidate symbols [default: a-z0-9]
    #[arg(long)]
    pub alphabet: Option<String>,

    /// Key length [default: 6]
    #[arg(long)]
    pub length: Option<usize>,

    /// Worker threads per round [default: one per core]
    #[arg(long)]
    pub workers: Option<usize>,

    /// Leading symbols fixed per round [default: 1]
    #[arg(long)]
    pub prefix_length: Option<usize>,

    /// Candidates per worker between progress lines (0 disables)
    #[arg(long)]
    pub progress_interval: Option<u64>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub time_budget: Option<u64>,
}

impl CrackArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            search: SearchOverrides {
                alphabet: self.alphabet.clone(),
                length: self.length,
                prefix_length: self.prefix_length,
                max_threads: None,
                progress_interval: self.progress_interval,
                time_budget_secs: self.time_budget,
            },
            output: OutputOverrides {
                password_file: self.output.clone(),
                caesar_file: None,
            },
        }
    }
}

pub async fn execute(args: CrackArgs, config_path: Option<&str>, output: Output) -> Result<ExitCode> {
    let config = SweepConfig::load_with(config_path, Some(&args.overrides()))?;

    let archive = ZipEntryArchive::open(&args.archive)
        .with_context(|| format!("Failed to open archive {}", args.archive.display()))?;
    tracing::debug!(
        entry = archive.entry_name(),
        size = archive.entry_size(),
        compressed = archive.compressed_size(),
        "Opened archive"
    );

    let keyspace = config.search.keyspace()?;
    let mut options = config.search.search_options();
    if let Some(workers) = args.workers {
        options.worker_count = workers;
    }

    output.header("zipsweep crack");
    output.table_row("Archive", &args.archive.display().to_string());
    output.table_row("Entry", archive.entry_name());
    output.table_row("Alphabet", &config.search.alphabet);
    output.table_row("Length", &config.search.length.to_string());
    output.table_row("Workers", &options.worker_count.to_string());
    output.blank_line();

    let cancel = CancelToken::new();
    let driver = Driver::new(archive, keyspace, options)?
        .with_observer(ConsoleObserver { output })
        .with_cancel_token(cancel.clone());

    // Ctrl-C stops every worker within one candidate
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let destination = config.output.password_file.clone();
    let outcome = tokio::task::spawn_blocking(move || driver.search_and_persist(&destination))
        .await
        .context("Search task failed")?;
    interrupt.abort();

    match outcome {
        Ok(result) => {
            report(&result, &output);
            if result.found {
                output.success(&format!(
                    "Key saved to {}",
                    config.output.password_file.display()
                ));
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Err(SearchError::Persistence { result, source }) => {
            report(&result, &output);
            output.error(&source.to_string());
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}

fn report(result: &SearchResult, output: &Output) {
    match result.stop {
        StopReason::Interrupted => output.warning("Search interrupted"),
        StopReason::TimeBudget => output.warning("Time budget exhausted"),
        StopReason::Found | StopReason::Exhausted => {}
    }

    output.table_row("Examined", &format_count(result.total_examined));
    output.table_row("Rounds", &format_count(result.rounds_completed));
    output.table_row("False positives", &format_count(result.false_positives));
    output.table_row("Elapsed", &format_elapsed(result.elapsed));
    output.table_row(
        "Throughput",
        &format!("{}/s", format_count(result.throughput() as u64)),
    );

    // Always printed, even with --quiet
    println!("found: {}", result.candidate.as_deref().unwrap_or("none"));
}

fn start_banner(start: &SearchStart) -> String {
    format!(
        "Search started at {} | {} candidates in {} rounds",
        start.started_at.format("%Y-%m-%d %H:%M:%S"),
        format_count(start.total_candidates),
        format_count(start.total_rounds)
    )
}

fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    format!("{seconds:.2}s ({:.2} min)", seconds / 60.0)
}

/// Prints progress lines and round banners on stdout
struct ConsoleObserver {
    output: Output,
}

impl SearchObserver for ConsoleObserver {
    fn search_started(&self, start: &SearchStart) {
        tracing::info!(workers = start.workers, "Search started");
        self.output.info(&start_banner(start));
    }

    fn round_started(&self, plan: &RoundPlan<'_>) {
        self.output.step(&format!(
            "Round {}/{} | prefix '{}' | batch {} | remainder {} | jobs {}",
            plan.index + 1,
            plan.total_rounds,
            plan.prefix,
            format_count(plan.base_chunk_size()),
            plan.remainder(),
            plan.chunks.len()
        ));
        for (worker_id, chunk) in plan.chunks.iter().enumerate() {
            self.output
                .verbose(&format!("worker {worker_id}: [{}, {})", chunk.start, chunk.end));
        }
    }

    fn progress(&self, sample: &ProgressSample<'_>) {
        if self.output.is_quiet() {
            return;
        }
        println!(
            "PID={} | progress: {} / {} | last checked: {}",
            std::process::id(),
            sample.examined,
            sample.chunk_len,
            sample.last_candidate
        );
    }

    fn false_positive(&self, worker_id: usize, candidate: &str) {
        tracing::warn!(worker = worker_id, candidate, "False positive passed stage 1");
    }

    fn round_finished(&self, report: &RoundReport<'_>) {
        let stats = report.cumulative;
        self.output.info(&format!(
            "Progress: {:.2}% | elapsed {} | {}/s",
            report.progress() * 100.0,
            format_elapsed(stats.elapsed),
            format_count(stats.throughput() as u64)
        ));
    }
}
