//! Observation hooks for a running search
//!
//! Everything reported here is informational. The search never waits on an
//! observer and its correctness never depends on one.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::parallel::Chunk;

use super::coordinator::RoundOutcome;
use super::stats::SearchStats;

/// Periodic report from one worker, emitted every `progress_interval` candidates
#[derive(Debug, Clone, Copy)]
pub struct ProgressSample<'a> {
    pub worker_id: usize,
    pub examined: u64,
    pub chunk_len: u64,
    pub last_candidate: &'a str,
}

/// Emitted once before the first round
#[derive(Debug, Clone, Copy)]
pub struct SearchStart {
    /// Wall-clock time the search began
    pub started_at: DateTime<Local>,
    pub total_candidates: u64,
    pub total_rounds: u64,
    pub workers: usize,
}

/// The work plan of one round, emitted before its workers start
#[derive(Debug, Clone, Copy)]
pub struct RoundPlan<'a> {
    /// Zero-based round index
    pub index: u64,
    pub total_rounds: u64,
    pub prefix: &'a str,
    pub subspace_size: u64,
    pub chunks: &'a [Chunk],
}

impl RoundPlan<'_> {
    /// Smaller chunk length (`size / workers`)
    pub fn base_chunk_size(&self) -> u64 {
        self.chunks.iter().map(Chunk::len).min().unwrap_or(0)
    }

    /// Number of chunks holding one extra candidate
    pub fn remainder(&self) -> u64 {
        let base = self.base_chunk_size();
        self.chunks.iter().filter(|c| c.len() > base).count() as u64
    }
}

/// Emitted after each round resolves
#[derive(Debug, Clone, Copy)]
pub struct RoundReport<'a> {
    pub index: u64,
    pub total_rounds: u64,
    pub prefix: &'a str,
    pub outcome: &'a RoundOutcome,
    /// Totals across every round so far, this one included
    pub cumulative: &'a SearchStats,
}

impl RoundReport<'_> {
    /// Fraction of rounds completed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.total_rounds == 0 {
            return 1.0;
        }
        (self.index + 1) as f64 / self.total_rounds as f64
    }
}

/// Callbacks invoked from the driver and from worker threads
pub trait SearchObserver: Sync {
    fn search_started(&self, _start: &SearchStart) {}

    fn round_started(&self, _plan: &RoundPlan<'_>) {}

    /// Called from worker threads; keep it cheap
    fn progress(&self, _sample: &ProgressSample<'_>) {}

    /// Called from worker threads when a candidate passes stage 1 but fails stage 2
    fn false_positive(&self, _worker_id: usize, _candidate: &str) {}

    fn round_finished(&self, _report: &RoundReport<'_>) {}
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Observer that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn search_started(&self, start: &SearchStart) {
        tracing::info!(
            started_at = %start.started_at.to_rfc3339(),
            total = start.total_candidates,
            rounds = start.total_rounds,
            workers = start.workers,
            "Search started"
        );
    }

    fn round_started(&self, plan: &RoundPlan<'_>) {
        tracing::info!(
            round = plan.index + 1,
            of = plan.total_rounds,
            prefix = plan.prefix,
            batch = plan.base_chunk_size(),
            remainder = plan.remainder(),
            jobs = plan.chunks.len(),
            "Round started"
        );
    }

    fn progress(&self, sample: &ProgressSample<'_>) {
        tracing::info!(
            worker = sample.worker_id,
            examined = sample.examined,
            total = sample.chunk_len,
            last = sample.last_candidate,
            "Worker progress"
        );
    }

    fn false_positive(&self, worker_id: usize, candidate: &str) {
        tracing::warn!(worker = worker_id, candidate, "False positive passed stage 1");
    }

    fn round_finished(&self, report: &RoundReport<'_>) {
        let elapsed: Duration = report.cumulative.elapsed;
        tracing::info!(
            round = report.index + 1,
            of = report.total_rounds,
            examined = report.cumulative.examined,
            elapsed_secs = elapsed.as_secs_f64(),
            per_sec = report.cumulative.throughput(),
            "Round finished"
        );
    }
}
