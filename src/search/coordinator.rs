//! One round of the search: a fresh scoped pool, one worker per chunk

use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam::channel::{Receiver, RecvTimeoutError, bounded};

use crate::archive::Archive;
use crate::keyspace::Keyspace;
use crate::parallel::{CancelToken, Chunk};

use super::observer::SearchObserver;
use super::worker::{Worker, WorkerContext, WorkerOutcome, WorkerReport};

/// Aggregated result of one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// First match reported, in completion order
    pub found: Option<String>,
    pub examined: u64,
    pub false_positives: u64,
    pub elapsed: Duration,
    /// Number of workers spawned
    pub workers: usize,
    /// The deadline passed and the coordinator cancelled the round
    pub timed_out: bool,
}

/// Runs rounds against a shared archive and cancellation flag
pub struct Coordinator<'a, A, O: ?Sized> {
    archive: &'a A,
    keyspace: &'a Keyspace,
    cancel: &'a CancelToken,
    observer: &'a O,
    progress_interval: u64,
    deadline: Option<Instant>,
}

impl<'a, A, O> Coordinator<'a, A, O>
where
    A: Archive,
    O: SearchObserver + ?Sized,
{
    pub fn new(archive: &'a A, keyspace: &'a Keyspace, cancel: &'a CancelToken, observer: &'a O) -> Self {
        Self {
            archive,
            keyspace,
            cancel,
            observer,
            progress_interval: 0,
            deadline: None,
        }
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Cancel the round if it is still running at `deadline`
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Scan every chunk of the round under `prefix` in parallel
    ///
    /// Returns once every worker has reported. After the first match the
    /// cancellation flag is set, so stragglers return within one verifier
    /// call each.
    pub fn run_round(&self, prefix: &str, chunks: Vec<Chunk>) -> Result<RoundOutcome> {
        let started = Instant::now();
        let mut outcome = RoundOutcome {
            workers: chunks.len(),
            ..RoundOutcome::default()
        };
        if chunks.is_empty() {
            return Ok(outcome);
        }

        let ctx = WorkerContext {
            keyspace: self.keyspace,
            prefix,
            cancel: self.cancel,
            observer: self.observer,
            progress_interval: self.progress_interval,
        };
        let (report_tx, report_rx) = bounded::<WorkerReport>(chunks.len());

        crossbeam::thread::scope(|s| {
            for (worker_id, chunk) in chunks.into_iter().enumerate() {
                let report_tx = report_tx.clone();
                let ctx = &ctx;
                let archive = self.archive;

                s.spawn(move |_| {
                    let report = Worker::new(worker_id, chunk, archive.session(), ctx).run();
                    // Receiver outlives the scope; a failed send means the collector is gone
                    let _ = report_tx.send(report);
                });
            }

            // Drop the original sender so the collector sees disconnection
            drop(report_tx);

            self.collect_reports(&report_rx, &mut outcome);
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during round '{prefix}'"))?;

        outcome.elapsed = started.elapsed();
        Ok(outcome)
    }

    /// Gather reports in completion order
    fn collect_reports(&self, report_rx: &Receiver<WorkerReport>, outcome: &mut RoundOutcome) {
        let mut pending = outcome.workers;

        while pending > 0 {
            let received = match self.deadline {
                Some(deadline) if outcome.found.is_none() && !outcome.timed_out => {
                    match report_rx.recv_deadline(deadline) {
                        Ok(report) => report,
                        Err(RecvTimeoutError::Timeout) => {
                            tracing::info!("Time budget exhausted, cancelling workers");
                            outcome.timed_out = true;
                            self.cancel.cancel();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                _ => match report_rx.recv() {
                    Ok(report) => report,
                    Err(_) => break, // Every worker dropped its sender
                },
            };
            pending -= 1;

            outcome.examined += received.examined;
            outcome.false_positives += received.false_positives;

            if let WorkerOutcome::Found(candidate) = received.outcome {
                if outcome.found.is_none() {
                    self.cancel.cancel();
                    outcome.found = Some(candidate);
                } else {
                    tracing::warn!(
                        worker = received.worker_id,
                        candidate = %candidate,
                        "Ignoring additional match in the same round"
                    );
                }
            }
        }
    }
}
