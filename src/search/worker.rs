//! Single-chunk scanner

use crate::archive::EntrySession;
use crate::keyspace::Keyspace;
use crate::parallel::{CancelToken, Chunk};

use super::observer::{ProgressSample, SearchObserver};
use super::verifier::{Verdict, verify};

/// Context shared by every worker of a round, to avoid too many function parameters
pub struct WorkerContext<'a, O: ?Sized> {
    pub keyspace: &'a Keyspace,
    /// Fixed leading symbols of the round
    pub prefix: &'a str,
    pub cancel: &'a CancelToken,
    pub observer: &'a O,
    /// Emit a progress sample every N examined candidates (0 disables)
    pub progress_interval: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Scanning,
    Found,
    Cancelled,
    Exhausted,
}

/// How a worker's scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    Found(String),
    Cancelled,
    Exhausted,
}

/// What a worker hands back to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub chunk: Chunk,
    pub outcome: WorkerOutcome,
    pub examined: u64,
    pub false_positives: u64,
}

/// Scans one chunk of a round in lexicographic order
pub struct Worker<'a, S, O: ?Sized> {
    id: usize,
    chunk: Chunk,
    session: S,
    ctx: &'a WorkerContext<'a, O>,
    state: WorkerState,
}

impl<'a, S, O> Worker<'a, S, O>
where
    S: EntrySession,
    O: SearchObserver + ?Sized,
{
    pub fn new(id: usize, chunk: Chunk, session: S, ctx: &'a WorkerContext<'a, O>) -> Self {
        Self {
            id,
            chunk,
            session,
            ctx,
            state: WorkerState::Idle,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Scan the chunk until a match, cancellation, or exhaustion
    pub fn run(&mut self) -> WorkerReport {
        self.state = WorkerState::Scanning;
        let ctx = self.ctx;
        let mut cursor = ctx.keyspace.cursor(ctx.prefix, self.chunk.start, self.chunk.end);
        let mut examined = 0u64;
        let mut false_positives = 0u64;

        let outcome = loop {
            if ctx.cancel.is_cancelled() {
                self.state = WorkerState::Cancelled;
                break WorkerOutcome::Cancelled;
            }
            let Some(candidate) = cursor.next_candidate() else {
                self.state = WorkerState::Exhausted;
                break WorkerOutcome::Exhausted;
            };

            let verdict = verify(&mut self.session, candidate);
            examined += 1;

            match verdict {
                Verdict::Match(found) => {
                    ctx.cancel.cancel();
                    self.state = WorkerState::Found;
                    tracing::info!(worker = self.id, examined, "Match found");
                    break WorkerOutcome::Found(found);
                }
                Verdict::FalsePositive(candidate) => {
                    false_positives += 1;
                    ctx.observer.false_positive(self.id, &candidate);
                }
                Verdict::Miss => {}
            }

            if ctx.progress_interval > 0 && examined % ctx.progress_interval == 0 {
                ctx.observer.progress(&ProgressSample {
                    worker_id: self.id,
                    examined,
                    chunk_len: self.chunk.len(),
                    last_candidate: candidate,
                });
            }
        };

        tracing::debug!(
            worker = self.id,
            start = self.chunk.start,
            end = self.chunk.end,
            examined,
            state = ?self.state,
            "Worker finished"
        );

        WorkerReport {
            worker_id: self.id,
            chunk: self.chunk,
            outcome,
            examined,
            false_positives,
        }
    }
}
