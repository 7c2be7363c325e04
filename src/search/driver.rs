//! Outer loop: one round per fixed prefix until a match or exhaustion

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Local;
use serde::Serialize;

use crate::archive::Archive;
use crate::error::{SearchError, SetupError};
use crate::keyspace::Keyspace;
use crate::parallel::{CancelToken, PoolConfig, partition};
use crate::persist;

use super::coordinator::Coordinator;
use super::observer::{LogObserver, RoundPlan, RoundReport, SearchObserver, SearchStart};
use super::stats::SearchStats;

/// Candidates per worker between progress samples
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 2_500_000;

/// Tunables for one search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub worker_count: usize,
    /// Leading symbols fixed per round
    pub prefix_length: usize,
    pub progress_interval: u64,
    /// Stop the whole search once this much wall-clock time has passed
    pub time_budget: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            worker_count: PoolConfig::default().worker_count(),
            prefix_length: 1,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            time_budget: None,
        }
    }
}

/// Why the search stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Found,
    Exhausted,
    Interrupted,
    TimeBudget,
}

/// Final answer of a search, owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub found: bool,
    pub candidate: Option<String>,
    pub elapsed: Duration,
    pub total_examined: u64,
    pub false_positives: u64,
    pub rounds_completed: u64,
    pub stop: StopReason,
}

impl SearchResult {
    /// Candidates per second over the whole search
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.total_examined as f64 / seconds
    }
}

/// Drives rounds over a keyspace against one archive
pub struct Driver<A, O = LogObserver> {
    archive: A,
    keyspace: Keyspace,
    options: SearchOptions,
    observer: O,
    /// Caller-owned flag; without one each search gets a fresh token
    cancel: Option<CancelToken>,
}

impl<A: Archive> Driver<A, LogObserver> {
    /// Validate the problem shape; nothing is spawned until [`Driver::search`]
    pub fn new(archive: A, keyspace: Keyspace, options: SearchOptions) -> Result<Self, SetupError> {
        if options.worker_count == 0 {
            return Err(SetupError::ZeroWorkers);
        }
        keyspace.round_size(options.prefix_length)?;

        Ok(Self {
            archive,
            keyspace,
            options,
            observer: LogObserver,
            cancel: None,
        })
    }
}

impl<A, O> Driver<A, O>
where
    A: Archive,
    O: SearchObserver,
{
    pub fn with_observer<P: SearchObserver>(self, observer: P) -> Driver<A, P> {
        Driver {
            archive: self.archive,
            keyspace: self.keyspace,
            options: self.options,
            observer,
            cancel: self.cancel,
        }
    }

    /// Share an externally owned cancellation flag (e.g. wired to Ctrl-C)
    ///
    /// Once that flag is cancelled every later search on this driver stops
    /// before its first round.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Run rounds until a match, exhaustion, interruption, or the time budget
    pub fn search(&self) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let cancel = self.cancel.clone().unwrap_or_default();
        let deadline = self.options.time_budget.map(|budget| started + budget);
        let prefix_length = self.options.prefix_length;
        let workers = self.options.worker_count;
        let total_rounds = self.keyspace.round_count(prefix_length)?;
        let round_size = self.keyspace.round_size(prefix_length)?;

        self.observer.search_started(&SearchStart {
            started_at: Local::now(),
            total_candidates: self.keyspace.size(),
            total_rounds,
            workers,
        });

        let mut stats = SearchStats::new();
        let mut found = None;
        let mut stop = StopReason::Exhausted;

        for index in 0..total_rounds {
            if cancel.is_cancelled() {
                stop = StopReason::Interrupted;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stop = StopReason::TimeBudget;
                break;
            }
            let Some(prefix) = self.keyspace.symbols_at(index, prefix_length) else {
                break;
            };

            let chunks = partition(round_size, workers);
            self.observer.round_started(&RoundPlan {
                index,
                total_rounds,
                prefix: &prefix,
                subspace_size: round_size,
                chunks: &chunks,
            });

            let outcome = Coordinator::new(&self.archive, &self.keyspace, &cancel, &self.observer)
                .with_progress_interval(self.options.progress_interval)
                .with_deadline(deadline)
                .run_round(&prefix, chunks)
                .map_err(|source| SearchError::WorkerPanicked {
                    prefix: prefix.clone(),
                    reason: source.to_string(),
                })?;

            stats.record_round(&outcome, started.elapsed());
            self.observer.round_finished(&RoundReport {
                index,
                total_rounds,
                prefix: &prefix,
                outcome: &outcome,
                cumulative: &stats,
            });

            if let Some(candidate) = outcome.found {
                found = Some(candidate);
                stop = StopReason::Found;
                break;
            }
            if outcome.timed_out {
                stop = StopReason::TimeBudget;
                break;
            }
        }

        // A cancel that landed during the last round, with nothing found
        if found.is_none() && stop == StopReason::Exhausted && cancel.is_cancelled() {
            stop = StopReason::Interrupted;
        }

        let result = SearchResult {
            found: found.is_some(),
            candidate: found,
            elapsed: started.elapsed(),
            total_examined: stats.examined,
            false_positives: stats.false_positives,
            rounds_completed: stats.rounds_completed,
            stop,
        };

        tracing::info!(
            found = result.found,
            examined = result.total_examined,
            elapsed_secs = result.elapsed.as_secs_f64(),
            stop = ?result.stop,
            "Search finished"
        );
        Ok(result)
    }

    /// Search, then save the candidate to `destination` if one was found
    ///
    /// A save failure still hands back the result inside
    /// [`SearchError::Persistence`] so the caller can retry.
    pub fn search_and_persist(&self, destination: &Path) -> Result<SearchResult, SearchError> {
        let result = self.search()?;
        let Some(candidate) = result.candidate.as_deref() else {
            return Ok(result);
        };

        match persist::save(candidate, destination) {
            Ok(()) => Ok(result),
            Err(source) => Err(SearchError::Persistence {
                result: Box::new(result),
                source,
            }),
        }
    }
}

/// Search `alphabet^length` for the key of `archive` using `worker_count` workers
pub fn search<A: Archive>(
    archive: A,
    alphabet: &[char],
    length: usize,
    worker_count: usize,
) -> Result<SearchResult, SearchError> {
    let keyspace = Keyspace::new(alphabet, length)?;
    let options = SearchOptions {
        worker_count,
        ..SearchOptions::default()
    };
    Driver::new(archive, keyspace, options)?.search()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::observer::NoopObserver;
    use crate::search::testing::{FakeArchive, RecordingObserver};
    use tempfile::TempDir;

    #[test]
    fn test_end_to_end_unique_key() {
        let result = search(FakeArchive::new().with_key("bba"), &['a', 'b'], 3, 2).unwrap();

        assert!(result.found);
        assert_eq!(result.candidate.as_deref(), Some("bba"));
        assert_eq!(result.stop, StopReason::Found);
        assert!(result.total_examined <= 8);
        assert!(result.total_examined >= 1);
    }

    #[test]
    fn test_exhaustion_examines_whole_keyspace() {
        for (alphabet, length) in [(vec!['a', 'b'], 3), (vec!['x', 'y', 'z'], 4), (vec!['q'], 2)] {
            let result = search(FakeArchive::new(), &alphabet, length, 3).unwrap();

            assert!(!result.found);
            assert_eq!(result.candidate, None);
            assert_eq!(result.stop, StopReason::Exhausted);
            assert_eq!(result.total_examined, (alphabet.len() as u64).pow(length as u32));
            assert_eq!(result.rounds_completed, alphabet.len() as u64);
        }
    }

    #[test]
    fn test_rounds_follow_alphabet_order() {
        let keyspace = Keyspace::new(&['a', 'b', 'c'], 2).unwrap();
        let options = SearchOptions {
            worker_count: 2,
            ..SearchOptions::default()
        };
        let driver = Driver::new(FakeArchive::new().with_key("ba"), keyspace, options)
            .unwrap()
            .with_observer(RecordingObserver::default());

        let result = driver.search().unwrap();

        assert_eq!(result.candidate.as_deref(), Some("ba"));
        assert_eq!(result.rounds_completed, 2);
        assert_eq!(*driver.observer().rounds_started.lock().unwrap(), vec!["a", "b"]);
        let finished = driver.observer().rounds_finished.lock().unwrap();
        assert_eq!(finished[0], ("a".to_string(), 3));
    }

    #[test]
    fn test_longer_prefix_policy_keeps_coverage() {
        let keyspace = Keyspace::new(&['a', 'b', 'c'], 4).unwrap();
        let options = SearchOptions {
            worker_count: 4,
            prefix_length: 2,
            ..SearchOptions::default()
        };
        let driver = Driver::new(FakeArchive::new(), keyspace, options)
            .unwrap()
            .with_observer(NoopObserver);

        let result = driver.search().unwrap();
        assert_eq!(result.total_examined, 81);
        assert_eq!(result.rounds_completed, 9);
    }

    #[test]
    fn test_setup_errors_are_eager() {
        assert!(matches!(
            search(FakeArchive::new(), &['a', 'b'], 3, 0),
            Err(SearchError::Setup(SetupError::ZeroWorkers))
        ));
        assert!(matches!(
            search(FakeArchive::new(), &[], 3, 2),
            Err(SearchError::Setup(SetupError::EmptyAlphabet))
        ));

        let keyspace = Keyspace::new(&['a'], 2).unwrap();
        let options = SearchOptions {
            prefix_length: 3,
            ..SearchOptions::default()
        };
        assert!(matches!(
            Driver::new(FakeArchive::new(), keyspace, options),
            Err(SetupError::PrefixLength { prefix_length: 3, length: 2 })
        ));
    }

    #[test]
    fn test_pre_cancelled_search_is_interrupted() {
        let keyspace = Keyspace::new(&['a', 'b'], 3).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let driver = Driver::new(FakeArchive::new().with_key("bba"), keyspace, SearchOptions::default())
            .unwrap()
            .with_observer(NoopObserver)
            .with_cancel_token(cancel);

        let result = driver.search().unwrap();
        assert_eq!(result.stop, StopReason::Interrupted);
        assert_eq!(result.total_examined, 0);
        assert_eq!(driver.archive().opens.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_driver_can_search_twice() {
        let keyspace = Keyspace::new(&['a', 'b'], 3).unwrap();
        let options = SearchOptions {
            worker_count: 2,
            ..SearchOptions::default()
        };
        let driver = Driver::new(FakeArchive::new().with_key("bab"), keyspace, options)
            .unwrap()
            .with_observer(NoopObserver);

        let first = driver.search().unwrap();
        let second = driver.search().unwrap();

        assert_eq!(first.stop, StopReason::Found);
        assert_eq!(second.stop, StopReason::Found);
        assert_eq!(second.candidate.as_deref(), Some("bab"));
    }

    #[test]
    fn test_time_budget_stops_search() {
        let keyspace = Keyspace::new(&['a', 'b', 'c', 'd'], 6).unwrap();
        let options = SearchOptions {
            worker_count: 2,
            time_budget: Some(Duration::from_millis(30)),
            ..SearchOptions::default()
        };
        let archive = FakeArchive::new().with_delay(Duration::from_millis(1));
        let driver = Driver::new(archive, keyspace, options).unwrap().with_observer(NoopObserver);

        let result = driver.search().unwrap();
        assert_eq!(result.stop, StopReason::TimeBudget);
        assert!(!result.found);
        assert!(result.total_examined < 4096);
    }

    #[test]
    fn test_search_and_persist_writes_result() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("result").join("password.txt");
        let keyspace = Keyspace::new(&['a', 'b'], 3).unwrap();
        let options = SearchOptions {
            worker_count: 2,
            ..SearchOptions::default()
        };
        let driver = Driver::new(FakeArchive::new().with_key("abb"), keyspace, options)
            .unwrap()
            .with_observer(NoopObserver);

        let result = driver.search_and_persist(&destination).unwrap();
        assert_eq!(result.candidate.as_deref(), Some("abb"));
        assert_eq!(std::fs::read_to_string(&destination).unwrap(), "abb");
    }

    #[test]
    fn test_persistence_failure_keeps_result() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should go makes the write fail
        let destination = dir.path().join("taken");
        std::fs::create_dir(&destination).unwrap();
        let keyspace = Keyspace::new(&['a', 'b'], 2).unwrap();
        let options = SearchOptions {
            worker_count: 1,
            ..SearchOptions::default()
        };
        let driver = Driver::new(FakeArchive::new().with_key("ba"), keyspace, options)
            .unwrap()
            .with_observer(NoopObserver);

        match driver.search_and_persist(&destination) {
            Err(SearchError::Persistence { result, .. }) => {
                assert_eq!(result.candidate.as_deref(), Some("ba"));
            }
            other => panic!("expected persistence error, got {other:?}"),
        }
    }
}
