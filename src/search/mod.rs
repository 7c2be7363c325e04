//! Parallel keyspace search
//!
//! ```text
//! Driver ──▶ partition() ──▶ Coordinator ──▶ Worker × N ──▶ verify() ──▶ Archive
//!   ▲                             │               │
//!   └──────── RoundOutcome ───────┘◀── reports ───┘   (first match cancels all)
//! ```
//!
//! The driver fixes the leading symbol(s) of the key per round, so each
//! round only spans `|alphabet|^(length - prefix_length)` candidates. A round
//! gets its own scoped pool, sized to the configured worker count, and the
//! pool is joined before the next round starts.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use zipsweep::archive::ZipEntryArchive;
//! use zipsweep::search;
//!
//! let archive = ZipEntryArchive::open(Path::new("emergency_storage_key.zip"))?;
//! let alphabet: Vec<char> = zipsweep::keyspace::DEFAULT_ALPHABET.chars().collect();
//! let result = search::search(archive, &alphabet, 6, 8)?;
//! println!("found: {}", result.candidate.as_deref().unwrap_or("none"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod coordinator;
pub mod driver;
pub mod observer;
pub mod stats;
pub mod verifier;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, RoundOutcome};
pub use driver::{DEFAULT_PROGRESS_INTERVAL, Driver, SearchOptions, SearchResult, StopReason, search};
pub use observer::{LogObserver, NoopObserver, ProgressSample, RoundPlan, RoundReport, SearchObserver, SearchStart};
pub use stats::SearchStats;
pub use verifier::{Verdict, verify};
pub use worker::{Worker, WorkerContext, WorkerOutcome, WorkerReport, WorkerState};
