//! Error taxonomy for the search core
//!
//! Three families, each with its own propagation policy:
//!
//! - [`ArchiveError`] is per-candidate. The verifier recovers it locally as a
//!   miss; it only reaches the caller when opening the archive itself fails.
//! - [`SetupError`] describes a malformed problem shape and is raised before
//!   any worker is spawned.
//! - [`PersistenceError`] is raised after a successful search, and
//!   [`SearchError::Persistence`] carries the result so the caller can retry.

use std::path::PathBuf;

use thiserror::Error;

use crate::search::SearchResult;

/// Failures reported by an [`Archive`](crate::archive::Archive) collaborator
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("wrong key")]
    WrongKey,

    #[error("archive format error: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive contains no entries")]
    Empty,

    #[error("entry '{name}' is not encrypted")]
    NotEncrypted { name: String },
}

/// Invalid search parameters, rejected before any round starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("invalid worker count: must be at least 1")]
    ZeroWorkers,

    #[error("invalid alphabet: must contain at least one symbol")]
    EmptyAlphabet,

    #[error("invalid alphabet: symbol '{0}' appears more than once")]
    DuplicateSymbol(char),

    #[error("invalid length: must be at least 1")]
    ZeroLength,

    #[error("invalid prefix length {prefix_length}: must be between 1 and the key length {length}")]
    PrefixLength { prefix_length: usize, length: usize },

    #[error("invalid keyspace: {symbols}^{length} candidates overflow a 64-bit counter")]
    KeyspaceTooLarge { symbols: usize, length: usize },
}

/// Failure to write the discovered candidate
#[derive(Debug, Error)]
#[error("failed to save result to {}: {source}", path.display())]
pub struct PersistenceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors from [`Driver::search_and_persist`](crate::search::Driver::search_and_persist)
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("worker panicked in round '{prefix}': {reason}")]
    WorkerPanicked { prefix: String, reason: String },

    #[error("search succeeded but the result could not be saved: {source}")]
    Persistence {
        result: Box<SearchResult>,
        #[source]
        source: PersistenceError,
    },
}
