//! Configuration management for zipsweep
//!
//! Typed view over the layered configuration assembled in [`loader`]. Every
//! field has a built-in default, so an empty environment still yields a
//! complete, valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::keyspace::Keyspace;
use crate::parallel::PoolConfig;
use crate::search::{DEFAULT_PROGRESS_INTERVAL, SearchOptions};

pub mod loader;
pub mod overrides;


pub use overrides::{ConfigOverrides, OutputOverrides, SearchOverrides};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// Keyspace and worker pool settings
    pub search: SearchConfig,

    /// Where results are written
    pub output: OutputConfig,
}

/// Keyspace and worker pool settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Ordered candidate symbols
    pub alphabet: String,

    /// Fixed key length
    pub length: usize,

    /// Leading symbols fixed per round
    pub prefix_length: usize,

    /// Maximum number of worker threads (0 = no limit)
    pub max_threads: usize,

    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,

    /// Candidates per worker between progress samples (0 disables)
    pub progress_interval: u64,

    /// Wall-clock budget for the whole search, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget_secs: Option<u64>,
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the recovered archive key
    pub password_file: PathBuf,

    /// Destination of the selected Caesar decoding
    pub caesar_file: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alphabet: crate::keyspace::DEFAULT_ALPHABET.to_string(),
            length: 6,
            prefix_length: 1,
            max_threads: 0,
            thread_percentage: 100,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            time_budget_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            password_file: PathBuf::from("result/password.txt"),
            caesar_file: PathBuf::from("result/result.txt"),
        }
    }
}

impl SearchConfig {
    /// Build the keyspace described by `alphabet` and `length`
    pub fn keyspace(&self) -> Result<Keyspace> {
        Ok(Keyspace::from_str_alphabet(&self.alphabet, self.length)?)
    }

    pub fn pool(&self) -> PoolConfig {
        PoolConfig {
            max_threads: self.max_threads,
            thread_percentage: self.thread_percentage,
        }
    }

    /// Search options, resolving the worker count against available cores
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            worker_count: self.pool().worker_count(),
            prefix_length: self.prefix_length,
            progress_interval: self.progress_interval,
            time_budget: self.time_budget_secs.map(Duration::from_secs),
        }
    }
}

impl SweepConfig {
    /// Validate settings that deserialization alone cannot check
    pub fn validate(&self) -> Result<()> {
        let keyspace = self.search.keyspace()?;
        keyspace.round_size(self.search.prefix_length)?;

        if !(1..=100).contains(&self.search.thread_percentage) {
            bail!(
                "invalid thread_percentage {}: must be between 1 and 100",
                self.search.thread_percentage
            );
        }
        if self.search.time_budget_secs == Some(0) {
            bail!("invalid time_budget_secs: must be at least 1 when set");
        }
        Ok(())
    }
}
