//! # zipsweep - parallel passphrase search for encrypted ZIP archives
//!
//! Recovers the key of a single-entry encrypted ZIP archive when its
//! alphabet and length are known, by splitting the keyspace across every CPU
//! core. Each candidate goes through a cheap header check first; only
//! survivors pay for a full decrypt and CRC comparison.
//!
//! ## Quick Start
//!
//! ```bash
//! # Search a-z0-9, length 6
//! zipsweep crack emergency_storage_key.zip
//!
//! # Decode the recovered text
//! zipsweep caesar secret.txt --dictionary the,and
//! ```

pub mod archive;
pub mod caesar;
pub mod cli;
pub mod config;
pub mod error;
pub mod keyspace;
pub mod parallel;
pub mod persist;
pub mod search;

pub use cli::{Cli, Output};
pub use config::SweepConfig;
