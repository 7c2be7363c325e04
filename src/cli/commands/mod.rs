//! Command implementations for the zipsweep CLI
//!
//! Each subcommand is organized into its own module.

pub mod caesar;
pub mod config;
pub mod crack;
