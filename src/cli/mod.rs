//! Command-line interface for zipsweep
//!
//! This module provides the main CLI structure and command handling. It uses
//! clap for argument parsing; each subcommand lives in its own module under
//! `commands`.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

pub use output::Output;

/// zipsweep - parallel passphrase search for encrypted ZIP archives
#[derive(Parser)]
#[command(
    name = "zipsweep",
    version,
    about = "Parallel keyspace search for the passphrase of an encrypted ZIP archive",
    long_about = "zipsweep recovers the key of a single-entry encrypted ZIP archive whose \
                  alphabet and key length are known, splitting the keyspace across every \
                  CPU core. It also ships a Caesar-shift decoder for the text inside."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the keyspace for the archive passphrase
    Crack(commands::crack::CrackArgs),
    /// Decode Caesar-shifted text with every shift and save one
    Caesar(commands::caesar::CaesarArgs),
    /// Configuration management
    Config(commands::config::ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.as_deref();

        match self.command {
            Commands::Crack(args) => commands::crack::execute(args, config_path, output).await,
            Commands::Caesar(args) => commands::caesar::execute(args, config_path, output).await,
            Commands::Config(args) => commands::config::execute(args, config_path, output).await,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"), // -vvv includes every stage-1 rejection
        }
    });

    // stdout carries progress and results; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
