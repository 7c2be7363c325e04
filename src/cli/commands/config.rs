//! Configuration command implementations

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use crate::cli::Output;
use crate::config::SweepConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Load and validate the configuration
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

/// Execute config commands
pub async fn execute(args: ConfigArgs, config_path: Option<&str>, output: Output) -> Result<ExitCode> {
    match args.command {
        ConfigCommands::Show { format } => show(config_path, format),
        ConfigCommands::Validate => validate(config_path, &output),
    }
}

fn show(config_path: Option<&str>, format: ConfigFormat) -> Result<ExitCode> {
    let config = SweepConfig::load_with(config_path, None)?;
    let rendered = match format {
        ConfigFormat::Toml => toml::to_string_pretty(&config).context("Failed to render TOML")?,
        ConfigFormat::Json => {
            serde_json::to_string_pretty(&config).context("Failed to render JSON")?
        }
    };
    println!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

fn validate(config_path: Option<&str>, output: &Output) -> Result<ExitCode> {
    let config = SweepConfig::load_with(config_path, None)?;
    let keyspace = config.search.keyspace()?;

    output.success("Configuration is valid");
    output.blank_line();
    output.step("Configuration Summary");
    output.table_row("Alphabet", &config.search.alphabet);
    output.table_row("Length", &config.search.length.to_string());
    output.table_row("Candidates", &crate::cli::output::format_count(keyspace.size()));
    output.table_row("Workers", &config.search.pool().worker_count().to_string());
    output.table_row("Password file", &config.output.password_file.display().to_string());
    output.table_row("Caesar file", &config.output.caesar_file.display().to_string());
    Ok(ExitCode::SUCCESS)
}
