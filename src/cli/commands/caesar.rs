//! `zipsweep caesar`: brute-force a Caesar shift and keep one decoding

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;
use dialoguer::Input;

use crate::caesar::{self, SHIFTS};
use crate::cli::Output;
use crate::config::{ConfigOverrides, OutputOverrides, SweepConfig};
use crate::persist;

#[derive(Args, Debug)]
pub struct CaesarArgs {
    /// Text file to decode
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Where to save the selected decoding [default: result/result.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pick this shift (1-26) without asking
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=26))]
    pub shift: Option<u8>,

    /// Pick the first shift containing one of these words
    #[arg(long, value_delimiter = ',', value_name = "WORDS")]
    pub dictionary: Vec<String>,
}

pub async fn execute(args: CaesarArgs, config_path: Option<&str>, output: Output) -> Result<ExitCode> {
    let overrides = ConfigOverrides {
        output: OutputOverrides {
            caesar_file: args.output.clone(),
            password_file: None,
        },
        ..Default::default()
    };
    let config = SweepConfig::load_with(config_path, Some(&overrides))?;

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let decoded = caesar::decode_all_shifts(&text);

    output.header("Caesar shifts");
    for (index, line) in decoded.iter().enumerate() {
        println!("{:>2}: {}", index + 1, line);
    }
    output.blank_line();

    let shift = match args.shift {
        Some(shift) => usize::from(shift),
        None => match caesar::find_by_dictionary(&decoded, &args.dictionary) {
            Some(shift) => {
                output.info(&format!("Dictionary match at shift {shift}"));
                shift
            }
            None => prompt_shift()?,
        },
    };

    let Some(selected) = caesar::select_shift(&decoded, shift) else {
        bail!("invalid shift {shift}: must be between 1 and {SHIFTS}");
    };

    persist::save(selected, &config.output.caesar_file)?;
    output.success(&format!(
        "Shift {shift} saved to {}",
        config.output.caesar_file.display()
    ));
    Ok(ExitCode::SUCCESS)
}

/// Ask until the answer is a number in `1..=26`
fn prompt_shift() -> Result<usize> {
    Input::<usize>::new()
        .with_prompt(format!("Enter the correct shift (1-{SHIFTS})"))
        .validate_with(|shift: &usize| -> Result<(), String> {
            if (1..=SHIFTS).contains(shift) {
                Ok(())
            } else {
                Err(format!("Shift must be between 1 and {SHIFTS}"))
            }
        })
        .interact_text()
        .context("Failed to read the shift; pass --shift or --dictionary when not on a terminal")
}
