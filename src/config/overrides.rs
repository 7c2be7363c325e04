use std::path::PathBuf;

use serde::Serialize;

/// Values supplied on the command line, layered over every config file
///
/// `None` fields are skipped when serialized, so they never mask a value
/// from a lower layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    pub search: SearchOverrides,
    pub output: OutputOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alphabet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caesar_file: Option<PathBuf>,
}
