use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    pub engine: EngineSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Where transactions are loaded from.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Path to the transaction CSV, reloaded on every calculation.
    pub source: PathBuf,
}

/// Parameters for the metrics engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Number of entries returned by ranked metrics when no limit is given.
    pub default_limit: usize,
    /// Reject time periods that are not "all", a quarter, a month name or a year
    /// instead of silently computing over the whole dataset.
    pub strict_periods: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}
