use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataSettings, EngineSettings, LoggingSettings, OutputFormat, OutputSettings};

/// Loads the application configuration from the TOML file at `path`.
///
/// This function is the primary entry point for this crate. Built-in defaults are
/// layered under the file, which is in turn overridden by `BIZMETRICS_`-prefixed
/// environment variables (e.g. `BIZMETRICS_ENGINE__DEFAULT_LIMIT=10`). A missing
/// file is not an error; the defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("data.source", "data/sample_sales_data.csv")?
        .set_default("engine.default_limit", 5)?
        .set_default("engine.strict_periods", false)?
        .set_default("output.format", "text")?
        .set_default("logging.level", "info")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("BIZMETRICS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(source = %config.data.source.display(), "Configuration loaded.");
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.engine.default_limit == 0 {
        return Err(ConfigError::ValidationError(
            "engine.default_limit must be at least 1".to_string(),
        ));
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.level must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.data.source, Path::new("data/sample_sales_data.csv"));
        assert_eq!(config.engine.default_limit, 5);
        assert!(!config.engine.strict_periods);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[engine]\ndefault_limit = 3\nstrict_periods = true\n\n[output]\nformat = \"json\"\n"
        )
        .unwrap();

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(config.engine.default_limit, 3);
        assert!(config.engine.strict_periods);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_default_limit_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\ndefault_limit = 0\n").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
