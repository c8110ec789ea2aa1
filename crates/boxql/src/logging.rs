use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

///
/// LoggingConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive for the configured level across both crates.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("boxql={0},boxql_core={0}", self.log_level)
    }

    /// `RUST_LOG` wins over the configured level when set.
    #[must_use]
    pub fn get_log_env(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

///
/// LoggingError
///

#[derive(Debug, ThisError)]
pub enum LoggingError {
    #[error("global tracing subscriber already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a process-wide fmt subscriber filtered by `config`.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(config.get_log_env())
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_info() {
        assert_eq!(LoggingConfig::default().log_level, "INFO");
    }

    #[test]
    fn config_deserializes_from_json() {
        let config: LoggingConfig = serde_json::from_str(r#"{ "log_level": "debug" }"#).unwrap();

        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn directive_covers_both_crates() {
        let config = LoggingConfig {
            log_level: "warn".to_string(),
        };

        assert_eq!(config.directive(), "boxql=warn,boxql_core=warn");
    }

    #[test]
    fn configured_level_applies_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = LoggingConfig {
            log_level: "debug".to_string(),
        }
        .get_log_env()
        .to_string();

        assert!(filter.contains("boxql=debug"));
        assert!(filter.contains("boxql_core=debug"));
    }

    #[test]
    fn second_init_reports_existing_subscriber() {
        let config = LoggingConfig::default();

        // Only this test installs a global subscriber in this binary.
        init(&config).unwrap();

        assert!(matches!(
            init(&config),
            Err(LoggingError::AlreadyInitialized(_))
        ));
    }
}
