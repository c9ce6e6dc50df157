//! Shell configuration, read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::localization::Locale;

/// Where the flag files live unless `ZOOKEEPER_DATA_DIR` says otherwise.
pub const DEFAULT_DATA_DIR: &str = ".zookeeper";

/// Default time the simulated audio takes to load.
pub const DEFAULT_AUDIO_WARMUP: Duration = Duration::from_millis(300);

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "ZOOKEEPER_LOG_FORMAT must be `pretty` or `json`, got `{other}`"
            ))),
        }
    }
}

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding one JSON file per flag store.
    pub data_dir: PathBuf,
    /// Active language.
    pub locale: Locale,
    /// How long the simulated audio takes to become ready.
    pub audio_warmup: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps variable names
    /// to values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_dir = lookup("ZOOKEEPER_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let locale = lookup("ZOOKEEPER_LOCALE")
            .map(|raw| raw.parse::<Locale>())
            .transpose()?
            .unwrap_or(Locale::En);
        let audio_warmup = lookup("ZOOKEEPER_AUDIO_WARMUP_MS")
            .map(|raw| {
                raw.parse::<u64>().map(Duration::from_millis).map_err(|e| {
                    AppError::Config(format!("ZOOKEEPER_AUDIO_WARMUP_MS must be a u64: {e}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_AUDIO_WARMUP);
        let log_format = lookup("ZOOKEEPER_LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        Ok(Self {
            data_dir,
            locale,
            audio_warmup,
            log_format,
        })
    }
}
