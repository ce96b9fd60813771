//! Structured logging infrastructure for msgbind
//!
//! Library crates only emit `tracing` events. Applications and tests pick a
//! subscriber here: resolution decisions are logged by `msgbind_core` at
//! debug level, configuration lifecycle at info.

use crate::error::BoxError;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Environment variable holding the log filter
pub const LOG_FILTER_VAR: &str = "MSGBIND_LOG";
/// Environment variable holding the output format
pub const LOG_FORMAT_VAR: &str = "MSGBIND_LOG_FORMAT";

/// Filter that shows every resolution decision
pub const RESOLUTION_FILTER: &str = "msgbind_core=debug,msgbind_bundle=debug,msgbind_config=debug,info";

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line output with colors
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// The default fmt layout
    Full,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives (e.g., "info", "msgbind_core=debug")
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Optional file to append to instead of stdout
    pub file_path: Option<String>,
    /// Whether to log span open and close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Defaults overridden by `MSGBIND_LOG` and `MSGBIND_LOG_FORMAT`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by values read through `lookup`
    ///
    /// An unknown format is ignored.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup(LOG_FILTER_VAR).filter(|l| !l.trim().is_empty()) {
            config.level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT_VAR).and_then(|f| f.parse().ok()) {
            config.format = format;
        }
        config
    }

    /// The filter for this configuration, `info` when the directives are invalid
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: LoggingConfig) -> Result<(), BoxError> {
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(config.env_filter());
    let file = match &config.file_path {
        Some(path) => Some(Mutex::new(
            std::fs::OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    let layer = fmt::layer()
        .with_span_events(span_events)
        .with_target(config.include_targets);

    match (config.format, file) {
        (LogFormat::Compact, Some(file)) => registry.with(layer.compact().with_writer(file)).try_init()?,
        (LogFormat::Compact, None) => registry.with(layer.compact()).try_init()?,
        (LogFormat::Pretty, Some(file)) => registry
            .with(layer.pretty().with_ansi(false).with_writer(file))
            .try_init()?,
        (LogFormat::Pretty, None) => registry.with(layer.pretty()).try_init()?,
        (LogFormat::Full, Some(file)) => registry.with(layer.with_ansi(false).with_writer(file)).try_init()?,
        (LogFormat::Full, None) => registry.with(layer).try_init()?,
    }

    Ok(())
}

/// Initialize logging from the environment
pub fn init_default_logging() -> Result<(), BoxError> {
    init_logging(LoggingConfig::from_env())
}

/// Initialize logging for development: resolution decisions at debug level
pub fn init_dev_logging() -> Result<(), BoxError> {
    init_logging(LoggingConfig {
        level: RESOLUTION_FILTER.to_string(),
        include_spans: true,
        ..LoggingConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LoggingConfig::from_lookup(|var| match var {
            LOG_FILTER_VAR => Some(RESOLUTION_FILTER.to_string()),
            LOG_FORMAT_VAR => Some("Compact".to_string()),
            _ => None,
        });
        assert_eq!(config.level, RESOLUTION_FILTER);
        assert_eq!(config.format, LogFormat::Compact);

        let ignored = LoggingConfig::from_lookup(|var| (var == LOG_FORMAT_VAR).then(|| "xml".to_string()));
        assert_eq!(ignored.format, LogFormat::Pretty);
        assert_eq!(ignored.level, "info");
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let config = LoggingConfig {
            level: "msgbind_core=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(config.env_filter().to_string(), "info");
    }
}
