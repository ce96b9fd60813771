//! Configuration loading from YAML or TOML files with environment overrides.

use crate::schema::MessagesConfig;
use crate::validation::ConfigValidator;
use msgbind_common::{MsgBindError, Result};
use msgbind_core::Locale;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "MSGBIND_CONFIG_PATH";
/// Environment variable overriding the fixed locale.
pub const LOCALE_VAR: &str = "MSGBIND_LOCALE";
/// Environment variable overriding the key prefix.
pub const KEY_PREFIX_VAR: &str = "MSGBIND_KEY_PREFIX";

/// File names tried by [`ConfigLoader::load`] when no path is configured.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["messages.yaml", "messages.yml", "messages.toml"];

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Ok(Self::Yaml),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(MsgBindError::configuration(format!(
                "Unsupported configuration file '{}', expected .yaml, .yml or .toml",
                path.display()
            ))),
        }
    }
}

/// Configuration loader for message setups.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file with environment variable overrides.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MessagesConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            MsgBindError::configuration_with_source(
                format!("Failed to read configuration file '{}'", path.display()),
                e,
            )
        })?;

        let mut config = Self::parse(&content, format)?;
        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;

        info!(path = %path.display(), ?format, "Loaded message configuration");
        Ok(config)
    }

    /// Load from `MSGBIND_CONFIG_PATH`, then the default file names, then
    /// defaults, returning the configuration and the file it came from.
    pub fn load() -> Result<(MessagesConfig, Option<PathBuf>)> {
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            let path = PathBuf::from(path);
            return Ok((Self::load_config(&path)?, Some(path)));
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
        {
            return Ok((Self::load_config(&path)?, Some(path)));
        }

        debug!("No message configuration file found, using defaults");
        let mut config = MessagesConfig::default();
        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok((config, None))
    }

    /// Parse configuration text without overrides or validation.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<MessagesConfig> {
        match format {
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(config: &mut MessagesConfig) -> Result<()> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_overrides_from<F>(config: &mut MessagesConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tag) = lookup(LOCALE_VAR) {
            let locale = Locale::parse(&tag).map_err(|e| {
                MsgBindError::configuration_with_source(format!("Failed to parse environment variable '{LOCALE_VAR}'"), e)
            })?;
            debug!(%locale, "Locale overridden from environment");
            config.settings.locale = Some(locale);
        }

        if let Some(prefix) = lookup(KEY_PREFIX_VAR) {
            debug!(%prefix, "Key prefix overridden from environment");
            config.settings.key_prefix = prefix;
        }

        Ok(())
    }
}
