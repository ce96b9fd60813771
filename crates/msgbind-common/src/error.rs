//! Error types and utilities for msgbind

use thiserror::Error;

/// Boxed error produced by user-supplied code (filters, plugins, implementations)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for msgbind operations
pub type Result<T> = std::result::Result<T, MsgBindError>;

/// Main error type for msgbind operations
///
/// Configuration-time variants name the offending type or annotation;
/// resolution-time variants carry the interface and method identity.
#[derive(Error, Debug)]
pub enum MsgBindError {
    /// Invalid binding or module setup, raised while configuring
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Resolution attempted before any configuration was applied
    #[error("{operation} attempted before configuration; call {required} first")]
    UnconfiguredUse {
        operation: String,
        required: &'static str,
    },

    /// An externally referenced resource could not be read
    #[error("Failed to read resource '{resource}': {source}")]
    ResourceAccess {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// A filter was found for an argument but failed while applying it
    #[error("Filter for type '{type_name}' failed while resolving {interface}.{method}: {source}")]
    FilterDispatch {
        type_name: String,
        interface: String,
        method: String,
        #[source]
        source: BoxError,
    },

    /// A declared mapping has no counterpart on the target interface
    #[error("Mapping integrity error for {interface}: {message}")]
    MappingIntegrity { interface: String, message: String },

    /// The interface or method was never bound
    #[error("Unknown message {interface}.{method}")]
    UnknownMessage { interface: String, method: String },

    /// A custom per-locale implementation failed
    #[error("Implementation for {interface}.{method} failed: {source}")]
    Implementation {
        interface: String,
        method: String,
        #[source]
        source: BoxError,
    },

    /// A plugin failed while post-processing a value
    #[error("Plugin '{plugin}' failed for {interface}.{method}: {source}")]
    Plugin {
        plugin: String,
        interface: String,
        method: String,
        #[source]
        source: BoxError,
    },

    /// A template could not be formatted
    #[error("Failed to format {interface}.{method}: {message}")]
    Format {
        interface: String,
        method: String,
        message: String,
    },

    /// A resource bundle exists but could not be decoded
    #[error("Failed to load bundle '{bundle}': {message}")]
    BundleLoad { bundle: String, message: String },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MsgBindError {
    /// Create a new configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn configuration_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an error for use before configuration
    pub fn unconfigured(operation: impl Into<String>, required: &'static str) -> Self {
        Self::UnconfiguredUse {
            operation: operation.into(),
            required,
        }
    }

    /// Create a resource access error naming the resource
    pub fn resource_access(resource: impl Into<String>, source: std::io::Error) -> Self {
        Self::ResourceAccess {
            resource: resource.into(),
            source,
        }
    }

    /// Create a mapping integrity error
    pub fn mapping_integrity(interface: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MappingIntegrity {
            interface: interface.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown message error
    pub fn unknown_message(interface: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnknownMessage {
            interface: interface.into(),
            method: method.into(),
        }
    }

    /// Create a bundle load error
    pub fn bundle_load(bundle: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::BundleLoad {
            bundle: bundle.into(),
            message: msg.into(),
        }
    }

    /// Whether this error was raised while configuring
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Convert from `toml::de::Error` to `MsgBindError`
impl From<toml::de::Error> for MsgBindError {
    fn from(err: toml::de::Error) -> Self {
        Self::configuration_with_source("TOML parsing error", err)
    }
}

/// Convert from `serde_yaml::Error` to `MsgBindError`
impl From<serde_yaml::Error> for MsgBindError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::configuration_with_source("YAML parsing error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_display_formatting() {
        let config_error = MsgBindError::configuration("annotation 'En' has no value");
        assert_eq!(
            config_error.to_string(),
            "Configuration error: annotation 'En' has no value"
        );

        let unconfigured = MsgBindError::unconfigured("resolve", "MessageContext::configure");
        assert!(unconfigured
            .to_string()
            .contains("call MessageContext::configure first"));

        let unknown = MsgBindError::unknown_message("com.app.Msg", "ok()");
        assert_eq!(unknown.to_string(), "Unknown message com.app.Msg.ok()");
    }

    #[test]
    fn test_resource_access_keeps_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "missing");
        let error = MsgBindError::resource_access("file:///tmp/greeting.txt", io_error);

        assert!(error.to_string().contains("file:///tmp/greeting.txt"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_filter_dispatch_names_type_and_method() {
        let error = MsgBindError::FilterDispatch {
            type_name: "Date".to_string(),
            interface: "com.app.Msg".to_string(),
            method: "today(Date)".to_string(),
            source: "bad date".into(),
        };

        let display = error.to_string();
        assert!(display.contains("'Date'"));
        assert!(display.contains("com.app.Msg.today(Date)"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let error: MsgBindError = toml_error.into();

        assert!(error.is_configuration());
        assert!(error.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error: MsgBindError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(!error.is_configuration());
    }
}
