//! Resource-bundle collaborator interface and bindings

use crate::interface::MessageInterfaceId;
use crate::locale::Locale;
use msgbind_common::{MsgBindError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Character encoding of a bundle's files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Charset {
    /// UTF-8
    #[default]
    Utf8,
    /// ISO-8859-1
    Latin1,
}

impl Charset {
    /// Canonical charset name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Decode raw bundle bytes
    pub fn decode(self, bytes: &[u8]) -> std::result::Result<String, String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = MsgBindError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Ok(Self::Utf8),
            "ISO-8859-1" | "LATIN1" | "LATIN-1" => Ok(Self::Latin1),
            _ => Err(MsgBindError::configuration(format!("Unsupported charset '{s}'"))),
        }
    }
}

impl TryFrom<String> for Charset {
    type Error = MsgBindError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Charset> for String {
    fn from(charset: Charset) -> Self {
        charset.name().to_string()
    }
}

/// Supplies locale-specific key/value bundles
///
/// Implementations apply their own locale fallback (a bundle for `ru_RU`
/// falls back to `ru` and then to the base bundle) and may cache freely.
pub trait BundleLoader: Send + Sync {
    /// Look up one key, `None` when absent from every fallback bundle
    fn lookup(&self, bundle: &str, charset: Charset, locale: &Locale, key: &str) -> Result<Option<String>>;

    /// All keys visible for the locale, sorted
    fn list_keys(&self, bundle: &str, charset: Charset, locale: &Locale) -> Result<Vec<String>>;
}

/// A loader with no bundles at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBundles;

impl BundleLoader for NoBundles {
    fn lookup(&self, _bundle: &str, _charset: Charset, _locale: &Locale, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn list_keys(&self, _bundle: &str, _charset: Charset, _locale: &Locale) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// A bundle bound in a configuration node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleBinding {
    /// Bundle base name
    pub name: String,
    /// Encoding of the bundle files
    pub charset: Charset,
    /// Interfaces allowed to use the bundle; `None` means all of them
    pub interfaces: Option<BTreeSet<MessageInterfaceId>>,
}

impl BundleBinding {
    /// Whether the bundle is consulted for `interface`
    #[must_use]
    pub fn applies_to(&self, interface: &MessageInterfaceId) -> bool {
        self.interfaces
            .as_ref()
            .map_or(true, |set| set.contains(interface))
    }
}
