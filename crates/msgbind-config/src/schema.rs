//! Configuration schema definitions using serde.

use msgbind_core::{Charset, Locale};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure for a message setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Settings applied to the root module.
    pub settings: Settings,
    /// The root module.
    pub root: ModuleConfig,
}

/// Root-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix prepended to every bundle key.
    pub key_prefix: String,
    /// Locale used for every call without an explicit locale.
    pub locale: Option<Locale>,
    /// Process default locale used for the fallback retry.
    pub system_locale: Option<Locale>,
    /// Log the chosen translation source of every call at info level.
    pub debug: bool,
    /// Directory holding `.properties` bundles, relative to the file.
    pub bundle_dir: Option<PathBuf>,
    /// Directory holding internal translation files, relative to the file.
    pub resource_dir: Option<PathBuf>,
    /// Template formatter.
    pub formatter: FormatterKind,
}

/// Template formatter selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterKind {
    /// `{0}` style placeholders.
    #[default]
    Indexed,
    /// Fluent syntax with `$arg0` style variables.
    Fluent,
}

/// One configuration module and its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Module name, used to order modules of equal scope.
    pub name: String,
    /// Dotted scope the module applies to.
    pub scope: String,
    /// Annotation kind to locale bindings.
    pub annotations: BTreeMap<String, Locale>,
    /// Resource bundles, in lookup order.
    pub bundles: Vec<BundleConfig>,
    /// Interface declarations.
    pub interfaces: Vec<InterfaceConfig>,
    /// Child modules.
    pub modules: Vec<ModuleConfig>,
}

/// Resource bundle binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Dotted bundle name.
    pub name: String,
    /// Charset of the bundle files.
    #[serde(default)]
    pub charset: Charset,
    /// Interfaces the bundle applies to, all when empty.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// Message interface declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    /// Qualified interface name.
    pub name: String,
    /// Key annotation of the interface.
    pub key: Option<String>,
    /// Qualified names of parent interfaces.
    pub extends: Vec<String>,
    /// Declared methods.
    pub methods: Vec<MethodConfig>,
}

/// Message method declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodConfig {
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<ParamConfig>,
    /// Explicit bundle key segment.
    pub key: Option<String>,
    /// Translations by annotation kind.
    pub translations: BTreeMap<String, TranslationConfig>,
    /// Return kind.
    pub returns: ReturnsConfig,
    /// Whether this is the identity method of a nested interface.
    pub identity: bool,
}

/// A parameter, either a bare type name or a type with markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamConfig {
    /// Unannotated parameter.
    Type(String),
    /// Parameter carrying marker annotations.
    Annotated {
        /// Parameter type name.
        #[serde(rename = "type")]
        type_name: String,
        /// Marker annotation kinds.
        #[serde(default)]
        annotations: Vec<String>,
    },
}

impl ParamConfig {
    /// The parameter type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Type(type_name) | Self::Annotated { type_name, .. } => type_name,
        }
    }

    /// The marker annotation kinds.
    #[must_use]
    pub fn annotations(&self) -> &[String] {
        match self {
            Self::Type(_) => &[],
            Self::Annotated { annotations, .. } => annotations,
        }
    }
}

/// A translation, either inline text or a text source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationConfig {
    /// Inline template.
    Text(String),
    /// Template with an explicit source.
    Source(SourceConfig),
}

/// Explicit translation source, exactly one of `text`, `url` or `internal`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Inline template.
    pub text: Option<String>,
    /// URL to read the template from.
    pub url: Option<String>,
    /// Path relative to the resource directory.
    pub internal: Option<String>,
    /// Return the template without formatting.
    pub raw: bool,
}

/// What a method returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnsConfig {
    /// Formatted text.
    #[default]
    Text,
    /// All translations with the current one marked.
    MultiLocale,
    /// Another message interface, by qualified name.
    Nested(String),
}
