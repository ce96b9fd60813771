//! Annotation kinds available without any configuration

use crate::locale::Locale;
use crate::node::ConfigurationNode;
use msgbind_common::Result;

/// Language annotations bound to their language codes
pub const LANGUAGE_ANNOTATIONS: &[(&str, &str)] = &[
    ("En", "en"),
    ("De", "de"),
    ("Fr", "fr"),
    ("Es", "es"),
    ("It", "it"),
    ("Pt", "pt"),
    ("Ru", "ru"),
    ("Ja", "ja"),
    ("Zh", "zh"),
    ("Ko", "ko"),
    ("Nl", "nl"),
    ("Pl", "pl"),
    ("Uk", "uk"),
];

/// Annotation bound to the root locale
pub const DEFAULT_ANNOTATION: &str = "Default";

/// Name of the node holding the standard annotations
pub const BUILTIN_NODE: &str = "builtin";

/// A configured, empty-scope node binding the standard annotations
///
/// The context places this node below every chain, after the root, so any
/// project binding of the same kind outranks it whatever the project's
/// scopes are.
pub fn builtin_node() -> Result<ConfigurationNode> {
    let mut node = ConfigurationNode::new(BUILTIN_NODE, "");
    node.bind_annotation(DEFAULT_ANNOTATION).to_fallback()?;
    for (kind, language) in LANGUAGE_ANNOTATIONS {
        node.bind_annotation(*kind)
            .to_locale(Locale::language_only(*language))?;
    }
    node.do_configure()?;
    Ok(node)
}
