//! Translation coverage reports

use crate::context::MessageContext;
use crate::interface::{MessageInterfaceId, MethodId};
use crate::locale::Locale;
use msgbind_common::{MsgBindError, Result};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Coverage of one method over the requested locales
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCoverage {
    /// Method signature
    pub method: MethodId,
    /// Key looked up in bundles
    pub bundle_key: String,
    /// Locales with a translation
    pub covered: BTreeSet<Locale>,
    /// Requested locales without one
    pub missing: BTreeSet<Locale>,
}

/// Coverage of every method of one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Inspected interface
    pub interface: MessageInterfaceId,
    /// One entry per method, inherited ones included
    pub methods: Vec<MethodCoverage>,
}

impl CoverageReport {
    /// Whether every method has a translation for every requested locale
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.methods.iter().all(|method| method.missing.is_empty())
    }

    /// Number of (method, locale) pairs without a translation
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.methods.iter().map(|method| method.missing.len()).sum()
    }
}

/// Report which of `locales` each method of `interface` can be resolved in
///
/// A locale is covered by an annotation declared for exactly that locale or
/// by the method's bundle key being present in a bundle for that locale.
/// Implementations and fallback locales do not count.
pub fn coverage(context: &MessageContext, interface: &MessageInterfaceId, locales: &[Locale]) -> Result<CoverageReport> {
    let decl = context
        .interface(interface)
        .ok_or_else(|| MsgBindError::unknown_message(interface.to_string(), "*"))?;
    let composed = context.composed(interface)?;

    let mut bundle_keys: HashMap<(String, Locale), HashSet<String>> = HashMap::new();
    let mut methods = Vec::new();
    for (_, method) in decl.all_methods() {
        let unit = context.translation_unit(interface, &method.id)?;
        let mut covered = BTreeSet::new();
        let mut missing = BTreeSet::new();

        for locale in locales {
            let mut found = unit.has_locale(locale);
            for binding in composed.bundles() {
                if found {
                    break;
                }
                let cache_key = (binding.name.clone(), locale.clone());
                if !bundle_keys.contains_key(&cache_key) {
                    let keys = context
                        .bundle_loader()
                        .list_keys(&binding.name, binding.charset, locale)?;
                    bundle_keys.insert(cache_key.clone(), keys.into_iter().collect());
                }
                found = bundle_keys
                    .get(&cache_key)
                    .is_some_and(|keys| keys.contains(unit.bundle_key()));
            }

            if found {
                covered.insert(locale.clone());
            } else {
                missing.insert(locale.clone());
            }
        }

        methods.push(MethodCoverage {
            method: method.id.clone(),
            bundle_key: unit.bundle_key().to_string(),
            covered,
            missing,
        });
    }

    Ok(CoverageReport {
        interface: interface.clone(),
        methods,
    })
}
