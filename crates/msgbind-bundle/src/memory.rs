//! In-memory bundles

use msgbind_common::Result;
use msgbind_core::{BundleLoader, Charset, Locale};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Bundles held in memory, with the same locale fallback as files
///
/// The charset argument is ignored since entries are already decoded.
#[derive(Debug, Default, Clone)]
pub struct MapBundleLoader {
    bundles: HashMap<(String, Locale), BTreeMap<String, String>>,
}

impl MapBundleLoader {
    /// Create an empty loader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry
    pub fn insert(&mut self, bundle: &str, locale: Locale, key: impl Into<String>, value: impl Into<String>) {
        self.bundles
            .entry((bundle.to_string(), locale))
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Builder form of [`MapBundleLoader::insert`]
    #[must_use]
    pub fn with(mut self, bundle: &str, locale: Locale, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(bundle, locale, key, value);
        self
    }

    /// Add every entry of a parsed bundle
    pub fn extend<I>(&mut self, bundle: &str, locale: Locale, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.bundles
            .entry((bundle.to_string(), locale))
            .or_default()
            .extend(entries);
    }

    fn file(&self, bundle: &str, locale: &Locale) -> Option<&BTreeMap<String, String>> {
        self.bundles.get(&(bundle.to_string(), locale.clone()))
    }
}

impl BundleLoader for MapBundleLoader {
    fn lookup(&self, bundle: &str, _charset: Charset, locale: &Locale, key: &str) -> Result<Option<String>> {
        Ok(locale
            .fallback_candidates()
            .iter()
            .find_map(|candidate| self.file(bundle, candidate)?.get(key).cloned()))
    }

    fn list_keys(&self, bundle: &str, _charset: Charset, locale: &Locale) -> Result<Vec<String>> {
        let keys: BTreeSet<&String> = locale
            .fallback_candidates()
            .iter()
            .filter_map(|candidate| self.file(bundle, candidate))
            .flat_map(BTreeMap::keys)
            .collect();
        Ok(keys.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_lookup() {
        let loader = MapBundleLoader::new()
            .with("messages", Locale::root(), "ok", "OK")
            .with("messages", Locale::language_only("ru"), "ok", "Хорошо")
            .with("messages", Locale::language_only("ru"), "cancel", "Отмена");

        let russia = Locale::with_region("ru", "RU");
        assert_eq!(
            loader.lookup("messages", Charset::Utf8, &russia, "ok").unwrap().as_deref(),
            Some("Хорошо")
        );
        assert_eq!(
            loader
                .lookup("messages", Charset::Utf8, &Locale::language_only("de"), "ok")
                .unwrap()
                .as_deref(),
            Some("OK")
        );
        assert_eq!(loader.lookup("other", Charset::Utf8, &russia, "ok").unwrap(), None);
        assert_eq!(
            loader.list_keys("messages", Charset::Utf8, &russia).unwrap(),
            vec!["cancel".to_string(), "ok".to_string()]
        );
    }
}
