//! File-based bundle loading with locale fallback

use crate::properties;
use dashmap::DashMap;
use msgbind_common::{MsgBindError, Result};
use msgbind_core::{BundleLoader, Charset, Locale};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Extension of bundle files
pub const BUNDLE_EXTENSION: &str = "properties";

type BundleFile = Option<Arc<BTreeMap<String, String>>>;

/// Loads `.properties` bundles from a directory
///
/// Bundle `app.messages` in locale `ru_RU` lives at
/// `<base>/app/messages_ru_RU.properties`. A lookup tries `ru_RU`, `ru` and
/// finally the base file `app/messages.properties`. Each file is read once;
/// missing files are remembered as missing.
#[derive(Debug)]
pub struct PropertiesBundleLoader {
    base_dir: PathBuf,
    cache: DashMap<(String, Charset, Locale), BundleFile>,
}

impl PropertiesBundleLoader {
    /// Create a loader rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: DashMap::new(),
        }
    }

    /// Directory the bundle files are read from
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file for one bundle and locale
    pub fn bundle_path(&self, bundle: &str, locale: &Locale) -> Result<PathBuf> {
        let segments: Vec<&str> = bundle.split('.').collect();
        if segments
            .iter()
            .any(|segment| segment.is_empty() || segment.contains(['/', '\\']))
        {
            return Err(MsgBindError::bundle_load(bundle, "invalid bundle name"));
        }

        let mut path = self.base_dir.clone();
        let (file, dirs) = segments
            .split_last()
            .ok_or_else(|| MsgBindError::bundle_load(bundle, "invalid bundle name"))?;
        path.extend(dirs);

        let file_name = if locale.is_root() {
            format!("{file}.{BUNDLE_EXTENSION}")
        } else {
            format!("{file}_{}.{BUNDLE_EXTENSION}", locale.tag())
        };
        path.push(file_name);
        Ok(path)
    }

    /// Drop every cached file
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!(base_dir = %self.base_dir.display(), "Cleared bundle cache");
    }

    fn load(&self, bundle: &str, charset: Charset, locale: &Locale) -> Result<BundleFile> {
        let key = (bundle.to_string(), charset, locale.clone());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.value().clone());
        }

        let path = self.bundle_path(bundle, locale)?;
        let loaded = match std::fs::read(&path) {
            Ok(bytes) => {
                let text = charset
                    .decode(&bytes)
                    .map_err(|e| MsgBindError::bundle_load(path.display().to_string(), e))?;
                let entries = properties::parse(&text)
                    .map_err(|e| MsgBindError::bundle_load(path.display().to_string(), e))?;
                debug!(path = %path.display(), entries = entries.len(), %charset, "Loaded bundle file");
                Some(Arc::new(entries))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not read bundle file");
                return Err(MsgBindError::resource_access(path.display().to_string(), err));
            }
        };

        Ok(self.cache.entry(key).or_insert(loaded).value().clone())
    }
}

impl BundleLoader for PropertiesBundleLoader {
    fn lookup(&self, bundle: &str, charset: Charset, locale: &Locale, key: &str) -> Result<Option<String>> {
        for candidate in locale.fallback_candidates() {
            if let Some(entries) = self.load(bundle, charset, &candidate)? {
                if let Some(value) = entries.get(key) {
                    return Ok(Some(value.clone()));
                }
            }
        }
        Ok(None)
    }

    fn list_keys(&self, bundle: &str, charset: Charset, locale: &Locale) -> Result<Vec<String>> {
        let mut keys = BTreeSet::new();
        for candidate in locale.fallback_candidates() {
            if let Some(entries) = self.load(bundle, charset, &candidate)? {
                keys.extend(entries.keys().cloned());
            }
        }
        Ok(keys.into_iter().collect())
    }
}
