//! Per-method translation units

use crate::composed::ComposedModule;
use crate::interface::{InterfaceDecl, MethodDecl, TextSource};
use crate::key::compute_bundle_key;
use crate::locale::Locale;
use crate::resource::ResourceReader;
use msgbind_common::{MsgBindError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Annotation-declared text for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Template text
    pub text: String,
    /// Returned as-is, without argument formatting
    pub raw: bool,
}

/// Everything known about one method's translations
///
/// Built on first resolution of the method and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    templates: HashMap<Locale, Template>,
    bundle_key: String,
}

impl TranslationUnit {
    /// Gather annotation translations and compute the bundle key
    ///
    /// Translations whose annotation kind is not bound to a locale are
    /// ignored. When two annotations map to the same locale the first
    /// declared one is kept.
    pub fn build(
        declaring: &InterfaceDecl,
        method: &MethodDecl,
        composed: &ComposedModule,
        resources: &dyn ResourceReader,
    ) -> Result<Self> {
        let mut templates = HashMap::new();
        for translation in &method.translations {
            let Some(locale) = composed.annotation_locale(&translation.kind) else {
                debug!(annotation = %translation.kind, method = %method.id, "Annotation is not bound to a locale");
                continue;
            };
            if templates.contains_key(locale) {
                continue;
            }

            let text = match &translation.source {
                TextSource::Inline(text) => text.clone(),
                TextSource::Url(url) => resources
                    .read_url(url)
                    .map_err(|err| MsgBindError::resource_access(url, err))?,
                TextSource::Internal(path) => resources
                    .read_internal(path)
                    .map_err(|err| MsgBindError::resource_access(path, err))?,
            };
            templates.insert(
                locale.clone(),
                Template {
                    text,
                    raw: translation.raw,
                },
            );
        }

        Ok(Self {
            templates,
            bundle_key: compute_bundle_key(declaring, method, composed.key_prefix()),
        })
    }

    /// Template declared for exactly `locale`
    #[must_use]
    pub fn template(&self, locale: &Locale) -> Option<&Template> {
        self.templates.get(locale)
    }

    /// Whether a template exists for exactly `locale`
    #[must_use]
    pub fn has_locale(&self, locale: &Locale) -> bool {
        self.templates.contains_key(locale)
    }

    /// All declared locales and templates
    pub fn templates(&self) -> impl Iterator<Item = (&Locale, &Template)> {
        self.templates.iter()
    }

    /// Key used for bundle lookups
    #[must_use]
    pub fn bundle_key(&self) -> &str {
        &self.bundle_key
    }
}
