//! Locale values and fallback candidates

use msgbind_common::{MsgBindError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Environment variables consulted, in order, for the process default locale
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// A language/region/variant triple
///
/// The all-empty locale is [`Locale::root`], the distinguished fallback.
/// Components are compared exactly as written; no case normalisation is
/// applied, so `en_us` and `en_US` are different locales.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: String,
    variant: String,
}

impl Locale {
    /// Create a locale from its three components
    pub fn new(
        language: impl Into<String>,
        region: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            region: region.into(),
            variant: variant.into(),
        }
    }

    /// A language-only locale such as `en`
    pub fn language_only(language: impl Into<String>) -> Self {
        Self::new(language, "", "")
    }

    /// A language and region locale such as `en_US`
    pub fn with_region(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self::new(language, region, "")
    }

    /// The root locale, used as the last fallback
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this is the root locale
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.region.is_empty() && self.variant.is_empty()
    }

    /// Get the language component
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get the region component
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the variant component
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Parse a tag such as `en`, `en_US`, `en-US` or `ru_RU_dialect`
    ///
    /// Encoding (`.UTF-8`) and modifier (`@euro`) suffixes are dropped, so
    /// values of `LANG` parse directly. An empty tag or `root` gives
    /// [`Locale::root`].
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let stripped = trimmed.split(['.', '@']).next().unwrap_or_default();
        if stripped.is_empty() || stripped.eq_ignore_ascii_case("root") {
            return Ok(Self::root());
        }

        let mut parts = stripped.splitn(3, ['_', '-']);
        let language = parts.next().unwrap_or_default();
        let region = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default();

        let valid_component = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric());
        let valid_variant = |s: &str| {
            s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        };
        if !valid_component(language) || !valid_component(region) || !valid_variant(variant) {
            return Err(MsgBindError::configuration(format!("Invalid locale '{tag}'")));
        }

        Ok(Self::new(language, region, variant))
    }

    /// Get the underscore-joined tag, empty for the root locale
    #[must_use]
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if !self.region.is_empty() || !self.variant.is_empty() {
            tag.push('_');
            tag.push_str(&self.region);
        }
        if !self.variant.is_empty() {
            tag.push('_');
            tag.push_str(&self.variant);
        }
        tag
    }

    /// Fallback candidates from most to least specific
    ///
    /// The list is the locale itself (only when it has a variant), then
    /// language plus region, then language, then the root locale.
    #[must_use]
    pub fn fallback_candidates(&self) -> Vec<Self> {
        let mut candidates = Vec::with_capacity(4);
        if !self.variant.is_empty() {
            candidates.push(self.clone());
        }
        if !self.region.is_empty() {
            candidates.push(Self::with_region(&self.language, &self.region));
        }
        if !self.language.is_empty() {
            candidates.push(Self::language_only(&self.language));
        }
        candidates.push(Self::root());
        candidates
    }

    /// Detect the process default locale from the environment
    ///
    /// Falls back to the root locale when nothing usable is set.
    #[must_use]
    pub fn system() -> Self {
        Self::system_from(|var| std::env::var(var).ok())
    }

    /// Like [`Locale::system`], reading variables through `lookup`
    ///
    /// The `C` and `POSIX` locales, with or without an encoding suffix,
    /// carry no language and are skipped.
    #[must_use]
    pub fn system_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        LOCALE_ENV_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .filter_map(|value| Self::parse(&value).ok())
            .find(|locale| {
                !locale.is_root()
                    && !locale.language.eq_ignore_ascii_case("C")
                    && !locale.language.eq_ignore_ascii_case("POSIX")
            })
            .unwrap_or_default()
    }

    /// Convert to a BCP 47 language identifier
    ///
    /// Variants that are not valid BCP 47 subtags (shorter than five
    /// characters, for example) are dropped rather than rejected.
    pub fn to_language_identifier(&self) -> Result<LanguageIdentifier> {
        if self.language.is_empty() {
            return Ok(LanguageIdentifier::default());
        }
        let base = if self.region.is_empty() {
            self.language.clone()
        } else {
            format!("{}-{}", self.language, self.region)
        };
        let full = if self.variant.is_empty() {
            base.clone()
        } else {
            format!("{base}-{}", self.variant.replace('_', "-"))
        };

        full.parse()
            .or_else(|_| base.parse())
            .map_err(|_| MsgBindError::configuration(format!("Invalid language identifier '{full}'")))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.tag())
        }
    }
}

impl FromStr for Locale {
    type Err = MsgBindError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = MsgBindError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}

impl From<&LanguageIdentifier> for Locale {
    fn from(id: &LanguageIdentifier) -> Self {
        let region = id.region.map(|r| r.as_str().to_string()).unwrap_or_default();
        let variant = id
            .variants()
            .map(|v| v.as_str().to_string())
            .collect::<Vec<_>>()
            .join("_");
        let language = if id.language.is_empty() {
            String::new()
        } else {
            id.language.as_str().to_string()
        };
        Self::new(language, region, variant)
    }
}
