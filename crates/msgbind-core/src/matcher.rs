//! Closest-locale matching with a single system-default retry

use crate::locale::Locale;
use std::collections::HashSet;

/// Picks the best available locale for a requested one
///
/// Candidates are tried from most to least specific (see
/// [`Locale::fallback_candidates`]). When nothing matches, the search is
/// retried exactly once with the process default locale.
#[derive(Debug, Clone)]
pub struct LocaleMatcher {
    system_default: Locale,
}

impl LocaleMatcher {
    /// Create a matcher that retries with `system_default`
    #[must_use]
    pub const fn new(system_default: Locale) -> Self {
        Self { system_default }
    }

    /// Create a matcher using the locale detected from the environment
    #[must_use]
    pub fn system() -> Self {
        Self::new(Locale::system())
    }

    /// The locale used for the second-tier retry
    #[must_use]
    pub const fn system_default(&self) -> &Locale {
        &self.system_default
    }

    /// Find the closest match for `requested` in `available`
    #[must_use]
    pub fn find_closest_match(&self, available: &HashSet<Locale>, requested: &Locale) -> Option<Locale> {
        self.find_closest_match_by(|locale| available.contains(locale), requested)
    }

    /// Find the closest match using a membership predicate
    ///
    /// Lets callers match against map keys without collecting them first.
    pub fn find_closest_match_by<F>(&self, contains: F, requested: &Locale) -> Option<Locale>
    where
        F: Fn(&Locale) -> bool,
    {
        self.search(&contains, requested)
    }

    fn search(&self, contains: &dyn Fn(&Locale) -> bool, requested: &Locale) -> Option<Locale> {
        if let Some(found) = requested
            .fallback_candidates()
            .into_iter()
            .find(|candidate| contains(candidate))
        {
            return Some(found);
        }

        // Root is always the last candidate, so reaching here means it is not
        // available. Retry once through the system default chain.
        if requested == &self.system_default {
            return None;
        }
        self.search(contains, &self.system_default)
    }
}

impl Default for LocaleMatcher {
    fn default() -> Self {
        Self::system()
    }
}
