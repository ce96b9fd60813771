//! Precedence-applied view of the configuration chain for one interface

use crate::bundle::BundleBinding;
use crate::chain::resolve_chain;
use crate::filter::{FilterKey, FilterProvider};
use crate::format::{IndexedFormatter, MessageFormatter};
use crate::implementation::ImplFactory;
use crate::interface::{AnnotationKind, MessageInterfaceId};
use crate::locale::Locale;
use crate::node::{ConfigurationNode, LocaleProvider};
use crate::plugin::Plugin;
use crate::untranslated::{DefaultUntranslatedRenderer, UntranslatedRenderer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Bindings in effect for one interface
///
/// Annotation and filter bindings are overridden child-over-parent.
/// Implementations, bundles and plugins accumulate along the chain. Scalar
/// settings come from the root node alone.
pub struct ComposedModule {
    interface: MessageInterfaceId,
    chain: Vec<Arc<ConfigurationNode>>,
    annotations: HashMap<AnnotationKind, Locale>,
    filters: HashMap<FilterKey, Arc<FilterProvider>>,
    implementations: HashMap<Locale, ImplFactory>,
    bundles: Vec<BundleBinding>,
    plugins: Vec<Arc<dyn Plugin>>,
    key_prefix: String,
    locale_provider: Option<LocaleProvider>,
    untranslated: Arc<dyn UntranslatedRenderer>,
    formatter: Arc<dyn MessageFormatter>,
    debug: bool,
}

impl ComposedModule {
    /// Compose the chain below `root` for `interface`
    #[must_use]
    pub fn compose(root: &Arc<ConfigurationNode>, interface: &MessageInterfaceId) -> Self {
        Self::from_chain(root, resolve_chain(root, interface), interface)
    }

    /// Compose as [`ComposedModule::compose`] with `base` as the least
    /// specific node, after the root
    #[must_use]
    pub fn compose_over(
        root: &Arc<ConfigurationNode>,
        base: &Arc<ConfigurationNode>,
        interface: &MessageInterfaceId,
    ) -> Self {
        let mut chain = resolve_chain(root, interface);
        chain.push(Arc::clone(base));
        Self::from_chain(root, chain, interface)
    }

    fn from_chain(
        root: &ConfigurationNode,
        chain: Vec<Arc<ConfigurationNode>>,
        interface: &MessageInterfaceId,
    ) -> Self {
        let mut annotations = HashMap::new();
        let mut filters = HashMap::new();
        for node in chain.iter().rev() {
            annotations.extend(
                node.annotation_bindings()
                    .iter()
                    .map(|(kind, locale)| (kind.clone(), locale.clone())),
            );
            filters.extend(
                node.filter_bindings()
                    .iter()
                    .map(|(key, provider)| (key.clone(), Arc::clone(provider))),
            );
        }

        let mut implementations = HashMap::new();
        for bindings in chain.iter().filter_map(|node| node.impl_bindings(interface)) {
            for (locale, factory) in bindings {
                implementations
                    .entry(locale.clone())
                    .or_insert_with(|| Arc::clone(factory));
            }
        }

        let mut seen = HashSet::new();
        let bundles = chain
            .iter()
            .flat_map(|node| node.bundle_bindings())
            .filter(|binding| binding.applies_to(interface))
            .filter(|binding| seen.insert(binding.name.clone()))
            .cloned()
            .collect();

        let plugins = chain
            .iter()
            .rev()
            .flat_map(|node| node.plugins().iter().cloned())
            .collect();

        Self {
            interface: interface.clone(),
            annotations,
            filters,
            implementations,
            bundles,
            plugins,
            key_prefix: root.key_prefix().to_string(),
            locale_provider: root.locale_provider().cloned(),
            untranslated: root
                .untranslated_renderer()
                .cloned()
                .unwrap_or_else(|| Arc::new(DefaultUntranslatedRenderer) as Arc<dyn UntranslatedRenderer>),
            formatter: root
                .message_formatter()
                .cloned()
                .unwrap_or_else(|| Arc::new(IndexedFormatter) as Arc<dyn MessageFormatter>),
            debug: root.debug(),
            chain,
        }
    }

    /// Interface this view was composed for
    #[must_use]
    pub const fn interface(&self) -> &MessageInterfaceId {
        &self.interface
    }

    /// Applicable nodes, most specific first
    #[must_use]
    pub fn chain(&self) -> &[Arc<ConfigurationNode>] {
        &self.chain
    }

    /// Locale bound to an annotation kind
    #[must_use]
    pub fn annotation_locale(&self, kind: &AnnotationKind) -> Option<&Locale> {
        self.annotations.get(kind)
    }

    /// Annotation bindings after override
    #[must_use]
    pub const fn annotations(&self) -> &HashMap<AnnotationKind, Locale> {
        &self.annotations
    }

    /// Filter bindings after override
    #[must_use]
    pub const fn filters(&self) -> &HashMap<FilterKey, Arc<FilterProvider>> {
        &self.filters
    }

    /// Custom implementations per locale, most specific binding first
    #[must_use]
    pub const fn implementations(&self) -> &HashMap<Locale, ImplFactory> {
        &self.implementations
    }

    /// Applicable bundles in lookup order
    #[must_use]
    pub fn bundles(&self) -> &[BundleBinding] {
        &self.bundles
    }

    /// Plugins in run order, root first
    #[must_use]
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Bundle key prefix of the root
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Locale for calls that name none, `None` without a provider
    #[must_use]
    pub fn provided_locale(&self) -> Option<Locale> {
        self.locale_provider.as_ref().map(|provider| provider())
    }

    /// Renderer for calls without any translation
    #[must_use]
    pub fn untranslated_renderer(&self) -> &dyn UntranslatedRenderer {
        self.untranslated.as_ref()
    }

    /// Template formatter
    #[must_use]
    pub fn formatter(&self) -> &dyn MessageFormatter {
        self.formatter.as_ref()
    }

    /// Whether resolution decisions are logged at info level
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }
}

impl fmt::Debug for ComposedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedModule")
            .field("interface", &self.interface)
            .field("chain", &self.chain.iter().map(|n| n.name().to_string()).collect::<Vec<_>>())
            .field("annotations", &self.annotations)
            .field("implementations", &self.implementations.keys().collect::<Vec<_>>())
            .field("bundles", &self.bundles)
            .field("plugins", &self.plugins.len())
            .field("key_prefix", &self.key_prefix)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
