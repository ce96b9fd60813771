//! Scoped configuration nodes and the module trait that fills them

use crate::bundle::{BundleBinding, Charset};
use crate::filter::{FilterKey, FilterProvider};
use crate::format::MessageFormatter;
use crate::implementation::ImplFactory;
use crate::interface::{normalize_path, AnnotationKind, InterfaceDecl, MessageInterfaceId};
use crate::locale::Locale;
use crate::plugin::Plugin;
use crate::untranslated::UntranslatedRenderer;
use msgbind_common::{bail, ensure, MsgBindError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Supplies the locale used when a call names none
pub type LocaleProvider = Arc<dyn Fn() -> Locale + Send + Sync>;

/// A unit of configuration bound to a scope
///
/// The scope defaults to the module path of the implementing type, so a
/// module defined in `app::messages` configures interfaces under
/// `app.messages`.
pub trait Module: Send + Sync {
    /// Add bindings and child modules to `node`
    fn configure(&self, node: &mut ConfigurationNode) -> Result<()>;

    /// Dotted scope of the interfaces this module applies to
    fn scope(&self) -> String {
        let path = normalize_path(std::any::type_name::<Self>());
        path.rsplit_once('.')
            .map(|(scope, _)| scope.to_string())
            .unwrap_or_default()
    }

    /// Name used to order nodes of equal scope and in logs
    fn name(&self) -> String {
        normalize_path(std::any::type_name::<Self>())
    }
}

/// One node of the configuration tree
///
/// A node is configured exactly once; afterwards it is shared read-only
/// through its parent.
pub struct ConfigurationNode {
    name: String,
    scope: String,
    module: Option<Arc<dyn Module>>,
    configured: bool,
    interfaces: Vec<Arc<InterfaceDecl>>,
    impl_bindings: HashMap<MessageInterfaceId, HashMap<Locale, ImplFactory>>,
    annotation_bindings: HashMap<AnnotationKind, Locale>,
    bundle_bindings: Vec<BundleBinding>,
    filter_bindings: HashMap<FilterKey, Arc<FilterProvider>>,
    plugins: Vec<Arc<dyn Plugin>>,
    key_prefix: String,
    locale_provider: Option<LocaleProvider>,
    untranslated: Option<Arc<dyn UntranslatedRenderer>>,
    formatter: Option<Arc<dyn MessageFormatter>>,
    debug: bool,
    children: Vec<Arc<ConfigurationNode>>,
}

impl ConfigurationNode {
    /// Create an empty node that is configured by direct calls
    pub fn new(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: normalize_path(&scope.into()),
            module: None,
            configured: false,
            interfaces: Vec::new(),
            impl_bindings: HashMap::new(),
            annotation_bindings: HashMap::new(),
            bundle_bindings: Vec::new(),
            filter_bindings: HashMap::new(),
            plugins: Vec::new(),
            key_prefix: String::new(),
            locale_provider: None,
            untranslated: None,
            formatter: None,
            debug: false,
            children: Vec::new(),
        }
    }

    /// Create a node that `module` configures
    pub fn for_module(module: Arc<dyn Module>) -> Self {
        let mut node = Self::new(module.name(), module.scope());
        node.module = Some(module);
        node
    }

    /// Run the module's configuration; later calls do nothing
    pub fn do_configure(&mut self) -> Result<()> {
        if self.configured {
            return Ok(());
        }
        if let Some(module) = self.module.clone() {
            module.configure(self)?;
        }
        self.configured = true;
        info!(node = %self.name, scope = %self.scope, "Configured message module");
        Ok(())
    }

    /// Configure `module` in a child node and attach it
    pub fn install(&mut self, module: impl Module + 'static) -> Result<&mut Self> {
        self.install_node(Self::for_module(Arc::new(module)))
    }

    /// Configure an already-built child node and attach it
    pub fn install_node(&mut self, mut child: Self) -> Result<&mut Self> {
        child.do_configure()?;
        debug!(parent = %self.name, child = %child.name, scope = %child.scope, "Installed child module");
        self.children.push(Arc::new(child));
        Ok(self)
    }

    /// Bind a message interface declaration
    pub fn bind(&mut self, decl: impl Into<Arc<InterfaceDecl>>) -> &mut Self {
        self.interfaces.push(decl.into());
        self
    }

    /// Bind a custom implementation of `interface` for `locale`
    pub fn bind_impl(&mut self, interface: impl Into<MessageInterfaceId>, locale: Locale, factory: ImplFactory) -> &mut Self {
        self.impl_bindings
            .entry(interface.into())
            .or_default()
            .insert(locale, factory);
        self
    }

    /// Start binding an annotation kind to a locale
    pub fn bind_annotation(&mut self, kind: impl Into<AnnotationKind>) -> AnnotationBinder<'_> {
        AnnotationBinder {
            node: self,
            kind: kind.into(),
        }
    }

    /// Start binding a resource bundle
    pub fn bind_bundle(&mut self, name: impl Into<String>) -> BundleBinder<'_> {
        BundleBinder {
            node: self,
            name: name.into(),
            charset: Charset::default(),
        }
    }

    /// Start binding an argument filter for a type
    pub fn bind_filter(&mut self, type_name: impl Into<String>, provider: FilterProvider) -> FilterBinder<'_> {
        FilterBinder {
            node: self,
            type_name: type_name.into(),
            provider: Arc::new(provider),
        }
    }

    /// Prefix prepended to every bundle key; honoured on the root only
    pub fn set_key_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Locale used for calls without an explicit one; honoured on the root only
    pub fn set_locale_provider<F>(&mut self, provider: F) -> &mut Self
    where
        F: Fn() -> Locale + Send + Sync + 'static,
    {
        self.locale_provider = Some(Arc::new(provider));
        self
    }

    /// Always resolve in `locale` unless a call names another
    pub fn set_fixed_locale(&mut self, locale: Locale) -> &mut Self {
        self.set_locale_provider(move || locale.clone())
    }

    /// Append a plugin to this node's chain
    pub fn install_plugin(&mut self, plugin: impl Plugin + 'static) -> &mut Self {
        self.install_shared_plugin(Arc::new(plugin))
    }

    /// Append an already shared plugin
    pub fn install_shared_plugin(&mut self, plugin: Arc<dyn Plugin>) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    /// Renderer for untranslated calls; honoured on the root only
    pub fn set_untranslated_renderer(&mut self, renderer: impl UntranslatedRenderer + 'static) -> &mut Self {
        self.untranslated = Some(Arc::new(renderer));
        self
    }

    /// Formatter for templates; honoured on the root only
    pub fn set_message_formatter(&mut self, formatter: impl MessageFormatter + 'static) -> &mut Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Log every resolution decision at info level; honoured on the root only
    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Node name, used for ordering and logs
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted scope, empty for the catch-all
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Whether the module has run
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Interfaces bound in this node
    #[must_use]
    pub fn interfaces(&self) -> &[Arc<InterfaceDecl>] {
        &self.interfaces
    }

    /// Implementations bound in this node for `interface`
    #[must_use]
    pub fn impl_bindings(&self, interface: &MessageInterfaceId) -> Option<&HashMap<Locale, ImplFactory>> {
        self.impl_bindings.get(interface)
    }

    /// Annotation bindings of this node alone
    #[must_use]
    pub const fn annotation_bindings(&self) -> &HashMap<AnnotationKind, Locale> {
        &self.annotation_bindings
    }

    /// Bundle bindings in bind order
    #[must_use]
    pub fn bundle_bindings(&self) -> &[BundleBinding] {
        &self.bundle_bindings
    }

    /// Filter bindings of this node alone
    #[must_use]
    pub const fn filter_bindings(&self) -> &HashMap<FilterKey, Arc<FilterProvider>> {
        &self.filter_bindings
    }

    /// Plugins in install order
    #[must_use]
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Bundle key prefix, empty when unset
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Locale provider, if set
    #[must_use]
    pub const fn locale_provider(&self) -> Option<&LocaleProvider> {
        self.locale_provider.as_ref()
    }

    /// Untranslated renderer, if set
    #[must_use]
    pub const fn untranslated_renderer(&self) -> Option<&Arc<dyn UntranslatedRenderer>> {
        self.untranslated.as_ref()
    }

    /// Template formatter, if set
    #[must_use]
    pub const fn message_formatter(&self) -> Option<&Arc<dyn MessageFormatter>> {
        self.formatter.as_ref()
    }

    /// Debug flag
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Installed child nodes
    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    /// This node and all descendants, depth-first
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.descendants());
        }
        nodes
    }
}

impl fmt::Debug for ConfigurationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationNode")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("configured", &self.configured)
            .field("interfaces", &self.interfaces.iter().map(|d| d.id.to_string()).collect::<Vec<_>>())
            .field("annotations", &self.annotation_bindings)
            .field("bundles", &self.bundle_bindings)
            .field("filters", &self.filter_bindings.keys().collect::<Vec<_>>())
            .field("plugins", &self.plugins.iter().map(|p| p.name().to_string()).collect::<Vec<_>>())
            .field("key_prefix", &self.key_prefix)
            .field("debug", &self.debug)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Pending annotation binding, see [`ConfigurationNode::bind_annotation`]
#[must_use = "an annotation binding does nothing until a locale is given"]
pub struct AnnotationBinder<'a> {
    node: &'a mut ConfigurationNode,
    kind: AnnotationKind,
}

impl AnnotationBinder<'_> {
    /// Bind the annotation to `locale`
    pub fn to_locale(self, locale: Locale) -> Result<()> {
        ensure!(
            self.kind.is_valid(),
            "Annotation '{}' is not a valid annotation name",
            self.kind
        );
        debug!(annotation = %self.kind, %locale, node = %self.node.name, "Bound annotation");
        self.node.annotation_bindings.insert(self.kind, locale);
        Ok(())
    }

    /// Bind the annotation to a locale given as a tag
    pub fn to_locale_tag(self, tag: &str) -> Result<()> {
        let locale = Locale::parse(tag).map_err(|err| {
            MsgBindError::configuration_with_source(
                format!("Annotation '{}' has an invalid locale '{tag}'", self.kind),
                err,
            )
        })?;
        self.to_locale(locale)
    }

    /// Bind the annotation to the root locale, the last fallback
    pub fn to_fallback(self) -> Result<()> {
        self.to_locale(Locale::root())
    }
}

/// Pending bundle binding, see [`ConfigurationNode::bind_bundle`]
#[must_use = "a bundle binding does nothing until its interfaces are given"]
pub struct BundleBinder<'a> {
    node: &'a mut ConfigurationNode,
    name: String,
    charset: Charset,
}

impl BundleBinder<'_> {
    /// Set the charset of the bundle files
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Restrict the bundle to the given interfaces
    ///
    /// An empty set is the same as [`BundleBinder::to_all`].
    pub fn to<I, T>(self, interfaces: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<MessageInterfaceId>,
    {
        let set: BTreeSet<MessageInterfaceId> = interfaces.into_iter().map(Into::into).collect();
        self.finish((!set.is_empty()).then_some(set))
    }

    /// Make the bundle available to every interface in scope
    pub fn to_all(self) -> Result<()> {
        self.finish(None)
    }

    fn finish(self, interfaces: Option<BTreeSet<MessageInterfaceId>>) -> Result<()> {
        ensure!(
            !self.name.trim().is_empty(),
            "Bundle name must not be empty in module '{}'",
            self.node.name
        );
        debug!(bundle = %self.name, charset = %self.charset, node = %self.node.name, "Bound bundle");
        self.node.bundle_bindings.push(BundleBinding {
            name: self.name,
            charset: self.charset,
            interfaces,
        });
        Ok(())
    }
}

/// Pending filter binding, see [`ConfigurationNode::bind_filter`]
#[must_use = "a filter binding does nothing until it is completed"]
pub struct FilterBinder<'a> {
    node: &'a mut ConfigurationNode,
    type_name: String,
    provider: Arc<FilterProvider>,
}

impl FilterBinder<'_> {
    /// Apply the filter only to parameters carrying one of `kinds`
    pub fn annotated_with<I, A>(self, kinds: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<AnnotationKind>,
    {
        self.validate_type()?;
        let kinds: Vec<AnnotationKind> = kinds.into_iter().map(Into::into).collect();
        if kinds.is_empty() {
            bail!("Filter for type '{}' needs at least one annotation", self.type_name);
        }
        for kind in kinds {
            ensure!(
                kind.is_valid(),
                "Filter for type '{}' uses invalid annotation '{}'",
                self.type_name,
                kind
            );
            self.node.filter_bindings.insert(
                FilterKey::annotated(self.type_name.clone(), kind),
                Arc::clone(&self.provider),
            );
        }
        Ok(())
    }

    /// Apply the filter to every parameter of the type
    pub fn unannotated(self) -> Result<()> {
        self.validate_type()?;
        self.node
            .filter_bindings
            .insert(FilterKey::unannotated(self.type_name), self.provider);
        Ok(())
    }

    fn validate_type(&self) -> Result<()> {
        ensure!(
            !self.type_name.trim().is_empty(),
            "Filter type name must not be empty in module '{}'",
            self.node.name
        );
        Ok(())
    }
}
