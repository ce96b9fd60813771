//! The resolution context: configuration, caches and the resolution pipeline

use crate::builtin::builtin_node;
use crate::bundle::{BundleLoader, NoBundles};
use crate::composed::ComposedModule;
use crate::filter::apply_filters;
use crate::implementation::MessageImpl;
use crate::interface::{InterfaceDecl, MessageInterfaceId, MethodDecl, MethodId, ReturnKind};
use crate::locale::Locale;
use crate::matcher::LocaleMatcher;
use crate::node::{ConfigurationNode, Module};
use crate::plugin::{run_plugins, PluginContext};
use crate::resource::{NoResources, ResourceReader};
use crate::unit::TranslationUnit;
use crate::untranslated::UntranslatedMessage;
use crate::value::{LocalizedMessages, NestedMessage, Resolved, Value};
use dashmap::DashMap;
use msgbind_common::{bail, ensure, MsgBindError, Result};
use once_cell::sync::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info, warn};

const CONFIGURE: &str = "MessageContext::configure";

/// Memoisation map whose values are computed once per key
///
/// The map lock is only held to fetch the cell; the value is computed
/// outside it, so a computation may itself resolve messages.
type OnceMap<K, V> = DashMap<K, Arc<OnceCell<V>>>;

fn once_cell_for<K, V>(map: &OnceMap<K, V>, key: &K) -> Arc<OnceCell<V>>
where
    K: Eq + Hash + Clone,
{
    if let Some(cell) = map.get(key) {
        return Arc::clone(cell.value());
    }
    Arc::clone(map.entry(key.clone()).or_default().value())
}

/// Where the text of a resolution came from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Bundle(String),
    Annotation(Locale),
    Delegate,
    Untranslated,
}

/// One call travelling through the pipeline
struct Call<'a> {
    interface: &'a MessageInterfaceId,
    method: &'a MethodDecl,
    args: &'a [Value],
    explicit: Option<&'a Locale>,
    delegate: Option<&'a str>,
}

/// Holds the configured tree and resolves message calls against it
///
/// Configure once with [`MessageContext::configure`]; afterwards the context
/// is read-only apart from its memoisation caches and can be shared between
/// threads behind an `Arc`.
pub struct MessageContext {
    root: Option<Arc<ConfigurationNode>>,
    builtins: Option<Arc<ConfigurationNode>>,
    interfaces: HashMap<MessageInterfaceId, Arc<InterfaceDecl>>,
    matcher: LocaleMatcher,
    bundles: Arc<dyn BundleLoader>,
    resources: Arc<dyn ResourceReader>,
    composed: OnceMap<MessageInterfaceId, Arc<ComposedModule>>,
    units: OnceMap<(MessageInterfaceId, MethodId), Arc<TranslationUnit>>,
    instances: OnceMap<(MessageInterfaceId, Locale), Arc<dyn MessageImpl>>,
}

impl MessageContext {
    /// An unconfigured context without bundles or resources
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            builtins: None,
            interfaces: HashMap::new(),
            matcher: LocaleMatcher::system(),
            bundles: Arc::new(NoBundles),
            resources: Arc::new(NoResources),
            composed: DashMap::new(),
            units: DashMap::new(),
            instances: DashMap::new(),
        }
    }

    /// Use `loader` for resource bundles
    #[must_use]
    pub fn with_bundle_loader(mut self, loader: impl BundleLoader + 'static) -> Self {
        self.bundles = Arc::new(loader);
        self
    }

    /// Use `reader` for URL and internal translation sources
    #[must_use]
    pub fn with_resource_reader(mut self, reader: impl ResourceReader + 'static) -> Self {
        self.resources = Arc::new(reader);
        self
    }

    /// Override the process default locale used for the fallback retry
    #[must_use]
    pub fn with_system_locale(mut self, locale: Locale) -> Self {
        self.matcher = LocaleMatcher::new(locale);
        self
    }

    /// Configure the context with `module` as the root
    pub fn configure(&mut self, module: impl Module + 'static) -> Result<()> {
        self.configure_node(ConfigurationNode::for_module(Arc::new(module)))
    }

    /// Configure the context with a prepared root node
    ///
    /// A context is configured once; later calls are ignored with a warning.
    pub fn configure_node(&mut self, mut root: ConfigurationNode) -> Result<()> {
        if let Some(existing) = &self.root {
            warn!(root = %existing.name(), ignored = %root.name(), "Message context already configured");
            return Ok(());
        }

        root.do_configure()?;
        let builtins = builtin_node()?;
        let interfaces = collect_interfaces(&root)?;

        info!(
            root = %root.name(),
            interfaces = interfaces.len(),
            modules = root.descendants().len(),
            "Message context configured"
        );
        self.interfaces = interfaces;
        self.builtins = Some(Arc::new(builtins));
        self.root = Some(Arc::new(root));
        Ok(())
    }

    /// Whether a root has been configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.root.is_some()
    }

    /// Drop the configuration and every cache
    pub fn dispose(&mut self) {
        self.root = None;
        self.builtins = None;
        self.interfaces.clear();
        self.composed.clear();
        self.units.clear();
        self.instances.clear();
        info!("Message context disposed");
    }

    /// The configured root node
    #[must_use]
    pub const fn root(&self) -> Option<&Arc<ConfigurationNode>> {
        self.root.as_ref()
    }

    /// A bound interface declaration
    #[must_use]
    pub fn interface(&self, id: &MessageInterfaceId) -> Option<&Arc<InterfaceDecl>> {
        self.interfaces.get(id)
    }

    /// All bound interface ids, sorted
    #[must_use]
    pub fn interface_ids(&self) -> Vec<&MessageInterfaceId> {
        let mut ids: Vec<_> = self.interfaces.keys().collect();
        ids.sort();
        ids
    }

    /// Locale matcher holding the system default
    #[must_use]
    pub const fn matcher(&self) -> &LocaleMatcher {
        &self.matcher
    }

    /// Loader used for bundle lookups
    #[must_use]
    pub fn bundle_loader(&self) -> &dyn BundleLoader {
        self.bundles.as_ref()
    }

    /// Resolve one message call
    ///
    /// `locale` overrides the configured locale provider for this call and
    /// for any nested interface reached through its result.
    pub fn resolve(
        &self,
        interface: &MessageInterfaceId,
        method: &MethodId,
        args: &[Value],
        locale: Option<&Locale>,
    ) -> Result<Resolved> {
        let root = self.require_root("resolve")?;
        self.resolve_call(root, interface, method, args, locale, None)
    }

    /// Resolve a call and render the result as text
    pub fn resolve_text(
        &self,
        interface: &MessageInterfaceId,
        method: &MethodId,
        args: &[Value],
        locale: Option<&Locale>,
    ) -> Result<String> {
        Ok(self.resolve(interface, method, args, locale)?.to_string())
    }

    /// Resolve a method of a nested interface handle
    pub fn resolve_nested(&self, nested: &NestedMessage, method: &MethodId, args: &[Value]) -> Result<Resolved> {
        let root = self.require_root("resolve_nested")?;
        self.resolve_call(
            root,
            nested.interface(),
            method,
            args,
            nested.locale(),
            Some(nested.delegate()),
        )
    }

    /// The composed view for an interface, built on first use
    pub fn composed(&self, interface: &MessageInterfaceId) -> Result<Arc<ComposedModule>> {
        let root = self.require_root("composed")?;
        Ok(self.composed_for(root, interface))
    }

    /// The translation unit of a method, built on first use
    pub fn translation_unit(&self, interface: &MessageInterfaceId, method: &MethodId) -> Result<Arc<TranslationUnit>> {
        let root = self.require_root("translation_unit")?;
        let (declaring, method_decl) = self.lookup(interface, method)?;
        let composed = self.composed_for(root, interface);
        self.unit_for(interface, declaring, method_decl, &composed)
    }

    fn require_root(&self, operation: &str) -> Result<&Arc<ConfigurationNode>> {
        self.root
            .as_ref()
            .ok_or_else(|| MsgBindError::unconfigured(operation, CONFIGURE))
    }

    fn lookup(
        &self,
        interface: &MessageInterfaceId,
        method: &MethodId,
    ) -> Result<(&InterfaceDecl, &MethodDecl)> {
        let unknown = || MsgBindError::unknown_message(interface.to_string(), method.to_string());
        let decl = self.interfaces.get(interface).ok_or_else(unknown)?;
        decl.find_method(method).ok_or_else(unknown)
    }

    fn composed_for(&self, root: &Arc<ConfigurationNode>, interface: &MessageInterfaceId) -> Arc<ComposedModule> {
        let cell = once_cell_for(&self.composed, interface);
        let composed = cell.get_or_init(|| {
            let composed = match &self.builtins {
                Some(builtins) => ComposedModule::compose_over(root, builtins, interface),
                None => ComposedModule::compose(root, interface),
            };
            debug!(%interface, chain = composed.chain().len(), "Composed configuration chain");
            Arc::new(composed)
        });
        Arc::clone(composed)
    }

    fn unit_for(
        &self,
        interface: &MessageInterfaceId,
        declaring: &InterfaceDecl,
        method: &MethodDecl,
        composed: &ComposedModule,
    ) -> Result<Arc<TranslationUnit>> {
        let cell = once_cell_for(&self.units, &(interface.clone(), method.id.clone()));
        let unit = cell.get_or_try_init(|| {
            TranslationUnit::build(declaring, method, composed, self.resources.as_ref()).map(Arc::new)
        })?;
        Ok(Arc::clone(unit))
    }

    fn resolve_call(
        &self,
        root: &Arc<ConfigurationNode>,
        interface: &MessageInterfaceId,
        method: &MethodId,
        args: &[Value],
        explicit: Option<&Locale>,
        delegate: Option<&str>,
    ) -> Result<Resolved> {
        let (declaring, method_decl) = self.lookup(interface, method)?;
        let composed = self.composed_for(root, interface);
        let call = Call {
            interface,
            method: method_decl,
            args,
            explicit,
            delegate,
        };

        let current = explicit
            .cloned()
            .or_else(|| composed.provided_locale())
            .unwrap_or_else(|| self.matcher.system_default().clone());
        if method_decl.returns == ReturnKind::MultiLocale {
            let unit = self.unit_for(interface, declaring, method_decl, &composed)?;
            return self.resolve_localized(&call, &composed, &unit, &current);
        }

        if let Some(value) = self.invoke_implementation(&call, &composed, &current)? {
            return Ok(Resolved::Value(value));
        }

        let unit = self.unit_for(interface, declaring, method_decl, &composed)?;

        let filtered = apply_filters(composed.filters(), interface, method_decl, args)?;
        let (text, template, origin) = self.resolve_text_value(&call, &composed, &unit, &current, &filtered)?;
        log_origin(&composed, &call, &current, &origin);

        let value = match &method_decl.returns {
            ReturnKind::Nested(target) => {
                Resolved::Nested(NestedMessage::new(target.clone(), text, call.explicit.cloned()))
            }
            _ => Resolved::Text(text),
        };

        let plugin_context = PluginContext {
            interface,
            method: &method_decl.id,
            args,
            template: template.as_deref(),
            locale: &current,
        };
        run_plugins(composed.plugins(), value, &plugin_context)
    }

    fn resolve_localized(
        &self,
        call: &Call<'_>,
        composed: &ComposedModule,
        unit: &TranslationUnit,
        current: &Locale,
    ) -> Result<Resolved> {
        let filtered = apply_filters(composed.filters(), call.interface, call.method, call.args)?;
        let mut entries = BTreeMap::new();
        for (locale, template) in unit.templates() {
            let text = if template.raw {
                template.text.clone()
            } else {
                self.format(call, composed, &template.text, &filtered, locale)?
            };
            entries.insert(locale.clone(), text);
        }

        let current = self
            .matcher
            .find_closest_match_by(|locale| entries.contains_key(locale), current);
        debug!(
            interface = %call.interface,
            method = %call.method.id,
            locales = entries.len(),
            "Resolved multi-locale message"
        );
        Ok(Resolved::Localized(LocalizedMessages::new(entries, current)))
    }

    fn invoke_implementation(
        &self,
        call: &Call<'_>,
        composed: &ComposedModule,
        current: &Locale,
    ) -> Result<Option<Value>> {
        let implementations = composed.implementations();
        if implementations.is_empty() {
            return Ok(None);
        }
        let Some(locale) = self
            .matcher
            .find_closest_match_by(|locale| implementations.contains_key(locale), current)
        else {
            return Ok(None);
        };

        let to_error = |source| MsgBindError::Implementation {
            interface: call.interface.to_string(),
            method: call.method.id.to_string(),
            source,
        };

        let cell = once_cell_for(&self.instances, &(call.interface.clone(), locale.clone()));
        let instance = Arc::clone(cell.get_or_try_init(|| implementations[&locale]().map_err(to_error))?);

        if composed.debug() {
            info!(interface = %call.interface, method = %call.method.id, %locale, "Resolved through custom implementation");
        } else {
            debug!(interface = %call.interface, method = %call.method.id, %locale, "Resolved through custom implementation");
        }
        instance
            .invoke(&call.method.id, call.args)
            .map(Some)
            .map_err(to_error)
    }

    fn resolve_text_value(
        &self,
        call: &Call<'_>,
        composed: &ComposedModule,
        unit: &TranslationUnit,
        current: &Locale,
        filtered: &[Value],
    ) -> Result<(String, Option<String>, Origin)> {
        for binding in composed.bundles() {
            let found = self
                .bundles
                .lookup(&binding.name, binding.charset, current, unit.bundle_key())?;
            if let Some(template) = found {
                let text = self.format(call, composed, &template, filtered, current)?;
                return Ok((text, Some(template), Origin::Bundle(binding.name.clone())));
            }
        }

        if let Some(locale) = self
            .matcher
            .find_closest_match_by(|locale| unit.has_locale(locale), current)
        {
            if let Some(template) = unit.template(&locale) {
                let text = if template.raw {
                    template.text.clone()
                } else {
                    self.format(call, composed, &template.text, filtered, current)?
                };
                return Ok((text, Some(template.text.clone()), Origin::Annotation(locale)));
            }
        }

        if call.method.identity && call.args.is_empty() {
            if let Some(delegate) = call.delegate {
                return Ok((delegate.to_string(), None, Origin::Delegate));
            }
        }

        let text = composed.untranslated_renderer().render(&UntranslatedMessage {
            interface: call.interface,
            method: &call.method.id,
            args: call.args,
            locale: current,
        });
        Ok((text, None, Origin::Untranslated))
    }

    fn format(
        &self,
        call: &Call<'_>,
        composed: &ComposedModule,
        template: &str,
        args: &[Value],
        locale: &Locale,
    ) -> Result<String> {
        composed
            .formatter()
            .format(template, args, locale)
            .map_err(|err| MsgBindError::Format {
                interface: call.interface.to_string(),
                method: call.method.id.to_string(),
                message: err.to_string(),
            })
    }
}

impl Default for MessageContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageContext")
            .field("root", &self.root.as_ref().map(|root| root.name().to_string()))
            .field("interfaces", &self.interface_ids())
            .field("matcher", &self.matcher)
            .field("composed_cached", &self.composed.len())
            .field("units_cached", &self.units.len())
            .field("instances_cached", &self.instances.len())
            .finish_non_exhaustive()
    }
}

fn log_origin(composed: &ComposedModule, call: &Call<'_>, current: &Locale, origin: &Origin) {
    if composed.debug() {
        info!(interface = %call.interface, method = %call.method.id, locale = %current, ?origin, "Resolved message");
    } else {
        debug!(interface = %call.interface, method = %call.method.id, locale = %current, ?origin, "Resolved message");
    }
}

/// Every interface bound anywhere in the tree, checked for consistency
fn collect_interfaces(root: &ConfigurationNode) -> Result<HashMap<MessageInterfaceId, Arc<InterfaceDecl>>> {
    let mut interfaces = HashMap::new();
    for node in root.descendants() {
        for decl in node.interfaces() {
            if interfaces.insert(decl.id.clone(), Arc::clone(decl)).is_some() {
                bail!(
                    "Interface '{}' is bound more than once (again in module '{}')",
                    decl.id,
                    node.name()
                );
            }
        }
    }

    for decl in interfaces.values() {
        for (_, method) in decl.all_methods() {
            ensure!(
                !method.identity || method.id.params().is_empty(),
                "Identity method {}.{} must not take parameters",
                decl.id,
                method.id
            );
            if let ReturnKind::Nested(target) = &method.returns {
                ensure!(
                    interfaces.contains_key(target),
                    "Method {}.{} returns interface '{}', which is not bound",
                    decl.id,
                    method.id,
                    target
                );
            }
        }
    }
    Ok(interfaces)
}
