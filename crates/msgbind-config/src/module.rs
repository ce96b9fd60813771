//! A [`Module`] built from a declarative configuration.

use crate::schema::{
    FormatterKind, InterfaceConfig, MessagesConfig, MethodConfig, ModuleConfig, ReturnsConfig, Settings,
    TranslationConfig,
};
use crate::validation::ConfigValidator;
use msgbind_common::{ensure, MsgBindError, Result};
use msgbind_core::{ConfigurationNode, FluentFormatter, InterfaceDecl, MethodDecl, Module, TextSource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type Catalog = HashMap<String, Arc<InterfaceDecl>>;

/// Configures a node tree from a [`ModuleConfig`]
///
/// Interface declarations are built once for the whole tree so that
/// `extends` may name an interface declared in any module.
pub struct DeclarativeModule {
    config: ModuleConfig,
    settings: Option<Settings>,
    catalog: Arc<Catalog>,
}

impl DeclarativeModule {
    /// Build the root module, validating the configuration first.
    pub fn from_config(config: &MessagesConfig) -> Result<Self> {
        ConfigValidator::validate(config)?;
        let catalog = build_catalog(&config.root)?;
        debug!(interfaces = catalog.len(), "Built interface declarations");
        Ok(Self {
            config: config.root.clone(),
            settings: Some(config.settings.clone()),
            catalog: Arc::new(catalog),
        })
    }

    fn child(&self, config: &ModuleConfig) -> Self {
        Self {
            config: config.clone(),
            settings: None,
            catalog: Arc::clone(&self.catalog),
        }
    }

    /// The interface declaration built for `name`, if any.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&Arc<InterfaceDecl>> {
        self.catalog.get(name)
    }
}

impl Module for DeclarativeModule {
    fn configure(&self, node: &mut ConfigurationNode) -> Result<()> {
        if let Some(settings) = &self.settings {
            apply_settings(node, settings);
        }

        for (kind, locale) in &self.config.annotations {
            node.bind_annotation(kind.as_str()).to_locale(locale.clone())?;
        }

        for bundle in &self.config.bundles {
            node.bind_bundle(bundle.name.as_str())
                .charset(bundle.charset)
                .to(bundle.interfaces.iter().map(String::as_str))?;
        }

        for interface in &self.config.interfaces {
            let decl = self.catalog.get(&interface.name).ok_or_else(|| {
                MsgBindError::configuration(format!("Interface '{}' was not built", interface.name))
            })?;
            node.bind(Arc::clone(decl));
        }

        for child in &self.config.modules {
            node.install(self.child(child))?;
        }
        Ok(())
    }

    fn scope(&self) -> String {
        self.config.scope.clone()
    }

    fn name(&self) -> String {
        if self.config.name.is_empty() {
            format!("module:{}", self.config.scope)
        } else {
            self.config.name.clone()
        }
    }
}

fn apply_settings(node: &mut ConfigurationNode, settings: &Settings) {
    node.set_key_prefix(settings.key_prefix.as_str())
        .set_debug(settings.debug);
    if let Some(locale) = &settings.locale {
        node.set_fixed_locale(locale.clone());
    }
    if settings.formatter == FormatterKind::Fluent {
        node.set_message_formatter(FluentFormatter);
    }
}

fn build_catalog(root: &ModuleConfig) -> Result<Catalog> {
    let mut configs = HashMap::new();
    gather(root, &mut configs);

    let mut catalog = Catalog::new();
    for name in configs.keys() {
        build_interface(name, &configs, &mut catalog, &mut Vec::new())?;
    }
    Ok(catalog)
}

fn gather<'a>(module: &'a ModuleConfig, configs: &mut HashMap<&'a str, &'a InterfaceConfig>) {
    for interface in &module.interfaces {
        configs.insert(interface.name.as_str(), interface);
    }
    for child in &module.modules {
        gather(child, configs);
    }
}

fn build_interface(
    name: &str,
    configs: &HashMap<&str, &InterfaceConfig>,
    catalog: &mut Catalog,
    building: &mut Vec<String>,
) -> Result<Arc<InterfaceDecl>> {
    if let Some(built) = catalog.get(name) {
        return Ok(Arc::clone(built));
    }
    ensure!(
        !building.iter().any(|n| n == name),
        "Interface '{}' inherits from itself",
        name
    );
    let config = configs
        .get(name)
        .ok_or_else(|| MsgBindError::configuration(format!("Unknown interface '{name}'")))?;

    building.push(name.to_string());
    let mut decl = InterfaceDecl::new(&config.name);
    if let Some(key) = &config.key {
        decl = decl.key(key.as_str());
    }
    for parent in &config.extends {
        decl = decl.extends(build_interface(parent, configs, catalog, building)?);
    }
    for method in &config.methods {
        decl = decl.method(build_method(method));
    }
    building.pop();

    let decl = Arc::new(decl);
    catalog.insert(name.to_string(), Arc::clone(&decl));
    Ok(decl)
}

fn build_method(config: &MethodConfig) -> MethodDecl {
    let mut method = if config.identity {
        MethodDecl::identity(config.name.as_str())
    } else {
        MethodDecl::new(config.name.as_str())
    };

    for param in &config.params {
        method = method.param_annotated(param.type_name(), param.annotations().iter().map(String::as_str));
    }
    if let Some(key) = &config.key {
        method = method.key(key.as_str());
    }
    for (kind, translation) in &config.translations {
        let (source, raw) = text_source(translation);
        method = method.translation_from(kind.as_str(), source, raw);
    }
    match &config.returns {
        ReturnsConfig::Text => method,
        ReturnsConfig::MultiLocale => method.multi_locale(),
        ReturnsConfig::Nested(target) => method.returns_nested(target.as_str()),
    }
}

fn text_source(translation: &TranslationConfig) -> (TextSource, bool) {
    match translation {
        TranslationConfig::Text(text) => (TextSource::Inline(text.clone()), false),
        TranslationConfig::Source(source) => {
            let text_source = match (&source.text, &source.url, &source.internal) {
                (_, Some(url), _) => TextSource::Url(url.clone()),
                (_, _, Some(path)) => TextSource::Internal(path.clone()),
                (text, _, _) => TextSource::Inline(text.clone().unwrap_or_default()),
            };
            (text_source, source.raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamConfig;
    use msgbind_core::{MessageInterfaceId, MethodId};

    fn config() -> MessagesConfig {
        let mut config = MessagesConfig::default();
        config.root.name = "messages".to_string();
        config.root.interfaces.push(InterfaceConfig {
            name: "app.Base".to_string(),
            methods: vec![MethodConfig {
                name: "ok".to_string(),
                translations: [("En".to_string(), TranslationConfig::Text("OK".to_string()))]
                    .into_iter()
                    .collect(),
                ..MethodConfig::default()
            }],
            ..InterfaceConfig::default()
        });
        config.root.modules.push(ModuleConfig {
            name: "dialogs".to_string(),
            scope: "app".to_string(),
            interfaces: vec![InterfaceConfig {
                name: "app.Dialog".to_string(),
                extends: vec!["app.Base".to_string()],
                methods: vec![MethodConfig {
                    name: "confirm".to_string(),
                    params: vec![ParamConfig::Annotated {
                        type_name: "String".to_string(),
                        annotations: vec!["Upper".to_string()],
                    }],
                    ..MethodConfig::default()
                }],
                ..InterfaceConfig::default()
            }],
            ..ModuleConfig::default()
        });
        config
    }

    #[test]
    fn test_catalog_shares_parents() {
        let module = DeclarativeModule::from_config(&config()).unwrap();

        let base = module.interface("app.Base").unwrap();
        let dialog = module.interface("app.Dialog").unwrap();
        assert!(Arc::ptr_eq(&dialog.extends[0], base));

        let (declaring, method) = dialog.find_method(&MethodId::new("ok")).unwrap();
        assert_eq!(declaring.id, MessageInterfaceId::new("app.Base"));
        assert_eq!(method.translations.len(), 1);

        let (_, confirm) = dialog
            .find_method(&MethodId::with_params("confirm", ["String"]))
            .unwrap();
        assert_eq!(confirm.param_annotations[0][0].name(), "Upper");
    }

    #[test]
    fn test_module_tree() {
        let mut node = ConfigurationNode::for_module(Arc::new(DeclarativeModule::from_config(&config()).unwrap()));
        node.do_configure().unwrap();

        assert_eq!(node.name(), "messages");
        assert_eq!(node.scope(), "");
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].name(), "dialogs");
        assert_eq!(node.children()[0].scope(), "app");
        assert_eq!(node.children()[0].interfaces()[0].id, MessageInterfaceId::new("app.Dialog"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut invalid = config();
        invalid.root.modules[0].interfaces[0].extends.push("app.Missing".to_string());

        let error = DeclarativeModule::from_config(&invalid).err().unwrap();
        assert!(error.is_configuration());
    }
}
