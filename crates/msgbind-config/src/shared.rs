//! Reloadable shared message context using arc-swap for lock-free reads.

use crate::loader::ConfigLoader;
use crate::module::DeclarativeModule;
use crate::schema::MessagesConfig;
use arc_swap::ArcSwap;
use msgbind_bundle::{FsResourceReader, PropertiesBundleLoader};
use msgbind_common::Result;
use msgbind_core::MessageContext;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

static GLOBAL: Lazy<SharedContext> = Lazy::new(SharedContext::unconfigured);

/// The process-wide shared context, unconfigured until first loaded.
pub fn global() -> &'static SharedContext {
    &GLOBAL
}

/// Build a configured context from `config`
///
/// Relative bundle and resource directories are resolved against
/// `base_dir`, normally the directory of the configuration file.
pub fn build_context(config: &MessagesConfig, base_dir: &Path) -> Result<MessageContext> {
    let settings = &config.settings;
    let mut context = MessageContext::new();

    if let Some(dir) = &settings.bundle_dir {
        context = context.with_bundle_loader(PropertiesBundleLoader::new(base_dir.join(dir)));
    }
    if let Some(dir) = &settings.resource_dir {
        context = context.with_resource_reader(FsResourceReader::new(base_dir.join(dir)));
    }
    if let Some(locale) = &settings.system_locale {
        context = context.with_system_locale(locale.clone());
    }

    context.configure(DeclarativeModule::from_config(config)?)?;
    Ok(context)
}

/// Thread-safe holder of the current message context.
///
/// Readers get an `Arc` snapshot; a reload swaps in a new context without
/// blocking them. A failed reload keeps the previous context.
pub struct SharedContext {
    context: ArcSwap<MessageContext>,
}

impl SharedContext {
    /// Creates a shared context holding `context`.
    pub fn new(context: MessageContext) -> Self {
        Self {
            context: ArcSwap::from_pointee(context),
        }
    }

    /// Creates a shared context holding an unconfigured context.
    pub fn unconfigured() -> Self {
        Self::new(MessageContext::new())
    }

    /// Gets the current context.
    pub fn get(&self) -> Arc<MessageContext> {
        self.context.load_full()
    }

    /// Replaces the context atomically.
    pub fn replace(&self, context: MessageContext) {
        self.context.store(Arc::new(context));
    }

    /// Rebuilds the context from `config`.
    pub fn apply(&self, config: &MessagesConfig, base_dir: &Path) -> Result<()> {
        let context = build_context(config, base_dir)?;
        self.replace(context);
        info!("Message context replaced");
        Ok(())
    }

    /// Rebuilds the context from a configuration file.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let result = ConfigLoader::load_config(path).and_then(|config| self.apply(&config, base_dir));
        if let Err(err) = &result {
            warn!(path = %path.display(), error = %err, "Message context reload failed, keeping previous context");
        }
        result
    }
}

impl Default for SharedContext {
    fn default() -> Self {
        Self::unconfigured()
    }
}
