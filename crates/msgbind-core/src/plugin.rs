//! Post-processing plugins

use crate::interface::{MessageInterfaceId, MethodId};
use crate::locale::Locale;
use crate::value::{Resolved, Value};
use msgbind_common::{BoxError, MsgBindError, Result};
use std::sync::Arc;
use tracing::debug;

/// What a plugin decided to do with the current value
#[derive(Debug, Clone, PartialEq)]
pub enum PluginOutcome {
    /// Continue the chain with this value
    PassOn(Resolved),
    /// Stop the chain; this value is final
    Interrupt(Resolved),
    /// Leave the value unchanged and continue
    Abstain,
}

/// Everything a plugin can see about the call being resolved
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    /// Interface being resolved
    pub interface: &'a MessageInterfaceId,
    /// Method being resolved
    pub method: &'a MethodId,
    /// Arguments as passed, before filtering
    pub args: &'a [Value],
    /// Template the value was formatted from, when one was used
    pub template: Option<&'a str>,
    /// Locale the value was resolved in
    pub locale: &'a Locale,
}

/// A post-processor in the plugin chain
pub trait Plugin: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Inspect or replace the current value
    fn process(&self, value: &Resolved, context: &PluginContext<'_>) -> std::result::Result<PluginOutcome, BoxError>;
}

/// Run the chain in order and return the final value
pub fn run_plugins(plugins: &[Arc<dyn Plugin>], initial: Resolved, context: &PluginContext<'_>) -> Result<Resolved> {
    let mut current = initial;
    for plugin in plugins {
        let outcome = plugin
            .process(&current, context)
            .map_err(|source| MsgBindError::Plugin {
                plugin: plugin.name().to_string(),
                interface: context.interface.to_string(),
                method: context.method.to_string(),
                source,
            })?;

        match outcome {
            PluginOutcome::PassOn(next) => current = next,
            PluginOutcome::Interrupt(last) => {
                debug!(plugin = plugin.name(), method = %context.method, "Plugin interrupted the chain");
                return Ok(last);
            }
            PluginOutcome::Abstain => {}
        }
    }
    Ok(current)
}
