//! Placeholder text for messages without any translation

use crate::interface::{MessageInterfaceId, MethodId};
use crate::locale::Locale;
use crate::value::Value;
use msgbind_common::{quote, truncate_display};
use tracing::warn;

/// Longest rendering of a single argument, in characters
pub const MAX_ARGUMENT_DISPLAY: usize = 32;

/// A call that no source could translate
#[derive(Debug, Clone, Copy)]
pub struct UntranslatedMessage<'a> {
    /// Interface of the call
    pub interface: &'a MessageInterfaceId,
    /// Method of the call
    pub method: &'a MethodId,
    /// Original arguments
    pub args: &'a [Value],
    /// Requested locale
    pub locale: &'a Locale,
}

/// Renders the text returned for an untranslated call
pub trait UntranslatedRenderer: Send + Sync {
    /// Produce the placeholder text
    fn render(&self, message: &UntranslatedMessage<'_>) -> String;
}

impl<F> UntranslatedRenderer for F
where
    F: Fn(&UntranslatedMessage<'_>) -> String + Send + Sync,
{
    fn render(&self, message: &UntranslatedMessage<'_>) -> String {
        self(message)
    }
}

/// Renders `Simple.method("arg", 1)`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultUntranslatedRenderer;

impl UntranslatedRenderer for DefaultUntranslatedRenderer {
    fn render(&self, message: &UntranslatedMessage<'_>) -> String {
        let args = message
            .args
            .iter()
            .map(describe_argument)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}.{}({args})", message.interface.name(), message.method.name())
    }
}

/// Best-effort argument rendering; display failures show the type name
#[must_use]
pub fn describe_argument(arg: &Value) -> String {
    match arg.display_string() {
        Ok(text) => {
            let text = truncate_display(&text, MAX_ARGUMENT_DISPLAY);
            match arg {
                Value::Str(_) => quote(&text),
                _ => text,
            }
        }
        Err(error) => {
            warn!(type_name = arg.type_name(), %error, "Could not display message argument");
            format!("<{}>", arg.type_name())
        }
    }
}
