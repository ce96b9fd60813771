//! Template formatters

use crate::locale::Locale;
use crate::value::Value;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use msgbind_common::BoxError;
use tracing::warn;

/// Interpolates call arguments into a template
pub trait MessageFormatter: Send + Sync {
    /// Produce the final text
    fn format(&self, template: &str, args: &[Value], locale: &Locale) -> Result<String, BoxError>;
}

impl<F> MessageFormatter for F
where
    F: Fn(&str, &[Value], &Locale) -> Result<String, BoxError> + Send + Sync,
{
    fn format(&self, template: &str, args: &[Value], locale: &Locale) -> Result<String, BoxError> {
        self(template, args, locale)
    }
}

/// Positional formatter: `{0}`, `{1,number}`, `''` and `'quoted'` sections
///
/// A placeholder whose index has no argument is emitted unchanged. Format
/// types after the comma are accepted and ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexedFormatter;

impl MessageFormatter for IndexedFormatter {
    fn format(&self, template: &str, args: &[Value], _locale: &Locale) -> Result<String, BoxError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        let mut quoted = false;

        while let Some(c) = chars.next() {
            match c {
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    out.push('\'');
                }
                '\'' => quoted = !quoted,
                '{' if !quoted => {
                    let body = read_placeholder(&mut chars)?;
                    let index_text = body.split(',').next().unwrap_or_default().trim();
                    let index: usize = index_text
                        .parse()
                        .map_err(|_| format!("invalid argument index '{index_text}'"))?;
                    match args.get(index) {
                        Some(arg) => out.push_str(&arg.display_string()?),
                        None => {
                            out.push('{');
                            out.push_str(&body);
                            out.push('}');
                        }
                    }
                }
                other => out.push(other),
            }
        }

        if quoted {
            warn!(template, "Unterminated quoted section in message template");
        }
        Ok(out)
    }
}

/// Consume up to the matching `}` and return the placeholder body
fn read_placeholder(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<String, BoxError> {
    let mut body = String::new();
    let mut depth = 1;
    for c in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(body);
                }
            }
            _ => {}
        }
        body.push(c);
    }
    Err(format!("unmatched '{{' in placeholder '{{{body}'").into())
}

/// Formatter backed by `fluent-bundle`
///
/// The template is parsed as the value of a single Fluent message, with the
/// call arguments exposed as `$arg0`, `$arg1` and so on. This gives access
/// to Fluent selectors such as plural categories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FluentFormatter;

const MESSAGE_ID: &str = "msg";

impl MessageFormatter for FluentFormatter {
    fn format(&self, template: &str, args: &[Value], locale: &Locale) -> Result<String, BoxError> {
        if template.trim().is_empty() {
            return Ok(template.to_string());
        }

        let source = format!("{MESSAGE_ID} = {}\n", template.replace('\n', "\n    "));
        let resource = FluentResource::try_new(source)
            .map_err(|(_, errors)| format!("invalid Fluent template: {errors:?}"))?;

        let mut bundle = FluentBundle::new(vec![locale.to_language_identifier()?]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| format!("failed to add Fluent resource: {errors:?}"))?;

        let mut fluent_args = FluentArgs::new();
        for (index, arg) in args.iter().enumerate() {
            fluent_args.set(format!("arg{index}"), fluent_value(arg)?);
        }

        let message = bundle
            .get_message(MESSAGE_ID)
            .ok_or("Fluent template produced no message")?;
        let pattern = message.value().ok_or("Fluent template has no value")?;

        let mut errors = Vec::new();
        let formatted = bundle.format_pattern(pattern, Some(&fluent_args), &mut errors);
        if !errors.is_empty() {
            return Err(format!("Fluent formatting errors: {errors:?}").into());
        }
        Ok(formatted.into_owned())
    }
}

fn fluent_value(value: &Value) -> Result<FluentValue<'static>, BoxError> {
    Ok(match value {
        Value::Int(i) => FluentValue::from(*i),
        Value::Float(f) => FluentValue::from(*f),
        Value::Null => FluentValue::None,
        other => FluentValue::from(other.display_string()?),
    })
}
