//! Call arguments and resolution results

use crate::context::MessageContext;
use crate::interface::{MessageInterfaceId, MethodId};
use crate::locale::Locale;
use msgbind_common::{BoxError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An argument type the pipeline does not know about
///
/// Display conversion may fail; callers that only need a best-effort
/// rendering (the untranslated placeholder) absorb the failure.
pub trait ArgObject: fmt::Debug + Send + Sync {
    /// Type name used for filter lookup
    fn type_name(&self) -> &str;

    /// Text used when the object is interpolated into a message
    fn to_display(&self) -> std::result::Result<String, BoxError>;
}

/// A message argument or a value returned by a custom implementation
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value, rendered as `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Single character
    Char(char),
    /// Text
    Str(String),
    /// Sequence, rendered as `[a, b]`
    List(Vec<Value>),
    /// User-defined argument type
    Object(Arc<dyn ArgObject>),
}

impl Value {
    /// Runtime type name, used as a fallback filter key
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "i64",
            Self::Float(_) => "f64",
            Self::Char(_) => "char",
            Self::Str(_) => "String",
            Self::List(_) => "List",
            Self::Object(object) => object.type_name(),
        }
    }

    /// Borrow the string payload, if any
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value for interpolation into a message
    pub fn display_string(&self) -> std::result::Result<String, BoxError> {
        match self {
            Self::Null => Ok("null".to_string()),
            Self::Bool(b) => Ok(b.to_string()),
            Self::Int(i) => Ok(i.to_string()),
            Self::Float(f) => Ok(f.to_string()),
            Self::Char(c) => Ok(c.to_string()),
            Self::Str(s) => Ok(s.clone()),
            Self::List(items) => {
                let rendered = items
                    .iter()
                    .map(Self::display_string)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", rendered.join(", ")))
            }
            Self::Object(object) => object.to_display(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_string() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "<{}>", self.type_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Translations of one method in every declared locale
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalizedMessages {
    entries: BTreeMap<Locale, String>,
    current: Option<Locale>,
}

impl LocalizedMessages {
    pub(crate) const fn new(entries: BTreeMap<Locale, String>, current: Option<Locale>) -> Self {
        Self { entries, current }
    }

    /// The entry matching the locale of the call, if any
    #[must_use]
    pub fn current(&self) -> Option<(&Locale, &str)> {
        let locale = self.current.as_ref()?;
        self.entries.get(locale).map(|text| (locale, text.as_str()))
    }

    /// The locale tagged as current
    #[must_use]
    pub const fn current_locale(&self) -> Option<&Locale> {
        self.current.as_ref()
    }

    /// The text for one locale
    #[must_use]
    pub fn get(&self, locale: &Locale) -> Option<&str> {
        self.entries.get(locale).map(String::as_str)
    }

    /// Iterate entries in locale order
    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &str)> {
        self.entries.iter().map(|(locale, text)| (locale, text.as_str()))
    }

    /// Number of locales with a translation
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no locale has a translation
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle to a message interface returned from another message method
///
/// Calls on the handle resolve against the nested interface. The text
/// computed for the enclosing method becomes the delegating value that the
/// nested interface's identity method falls back to.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedMessage {
    interface: MessageInterfaceId,
    delegate: String,
    locale: Option<Locale>,
}

impl NestedMessage {
    pub(crate) const fn new(interface: MessageInterfaceId, delegate: String, locale: Option<Locale>) -> Self {
        Self {
            interface,
            delegate,
            locale,
        }
    }

    /// The nested interface
    #[must_use]
    pub const fn interface(&self) -> &MessageInterfaceId {
        &self.interface
    }

    /// Text computed for the enclosing method
    #[must_use]
    pub fn delegate(&self) -> &str {
        &self.delegate
    }

    /// The explicit locale inherited from the enclosing call
    #[must_use]
    pub const fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Resolve a method of the nested interface
    pub fn call(&self, context: &MessageContext, method: &MethodId, args: &[Value]) -> Result<Resolved> {
        context.resolve_nested(self, method, args)
    }
}

/// Final value of one resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// A formatted message
    Text(String),
    /// All translations of a multi-locale method
    Localized(LocalizedMessages),
    /// A nested message interface
    Nested(NestedMessage),
    /// A value returned verbatim by a custom implementation
    Value(Value),
}

impl Resolved {
    /// Borrow the text of a [`Resolved::Text`]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Take the text of a [`Resolved::Text`]
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Localized(messages) => match messages.current() {
                Some((_, text)) => f.write_str(text),
                None => Ok(()),
            },
            Self::Nested(nested) => f.write_str(nested.delegate()),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Resolved {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Resolved {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Broken;

    impl ArgObject for Broken {
        fn type_name(&self) -> &str {
            "Broken"
        }

        fn to_display(&self) -> std::result::Result<String, BoxError> {
            Err("cannot display".into())
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from("x").type_name(), "String");
        assert_eq!(Value::from(3).type_name(), "i64");
        assert_eq!(Value::Object(Arc::new(Broken)).type_name(), "Broken");
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::from(vec![1, 2]).display_string().unwrap(), "[1, 2]");
        assert!(Value::Object(Arc::new(Broken)).display_string().is_err());
        assert_eq!(Value::Object(Arc::new(Broken)).to_string(), "<Broken>");
    }

    #[test]
    fn test_localized_current() {
        let mut entries = BTreeMap::new();
        entries.insert(Locale::language_only("en"), "Hi".to_string());
        entries.insert(Locale::language_only("de"), "Hallo".to_string());
        let messages = LocalizedMessages::new(entries, Some(Locale::language_only("de")));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages.current(), Some((&Locale::language_only("de"), "Hallo")));
        assert_eq!(Resolved::Localized(messages).to_string(), "Hallo");
    }
}
