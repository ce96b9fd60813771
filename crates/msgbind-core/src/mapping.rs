//! Enum-keyed access to the methods of a message interface

use crate::context::MessageContext;
use crate::interface::{MessageInterfaceId, MethodId};
use crate::locale::Locale;
use crate::value::{Resolved, Value};
use msgbind_common::{MsgBindError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// An enum whose variants name message methods
pub trait MessageEnum: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every variant
    fn variants() -> &'static [Self];

    /// Variant name as written in the enum
    fn variant_name(self) -> &'static str;
}

/// Maps the variants of `E` onto methods of one interface
///
/// A variant matches a method named exactly like it, or named like it in
/// `snake_case` or `lowerCamelCase`. The mapping is built and checked on
/// first use; a variant without a method is a mapping integrity error.
pub struct EnumMessages<E: MessageEnum> {
    interface: MessageInterfaceId,
    methods: OnceCell<HashMap<E, MethodId>>,
}

impl<E: MessageEnum> EnumMessages<E> {
    /// Mapping onto the methods of `interface`
    pub fn new(interface: impl Into<MessageInterfaceId>) -> Self {
        Self {
            interface: interface.into(),
            methods: OnceCell::new(),
        }
    }

    /// Interface the variants map onto
    #[must_use]
    pub const fn interface(&self) -> &MessageInterfaceId {
        &self.interface
    }

    /// The method a variant maps to
    pub fn method_for(&self, context: &MessageContext, variant: E) -> Result<&MethodId> {
        let methods = self.methods.get_or_try_init(|| self.build(context))?;
        methods.get(&variant).ok_or_else(|| {
            MsgBindError::mapping_integrity(
                self.interface.to_string(),
                format!("variant {variant:?} is not listed by its enum"),
            )
        })
    }

    /// Resolve the method of `variant`
    pub fn resolve(&self, context: &MessageContext, variant: E, args: &[Value], locale: Option<&Locale>) -> Result<Resolved> {
        let method = self.method_for(context, variant)?;
        context.resolve(&self.interface, method, args, locale)
    }

    /// Resolve the method of `variant` as text
    pub fn text(&self, context: &MessageContext, variant: E, args: &[Value], locale: Option<&Locale>) -> Result<String> {
        Ok(self.resolve(context, variant, args, locale)?.to_string())
    }

    fn build(&self, context: &MessageContext) -> Result<HashMap<E, MethodId>> {
        let decl = context.interface(&self.interface).ok_or_else(|| {
            MsgBindError::mapping_integrity(self.interface.to_string(), "interface is not bound")
        })?;

        let mut by_name: HashMap<&str, Vec<&MethodId>> = HashMap::new();
        for (_, method) in decl.all_methods() {
            by_name.entry(method.id.name()).or_default().push(&method.id);
        }

        let mut mapping = HashMap::new();
        for &variant in E::variants() {
            let name = variant.variant_name();
            let candidates = [name.to_string(), to_snake_case(name), to_lower_camel_case(name)];
            let found = candidates
                .iter()
                .find_map(|candidate| by_name.get(candidate.as_str()));

            match found.map(Vec::as_slice) {
                Some([method]) => {
                    mapping.insert(variant, (*method).clone());
                }
                Some(overloads) => {
                    return Err(MsgBindError::mapping_integrity(
                        self.interface.to_string(),
                        format!("variant {name} matches {} overloaded methods", overloads.len()),
                    ));
                }
                None => {
                    return Err(MsgBindError::mapping_integrity(
                        self.interface.to_string(),
                        format!("variant {name} has no matching method"),
                    ));
                }
            }
        }
        Ok(mapping)
    }
}

impl<E: MessageEnum> fmt::Debug for EnumMessages<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumMessages")
            .field("interface", &self.interface)
            .field("built", &self.methods.get().is_some())
            .finish()
    }
}

/// Split `FileNotFound`, `FILE_NOT_FOUND` or `file_not_found` into words
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn to_snake_case(name: &str) -> String {
    words(name).join("_")
}

fn to_lower_camel_case(name: &str) -> String {
    let mut out = String::new();
    for (index, word) in words(name).iter().enumerate() {
        if index == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
