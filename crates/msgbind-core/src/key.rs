//! Bundle key computation

use crate::interface::{InterfaceDecl, MethodDecl};

/// Separator between key segments and between prefix and key
pub const KEY_SEPARATOR: char = '.';

/// Marks a key segment as absolute
pub const ABSOLUTE_MARKER: char = '/';

/// Compute the resource-bundle key of a method
///
/// With a key annotation on the declaring interface or one of its ancestors
/// (searched breadth-first), the key is `<ancestor key>.<segment>`, where the
/// segment is the method key or the method name. A segment starting with `/`
/// is absolute and discards the ancestor key. When only the method carries a
/// key, that key is used alone. Without any key annotation the key is the
/// qualified interface name, the method name and the simple parameter type
/// names joined by `_`.
///
/// A non-empty `prefix` is always prepended.
#[must_use]
pub fn compute_bundle_key(declaring: &InterfaceDecl, method: &MethodDecl, prefix: &str) -> String {
    let ancestor_key = declaring
        .ancestry()
        .into_iter()
        .find_map(|decl| decl.key.as_deref());

    let key = match (ancestor_key, method.key.as_deref()) {
        (_, Some(segment)) if segment.starts_with(ABSOLUTE_MARKER) => {
            segment.trim_start_matches(ABSOLUTE_MARKER).to_string()
        }
        (Some(ancestor), segment) => {
            let ancestor = ancestor.trim_start_matches(ABSOLUTE_MARKER);
            let segment = segment.unwrap_or_else(|| method.id.name());
            format!("{ancestor}{KEY_SEPARATOR}{segment}")
        }
        (None, Some(segment)) => segment.to_string(),
        (None, None) => default_key(declaring, method),
    };

    if prefix.is_empty() {
        key
    } else {
        format!("{prefix}{KEY_SEPARATOR}{key}")
    }
}

fn default_key(declaring: &InterfaceDecl, method: &MethodDecl) -> String {
    let mut key = format!(
        "{}{KEY_SEPARATOR}{}",
        declaring.id.qualified_name(),
        method.id.name()
    );
    for param in method.id.params() {
        key.push('_');
        key.push_str(simple_type_name(param));
    }
    key
}

/// Last segment of a dotted or Rust-style type path
fn simple_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit(['.', ':']).next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_default_key() {
        let decl = InterfaceDecl::new("com.app.Msg");
        let method = MethodDecl::new("ok");

        assert_eq!(compute_bundle_key(&decl, &method, ""), "com.app.Msg.ok");
        assert_eq!(compute_bundle_key(&decl, &method, "x"), "x.com.app.Msg.ok");
    }

    #[test]
    fn test_default_key_with_params() {
        let decl = InterfaceDecl::new("com.app.Msg");
        let method = MethodDecl::new("greet").param("java.lang.String").param("i64");

        assert_eq!(
            compute_bundle_key(&decl, &method, ""),
            "com.app.Msg.greet_String_i64"
        );
    }

    #[test]
    fn test_interface_key() {
        let decl = InterfaceDecl::new("com.app.Msg").key("msg");

        assert_eq!(compute_bundle_key(&decl, &MethodDecl::new("ok"), ""), "msg.ok");
        assert_eq!(
            compute_bundle_key(&decl, &MethodDecl::new("ok").key("confirm"), ""),
            "msg.confirm"
        );
    }

    #[test]
    fn test_absolute_method_key() {
        let decl = InterfaceDecl::new("com.app.Msg").key("msg");
        let method = MethodDecl::new("ok").key("/common.ok");

        assert_eq!(compute_bundle_key(&decl, &method, "app"), "app.common.ok");
    }

    #[test]
    fn test_method_key_without_ancestor_key() {
        let decl = InterfaceDecl::new("com.app.Msg");
        let method = MethodDecl::new("ok").key("buttons.ok");

        assert_eq!(compute_bundle_key(&decl, &method, ""), "buttons.ok");
    }

    #[test]
    fn test_ancestor_key_breadth_first() {
        let grand = Arc::new(InterfaceDecl::new("com.app.Grand").key("grand"));
        let keyed = Arc::new(InterfaceDecl::new("com.app.Keyed").key("keyed"));
        let plain = Arc::new(InterfaceDecl::new("com.app.Plain").extends(grand));
        let decl = InterfaceDecl::new("com.app.Msg").extends(plain).extends(keyed);

        // Keyed is a direct parent, Grand is two levels up
        assert_eq!(compute_bundle_key(&decl, &MethodDecl::new("ok"), ""), "keyed.ok");
    }
}
