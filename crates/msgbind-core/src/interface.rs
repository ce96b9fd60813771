//! Declarative description of message interfaces and their methods

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Identity of a message interface: a dotted scope plus a simple name
///
/// `com.app.Greeter` has scope `com.app` and name `Greeter`. Rust paths
/// (`app::messages::Greeter`) are accepted and normalised to dotted form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageInterfaceId {
    scope: String,
    name: String,
}

impl MessageInterfaceId {
    /// Create an id from a fully qualified name
    pub fn new(qualified: impl AsRef<str>) -> Self {
        let normalized = normalize_path(qualified.as_ref());
        match normalized.rsplit_once('.') {
            Some((scope, name)) => Self {
                scope: scope.to_string(),
                name: name.to_string(),
            },
            None => Self {
                scope: String::new(),
                name: normalized,
            },
        }
    }

    /// The declaring namespace
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The simple name, without scope
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope and name joined with `.`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.scope.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.scope, self.name)
        }
    }
}

impl fmt::Display for MessageInterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

impl From<&str> for MessageInterfaceId {
    fn from(qualified: &str) -> Self {
        Self::new(qualified)
    }
}

/// Replace Rust path separators with dots and drop generic arguments
pub(crate) fn normalize_path(path: &str) -> String {
    let without_generics = path.split('<').next().unwrap_or_default();
    without_generics.trim().replace("::", ".")
}

/// Identity of one method: name plus ordered parameter type names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId {
    name: String,
    params: Vec<String>,
}

impl MethodId {
    /// A method without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// A method with the given parameter types
    pub fn with_params<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// The method name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter type names
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// A locale-bound marker or parameter marker, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationKind(String);

impl AnnotationKind {
    /// Create a kind from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The kind's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether the name can be used as a binding key
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let mut chars = self.0.chars();
        matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == ':')
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AnnotationKind {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Where the text of a translation comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// Text written in the declaration
    Inline(String),
    /// Text read from a URL
    Url(String),
    /// Text read from a path relative to the resource root
    Internal(String),
}

impl TextSource {
    /// Identifier used in error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Inline(_) => "<inline>".to_string(),
            Self::Url(url) => url.clone(),
            Self::Internal(path) => path.clone(),
        }
    }
}

/// One annotation-declared translation on a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Annotation naming the translation's locale
    pub kind: AnnotationKind,
    /// Where the text comes from
    pub source: TextSource,
    /// Raw text is returned as-is, without argument formatting
    pub raw: bool,
}

/// What a message method returns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReturnKind {
    /// A formatted string
    #[default]
    Text,
    /// Every declared translation, tagged with the current one
    MultiLocale,
    /// Another message interface
    Nested(MessageInterfaceId),
}

/// Declaration of one message method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Name and parameter types
    pub id: MethodId,
    /// Explicit bundle key segment
    pub key: Option<String>,
    /// Translations in declaration order
    pub translations: Vec<Translation>,
    /// Marker kinds per parameter position, in declaration order
    pub param_annotations: Vec<Vec<AnnotationKind>>,
    /// Shape of the resolved value
    pub returns: ReturnKind,
    /// The self-description method that falls back to the delegating value
    pub identity: bool,
}

impl MethodDecl {
    /// Declare a method with no parameters yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MethodId::new(name),
            key: None,
            translations: Vec::new(),
            param_annotations: Vec::new(),
            returns: ReturnKind::Text,
            identity: false,
        }
    }

    /// Declare the identity method of a nested interface
    pub fn identity(name: impl Into<String>) -> Self {
        Self {
            identity: true,
            ..Self::new(name)
        }
    }

    /// Add an unannotated parameter
    #[must_use]
    pub fn param(self, type_name: impl Into<String>) -> Self {
        self.param_annotated(type_name, Vec::<AnnotationKind>::new())
    }

    /// Add a parameter carrying marker annotations
    #[must_use]
    pub fn param_annotated<I, A>(mut self, type_name: impl Into<String>, annotations: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AnnotationKind>,
    {
        let mut params = self.id.params.clone();
        params.push(type_name.into());
        self.id = MethodId::with_params(self.id.name.clone(), params);
        self.param_annotations
            .push(annotations.into_iter().map(Into::into).collect());
        self
    }

    /// Set the explicit bundle key segment
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add an inline translation under an annotation kind
    #[must_use]
    pub fn translation(self, kind: impl Into<AnnotationKind>, text: impl Into<String>) -> Self {
        self.translation_from(kind, TextSource::Inline(text.into()), false)
    }

    /// Add an inline translation that is never formatted
    #[must_use]
    pub fn raw_translation(self, kind: impl Into<AnnotationKind>, text: impl Into<String>) -> Self {
        self.translation_from(kind, TextSource::Inline(text.into()), true)
    }

    /// Add a translation from any source
    #[must_use]
    pub fn translation_from(mut self, kind: impl Into<AnnotationKind>, source: TextSource, raw: bool) -> Self {
        self.translations.push(Translation {
            kind: kind.into(),
            source,
            raw,
        });
        self
    }

    /// Return all translations instead of the current one
    #[must_use]
    pub fn multi_locale(mut self) -> Self {
        self.returns = ReturnKind::MultiLocale;
        self
    }

    /// Return a nested message interface
    #[must_use]
    pub fn returns_nested(mut self, interface: impl Into<MessageInterfaceId>) -> Self {
        self.returns = ReturnKind::Nested(interface.into());
        self
    }
}

/// Declaration of a message interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    /// Qualified interface name
    pub id: MessageInterfaceId,
    /// Key annotation shared by all methods
    pub key: Option<String>,
    /// Direct parents, searched breadth-first
    pub extends: Vec<Arc<InterfaceDecl>>,
    /// Methods declared here
    pub methods: Vec<MethodDecl>,
}

impl InterfaceDecl {
    /// Declare an interface by its qualified name
    pub fn new(qualified: impl AsRef<str>) -> Self {
        Self {
            id: MessageInterfaceId::new(qualified),
            key: None,
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the key annotation
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a super-interface
    #[must_use]
    pub fn extends(mut self, parent: Arc<Self>) -> Self {
        self.extends.push(parent);
        self
    }

    /// Add a method
    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// This interface followed by its super-interfaces, breadth-first
    #[must_use]
    pub fn ancestry(&self) -> Vec<&Self> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([self]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(&current.id) {
                continue;
            }
            order.push(current);
            queue.extend(current.extends.iter().map(AsRef::as_ref));
        }
        order
    }

    /// Find a method and the interface that declares it
    #[must_use]
    pub fn find_method(&self, id: &MethodId) -> Option<(&Self, &MethodDecl)> {
        self.ancestry().into_iter().find_map(|decl| {
            decl.methods
                .iter()
                .find(|method| &method.id == id)
                .map(|method| (decl, method))
        })
    }

    /// Every callable method with its declaring interface
    ///
    /// A method redeclared on a sub-interface hides the inherited one.
    #[must_use]
    pub fn all_methods(&self) -> Vec<(&Self, &MethodDecl)> {
        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        for decl in self.ancestry() {
            for method in &decl.methods {
                if seen.insert(&method.id) {
                    methods.push((decl, method));
                }
            }
        }
        methods
    }
}
