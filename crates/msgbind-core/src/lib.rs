//! # msgbind Core
//!
//! Resolves message calls (an interface, a method, a locale and arguments)
//! into locale-appropriate text. Translation sources are composed along a
//! scoped configuration tree:
//!
//! - Locale matching with a single process-default retry
//! - Configuration nodes scoped by dotted namespace, child overriding parent
//! - Custom per-locale implementations, resource bundles and annotation texts
//! - Argument filters and a post-processing plugin chain
//!
//! # Example
//!
//! ```rust
//! use msgbind_core::{
//!     ConfigurationNode, InterfaceDecl, Locale, MessageContext, MethodDecl, MethodId, Module,
//! };
//!
//! struct Messages;
//!
//! impl Module for Messages {
//!     fn configure(&self, node: &mut ConfigurationNode) -> msgbind_common::Result<()> {
//!         node.bind(
//!             InterfaceDecl::new("app.Greeter")
//!                 .method(MethodDecl::new("greet").param("String").translation("En", "Hello, {0}!")),
//!         );
//!         Ok(())
//!     }
//! }
//!
//! # fn example() -> msgbind_common::Result<()> {
//! let mut context = MessageContext::new();
//! context.configure(Messages)?;
//!
//! let text = context.resolve_text(
//!     &"app.Greeter".into(),
//!     &MethodId::with_params("greet", ["String"]),
//!     &["World".into()],
//!     Some(&Locale::language_only("en")),
//! )?;
//! assert_eq!(text, "Hello, World!");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod builtin;
pub mod bundle;
pub mod chain;
pub mod composed;
pub mod context;
pub mod filter;
pub mod format;
pub mod implementation;
pub mod inspect;
pub mod interface;
pub mod key;
pub mod locale;
pub mod mapping;
pub mod matcher;
pub mod node;
pub mod plugin;
pub mod resource;
pub mod unit;
pub mod untranslated;
pub mod value;

pub use bundle::{BundleBinding, BundleLoader, Charset, NoBundles};
pub use chain::resolve_chain;
pub use composed::ComposedModule;
pub use context::MessageContext;
pub use filter::{ArgFilter, FilterKey, FilterProvider};
pub use format::{FluentFormatter, IndexedFormatter, MessageFormatter};
pub use implementation::{default_factory, shared_factory, ImplFactory, MessageImpl};
pub use inspect::{coverage, CoverageReport, MethodCoverage};
pub use interface::{
    AnnotationKind, InterfaceDecl, MessageInterfaceId, MethodDecl, MethodId, ReturnKind, TextSource, Translation,
};
pub use key::compute_bundle_key;
pub use locale::Locale;
pub use mapping::{EnumMessages, MessageEnum};
pub use matcher::LocaleMatcher;
pub use node::{ConfigurationNode, LocaleProvider, Module};
pub use plugin::{Plugin, PluginContext, PluginOutcome};
pub use resource::{NoResources, ResourceReader};
pub use unit::{Template, TranslationUnit};
pub use untranslated::{DefaultUntranslatedRenderer, UntranslatedMessage, UntranslatedRenderer};
pub use value::{ArgObject, LocalizedMessages, NestedMessage, Resolved, Value};
