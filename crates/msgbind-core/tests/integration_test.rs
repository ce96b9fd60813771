//! Integration tests for the msgbind resolution pipeline

use msgbind_common::test_utils::init_test_logging;
use msgbind_common::{BoxError, MsgBindError, Result};
use msgbind_core::{
    coverage, shared_factory, AnnotationKind, ArgFilter, BundleLoader, Charset, ConfigurationNode, EnumMessages,
    FilterProvider, FluentFormatter, ImplFactory, InterfaceDecl, Locale, MessageContext, MessageEnum, MessageImpl,
    MessageInterfaceId, MethodDecl, MethodId, Module, Plugin, PluginContext, PluginOutcome, Resolved, TextSource,
    Value,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory bundles keyed by (bundle, locale tag)
#[derive(Default)]
struct TestBundles {
    entries: HashMap<(String, String), BTreeMap<String, String>>,
}

impl TestBundles {
    fn with(mut self, bundle: &str, locale: &str, key: &str, value: &str) -> Self {
        self.entries
            .entry((bundle.to_string(), locale.to_string()))
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl BundleLoader for TestBundles {
    fn lookup(&self, bundle: &str, _charset: Charset, locale: &Locale, key: &str) -> Result<Option<String>> {
        Ok(locale.fallback_candidates().iter().find_map(|candidate| {
            self.entries
                .get(&(bundle.to_string(), candidate.tag()))
                .and_then(|keys| keys.get(key).cloned())
        }))
    }

    fn list_keys(&self, bundle: &str, _charset: Charset, locale: &Locale) -> Result<Vec<String>> {
        Ok(self
            .entries
            .get(&(bundle.to_string(), locale.tag()))
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default())
    }
}

struct Recording {
    name: &'static str,
    outcome: fn(&Resolved) -> PluginOutcome,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Plugin for Recording {
    fn name(&self) -> &str {
        self.name
    }

    fn process(&self, value: &Resolved, context: &PluginContext<'_>) -> std::result::Result<PluginOutcome, BoxError> {
        self.seen
            .lock()
            .push(format!("{}:{}:{}", self.name, value, context.template.unwrap_or("-")));
        Ok((self.outcome)(value))
    }
}

fn id(name: &str) -> MessageInterfaceId {
    MessageInterfaceId::new(name)
}

fn en() -> Locale {
    Locale::language_only("en")
}

fn greeter() -> InterfaceDecl {
    InterfaceDecl::new("com.app.Greeter")
        .method(MethodDecl::new("greet").param("String").translation("En", "Hello, {0}!"))
        .method(MethodDecl::new("bye").translation("En", "Bye").translation("De", "Tschüss"))
}

fn greet() -> MethodId {
    MethodId::with_params("greet", ["String"])
}

fn context_with(root: ConfigurationNode) -> MessageContext {
    init_test_logging();
    let mut context = MessageContext::new().with_system_locale(Locale::language_only("ja"));
    context.configure_node(root).unwrap();
    context
}

#[test]
fn test_hello_world() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    let context = context_with(root);

    let text = context
        .resolve_text(&id("com.app.Greeter"), &greet(), &["World".into()], Some(&en()))
        .unwrap();
    assert_eq!(text, "Hello, World!");
}

#[test]
fn test_untranslated_placeholder() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    let context = context_with(root);

    let text = context
        .resolve_text(
            &id("com.app.Greeter"),
            &greet(),
            &["World".into()],
            Some(&Locale::language_only("fr")),
        )
        .unwrap();
    assert_eq!(text, "Greeter.greet(\"World\")");
}

#[test]
fn test_system_default_retry() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    init_test_logging();
    let mut context = MessageContext::new().with_system_locale(Locale::language_only("de"));
    context.configure_node(root).unwrap();

    let bye = MethodId::new("bye");
    let french = Locale::with_region("fr", "CA");
    assert_eq!(context.resolve_text(&id("com.app.Greeter"), &bye, &[], Some(&french)).unwrap(), "Tschüss");
}

#[test]
fn test_locale_provider_and_explicit_locale() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.set_fixed_locale(Locale::with_region("de", "DE"));
    let context = context_with(root);
    let bye = MethodId::new("bye");

    assert_eq!(context.resolve_text(&id("com.app.Greeter"), &bye, &[], None).unwrap(), "Tschüss");
    assert_eq!(context.resolve_text(&id("com.app.Greeter"), &bye, &[], Some(&en())).unwrap(), "Bye");
}

#[test]
fn test_chain_precedence_child_annotation_wins() {
    let mut child = ConfigurationNode::new("app", "com.app");
    child.bind_annotation("En").to_locale(Locale::language_only("fr")).unwrap();

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind(InterfaceDecl::new("org.other.Greeter").method(MethodDecl::new("bye").translation("En", "Bye")));
    root.install_node(child).unwrap();
    let context = context_with(root);
    let bye = MethodId::new("bye");
    let french = Locale::language_only("fr");

    // Inside the child's scope the annotation now means French
    assert_eq!(context.resolve_text(&id("com.app.Greeter"), &bye, &[], Some(&french)).unwrap(), "Bye");
    assert_eq!(
        context.resolve_text(&id("com.app.Greeter"), &bye, &[], Some(&en())).unwrap(),
        "Greeter.bye()"
    );
    // Outside it the builtin binding still applies
    assert_eq!(context.resolve_text(&id("org.other.Greeter"), &bye, &[], Some(&en())).unwrap(), "Bye");
}

#[test]
fn test_builtin_annotations_rank_below_project_modules() {
    struct AppMessages;

    impl Module for AppMessages {
        fn configure(&self, node: &mut ConfigurationNode) -> Result<()> {
            node.bind(InterfaceDecl::new("com.app.Greeter").method(MethodDecl::new("hello").translation("En", "Hello")));
            let mut shared = ConfigurationNode::new("shared", "com");
            shared.bind_annotation("En").to_locale(Locale::language_only("fr"))?;
            node.install_node(shared)?;
            Ok(())
        }

        fn scope(&self) -> String {
            "com.app".to_string()
        }
    }

    init_test_logging();
    let mut context = MessageContext::new().with_system_locale(Locale::language_only("de"));
    context.configure(AppMessages).unwrap();
    let greeter = id("com.app.Greeter");

    // The root is scoped deeper than its child, yet the child's binding
    // still beats the built-in En
    let composed = context.composed(&greeter).unwrap();
    assert_eq!(
        composed.annotation_locale(&AnnotationKind::new("En")),
        Some(&Locale::language_only("fr"))
    );
    assert_eq!(composed.chain().last().map(|node| node.name()), Some("builtin"));

    let text = context
        .resolve_text(&greeter, &MethodId::new("hello"), &[], Some(&Locale::language_only("fr")))
        .unwrap();
    assert_eq!(text, "Hello");
}

#[test]
fn test_concurrent_resolution_computes_once() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MessageContext>();

    let filter_builds = Arc::new(AtomicUsize::new(0));
    let impl_builds = Arc::new(AtomicUsize::new(0));

    let builds = Arc::clone(&filter_builds);
    let trim = FilterProvider::cached(move || {
        builds.fetch_add(1, Ordering::SeqCst);
        let trim = |value: Value| -> std::result::Result<Value, BoxError> { Ok(Value::from(value.to_string().trim())) };
        Arc::new(trim) as Arc<dyn ArgFilter>
    });

    let builds = Arc::clone(&impl_builds);
    let clock: ImplFactory = Arc::new(move || {
        builds.fetch_add(1, Ordering::SeqCst);
        let now = |_: &MethodId, _: &[Value]| -> std::result::Result<Value, BoxError> { Ok(Value::from("noon")) };
        Ok(Arc::new(now) as Arc<dyn MessageImpl>)
    });

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind(InterfaceDecl::new("com.app.Clock").method(MethodDecl::new("now")));
    root.bind_filter("String", trim).unannotated().unwrap();
    root.bind_impl("com.app.Clock", en(), clock);
    let context = Arc::new(context_with(root));

    let results: Vec<(String, String)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let context = Arc::clone(&context);
                scope.spawn(move || {
                    let greeting = context
                        .resolve_text(&id("com.app.Greeter"), &greet(), &["  World ".into()], Some(&en()))
                        .unwrap();
                    let time = context
                        .resolve_text(&id("com.app.Clock"), &MethodId::new("now"), &[], Some(&en()))
                        .unwrap();
                    (greeting, time)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(results.len(), 8);
    assert!(results
        .iter()
        .all(|(greeting, time)| greeting == "Hello, World!" && time == "noon"));
    assert_eq!(filter_builds.load(Ordering::SeqCst), 1);
    assert_eq!(impl_builds.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(
        &context.composed(&id("com.app.Greeter")).unwrap(),
        &context.composed(&id("com.app.Greeter")).unwrap()
    ));
}

#[test]
fn test_child_scalars_ignored() {
    let mut child = ConfigurationNode::new("app", "com.app");
    child.set_key_prefix("child");
    child.set_fixed_locale(Locale::language_only("de"));

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind_bundle("messages").to_all().unwrap();
    root.install_node(child).unwrap();

    init_test_logging();
    let bundles = TestBundles::default()
        .with("messages", "en", "com.app.Greeter.bye", "root key")
        .with("messages", "en", "child.com.app.Greeter.bye", "child key");
    let mut context = MessageContext::new()
        .with_system_locale(en())
        .with_bundle_loader(bundles);
    context.configure_node(root).unwrap();

    assert_eq!(
        context.resolve_text(&id("com.app.Greeter"), &MethodId::new("bye"), &[], None).unwrap(),
        "root key"
    );
}

#[test]
fn test_bundle_before_annotation_and_prefix() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.set_key_prefix("x");
    root.bind_bundle("messages").to(["com.app.Greeter"]).unwrap();
    init_test_logging();
    let bundles = TestBundles::default().with("messages", "", "x.com.app.Greeter.greet_String", "Hi {0} (bundle)");
    let mut context = MessageContext::new()
        .with_system_locale(en())
        .with_bundle_loader(bundles);
    context.configure_node(root).unwrap();

    let text = context
        .resolve_text(&id("com.app.Greeter"), &greet(), &["Ann".into()], Some(&en()))
        .unwrap();
    assert_eq!(text, "Hi Ann (bundle)");

    // The method without a bundle entry falls through to its annotation
    assert_eq!(
        context.resolve_text(&id("com.app.Greeter"), &MethodId::new("bye"), &[], Some(&en())).unwrap(),
        "Bye"
    );
}

#[test]
fn test_implementations_accumulate_and_bypass() {
    let filter_calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let root_impl = |_: &MethodId, _: &[Value]| -> std::result::Result<Value, BoxError> { Ok(Value::from("root-fr")) };
    let child_impl = |method: &MethodId, args: &[Value]| -> std::result::Result<Value, BoxError> {
        Ok(Value::from(format!("child-{}-{}", method.name(), args.len())))
    };

    let mut child = ConfigurationNode::new("app", "com.app");
    child.bind_impl("com.app.Greeter", en(), shared_factory(Arc::new(child_impl)));

    let counter = Arc::clone(&filter_calls);
    let counting = move |value: Value| -> std::result::Result<Value, BoxError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    };

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind_impl("com.app.Greeter", Locale::language_only("fr"), shared_factory(Arc::new(root_impl)));
    root.bind_filter("String", FilterProvider::instance(counting)).unannotated().unwrap();
    root.install_plugin(Recording {
        name: "recorder",
        outcome: |value| PluginOutcome::PassOn(value.clone()),
        seen: Arc::clone(&seen),
    });
    root.install_node(child).unwrap();
    let context = context_with(root);
    let greeter = id("com.app.Greeter");

    let english = context.resolve(&greeter, &greet(), &["x".into()], Some(&en())).unwrap();
    assert_eq!(english, Resolved::Value(Value::from("child-greet-1")));

    let french = context
        .resolve(&greeter, &greet(), &["x".into()], Some(&Locale::with_region("fr", "FR")))
        .unwrap();
    assert_eq!(french, Resolved::Value(Value::from("root-fr")));

    assert_eq!(filter_calls.load(Ordering::SeqCst), 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn test_implementation_failure_reported() {
    let failing = |_: &MethodId, _: &[Value]| -> std::result::Result<Value, BoxError> { Err("no".into()) };
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind_impl("com.app.Greeter", en(), shared_factory(Arc::new(failing)));
    let context = context_with(root);

    let error = context
        .resolve(&id("com.app.Greeter"), &MethodId::new("bye"), &[], Some(&en()))
        .unwrap_err();
    assert!(matches!(error, MsgBindError::Implementation { .. }));
}

#[test]
fn test_filters_by_annotation_and_type() {
    let upper = |value: Value| -> std::result::Result<Value, BoxError> {
        Ok(Value::from(value.to_string().to_uppercase()))
    };
    let mut root = ConfigurationNode::new("root", "");
    root.bind(
        InterfaceDecl::new("com.app.Shout").method(
            MethodDecl::new("shout")
                .param_annotated("String", ["Loud"])
                .param("String")
                .translation("En", "{0} {1}"),
        ),
    );
    root.bind_filter("String", FilterProvider::instance(upper))
        .annotated_with(["Loud"])
        .unwrap();
    let context = context_with(root);

    let text = context
        .resolve_text(
            &id("com.app.Shout"),
            &MethodId::with_params("shout", ["String", "String"]),
            &["hey".into(), "you".into()],
            Some(&en()),
        )
        .unwrap();
    assert_eq!(text, "HEY you");
}

#[test]
fn test_filter_failure_is_dispatch_error() {
    struct Failing;
    impl ArgFilter for Failing {
        fn apply(&self, _value: Value) -> std::result::Result<Value, BoxError> {
            Err("bad argument".into())
        }
    }

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind_filter("String", FilterProvider::cached(|| Arc::new(Failing) as Arc<dyn ArgFilter>))
        .unannotated()
        .unwrap();
    let context = context_with(root);

    let error = context
        .resolve(&id("com.app.Greeter"), &greet(), &["x".into()], Some(&en()))
        .unwrap_err();
    assert!(matches!(error, MsgBindError::FilterDispatch { .. }));
}

#[test]
fn test_plugin_interrupt_and_abstain() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut child = ConfigurationNode::new("app", "com.app");
    child.install_plugin(Recording {
        name: "late",
        outcome: |_| PluginOutcome::PassOn("never".into()),
        seen: Arc::clone(&seen),
    });

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.install_plugin(Recording {
        name: "abstain",
        outcome: |_| PluginOutcome::Abstain,
        seen: Arc::clone(&seen),
    });
    root.install_plugin(Recording {
        name: "stop",
        outcome: |value| PluginOutcome::Interrupt(format!("[{value}]").into()),
        seen: Arc::clone(&seen),
    });
    root.install_node(child).unwrap();
    let context = context_with(root);

    let text = context
        .resolve_text(&id("com.app.Greeter"), &greet(), &["Bob".into()], Some(&en()))
        .unwrap();
    assert_eq!(text, "[Hello, Bob!]");
    assert_eq!(
        *seen.lock(),
        vec![
            "abstain:Hello, Bob!:Hello, {0}!".to_string(),
            "stop:Hello, Bob!:Hello, {0}!".to_string()
        ]
    );
}

#[test]
fn test_idempotent_configuration() {
    struct Counting(Arc<AtomicUsize>);

    impl Module for Counting {
        fn configure(&self, node: &mut ConfigurationNode) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            node.bind(greeter());
            Ok(())
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut node = ConfigurationNode::for_module(Arc::new(Counting(Arc::clone(&calls))));
    node.do_configure().unwrap();

    let mut context = MessageContext::new();
    context.configure_node(node).unwrap();
    context.configure(Counting(Arc::clone(&calls))).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(context.interface_ids().len(), 1);
}

#[test]
fn test_nested_interface_and_identity() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(
        InterfaceDecl::new("com.app.Menu").method(
            MethodDecl::new("file")
                .translation("En", "File")
                .translation("De", "Datei")
                .returns_nested("com.app.MenuItem"),
        ),
    );
    root.bind(
        InterfaceDecl::new("com.app.MenuItem")
            .method(MethodDecl::identity("label"))
            .method(MethodDecl::new("tooltip").translation("De", "Tipp")),
    );
    let context = context_with(root);

    let german = Locale::language_only("de");
    let resolved = context
        .resolve(&id("com.app.Menu"), &MethodId::new("file"), &[], Some(&german))
        .unwrap();
    let Resolved::Nested(item) = resolved else {
        panic!("expected a nested message");
    };
    assert_eq!(item.delegate(), "Datei");
    assert_eq!(item.locale(), Some(&german));

    let label = item.call(&context, &MethodId::new("label"), &[]).unwrap();
    assert_eq!(label, Resolved::from("Datei"));

    // The explicit locale is inherited by the nested call
    let tooltip = item.call(&context, &MethodId::new("tooltip"), &[]).unwrap();
    assert_eq!(tooltip, Resolved::from("Tipp"));
}

#[test]
fn test_multi_locale_skips_plugins() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut root = ConfigurationNode::new("root", "");
    root.bind(
        InterfaceDecl::new("com.app.Langs").method(
            MethodDecl::new("name")
                .param("String")
                .translation("En", "English {0}")
                .raw_translation("De", "Deutsch {0}")
                .multi_locale(),
        ),
    );
    root.install_plugin(Recording {
        name: "recorder",
        outcome: |_| PluginOutcome::Interrupt("plugin".into()),
        seen: Arc::clone(&seen),
    });
    let context = context_with(root);

    let resolved = context
        .resolve(
            &id("com.app.Langs"),
            &MethodId::with_params("name", ["String"]),
            &["x".into()],
            Some(&Locale::with_region("de", "CH")),
        )
        .unwrap();
    let Resolved::Localized(messages) = resolved else {
        panic!("expected localized messages");
    };

    assert_eq!(messages.get(&en()), Some("English x"));
    assert_eq!(messages.get(&Locale::language_only("de")), Some("Deutsch {0}"));
    assert_eq!(messages.current(), Some((&Locale::language_only("de"), "Deutsch {0}")));
    assert!(seen.lock().is_empty());
}

#[test]
fn test_resource_translations() {
    struct Files;

    impl msgbind_core::ResourceReader for Files {
        fn read_url(&self, url: &str) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::NotFound, url.to_string()))
        }

        fn read_internal(&self, path: &str) -> io::Result<String> {
            match path {
                "texts/welcome.txt" => Ok("Welcome, {0}".to_string()),
                _ => Err(io::Error::new(io::ErrorKind::NotFound, path.to_string())),
            }
        }
    }

    let mut root = ConfigurationNode::new("root", "");
    root.bind(
        InterfaceDecl::new("com.app.Pages")
            .method(MethodDecl::new("welcome").param("String").translation_from(
                "En",
                TextSource::Internal("texts/welcome.txt".to_string()),
                false,
            ))
            .method(MethodDecl::new("broken").translation_from(
                "En",
                TextSource::Url("https://example.invalid/x".to_string()),
                false,
            )),
    );
    init_test_logging();
    let mut context = MessageContext::new().with_resource_reader(Files);
    context.configure_node(root).unwrap();
    let pages = id("com.app.Pages");

    let text = context
        .resolve_text(&pages, &MethodId::with_params("welcome", ["String"]), &["Eve".into()], Some(&en()))
        .unwrap();
    assert_eq!(text, "Welcome, Eve");

    let error = context
        .resolve(&pages, &MethodId::new("broken"), &[], Some(&en()))
        .unwrap_err();
    assert!(matches!(error, MsgBindError::ResourceAccess { .. }));
}

#[test]
fn test_fluent_formatter_plurals() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(InterfaceDecl::new("com.app.Files").method(
        MethodDecl::new("count")
            .param("i64")
            .translation("En", "{ $arg0 ->\n    [one] One file\n   *[other] { $arg0 } files\n}"),
    ));
    root.set_message_formatter(FluentFormatter);
    let context = context_with(root);
    let count = MethodId::with_params("count", ["i64"]);

    assert_eq!(
        context.resolve_text(&id("com.app.Files"), &count, &[1.into()], Some(&en())).unwrap(),
        "One file"
    );
    assert_eq!(
        context.resolve_text(&id("com.app.Files"), &count, &[4.into()], Some(&en())).unwrap(),
        "4 files"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GreeterMessage {
    Greet,
    Bye,
}

impl MessageEnum for GreeterMessage {
    fn variants() -> &'static [Self] {
        &[Self::Greet, Self::Bye]
    }

    fn variant_name(self) -> &'static str {
        match self {
            Self::Greet => "Greet",
            Self::Bye => "Bye",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BrokenMessage {
    Missing,
}

impl MessageEnum for BrokenMessage {
    fn variants() -> &'static [Self] {
        &[Self::Missing]
    }

    fn variant_name(self) -> &'static str {
        "Missing"
    }
}

#[test]
fn test_enum_mapping() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    let context = context_with(root);

    let messages = EnumMessages::<GreeterMessage>::new("com.app.Greeter");
    assert_eq!(
        messages
            .text(&context, GreeterMessage::Greet, &["Kim".into()], Some(&en()))
            .unwrap(),
        "Hello, Kim!"
    );
    assert_eq!(messages.text(&context, GreeterMessage::Bye, &[], Some(&en())).unwrap(), "Bye");

    let broken = EnumMessages::<BrokenMessage>::new("com.app.Greeter");
    let error = broken.method_for(&context, BrokenMessage::Missing).unwrap_err();
    assert!(matches!(error, MsgBindError::MappingIntegrity { .. }));
    assert!(error.to_string().contains("Missing"));
}

#[test]
fn test_coverage_report() {
    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind_bundle("messages").to_all().unwrap();
    init_test_logging();
    let bundles = TestBundles::default().with("messages", "fr", "com.app.Greeter.bye", "Au revoir");
    let mut context = MessageContext::new().with_bundle_loader(bundles);
    context.configure_node(root).unwrap();

    let report = coverage(
        &context,
        &id("com.app.Greeter"),
        &[en(), Locale::language_only("de"), Locale::language_only("fr")],
    )
    .unwrap();

    assert_eq!(report.methods.len(), 2);
    let bye = report.methods.iter().find(|m| m.method.name() == "bye").unwrap();
    assert!(bye.missing.is_empty());
    let greet = report.methods.iter().find(|m| m.method.name() == "greet").unwrap();
    assert_eq!(greet.covered.len(), 1);
    assert_eq!(report.missing_count(), 2);
    assert!(!report.is_complete());
}
