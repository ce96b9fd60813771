//! Integration tests for file-backed bundles and resources

use msgbind_bundle::{FsResourceReader, PropertiesBundleLoader};
use msgbind_common::test_utils::{create_temp_dir, init_test_logging, write_fixture};
use msgbind_common::MsgBindError;
use msgbind_core::{
    BundleLoader, Charset, ConfigurationNode, InterfaceDecl, Locale, MessageContext, MessageInterfaceId, MethodDecl,
    MethodId, TextSource,
};

fn greeter() -> InterfaceDecl {
    InterfaceDecl::new("com.app.Greeter")
        .key("greeter")
        .method(MethodDecl::new("greet").param("String").translation("En", "Hello, {0}!"))
        .method(MethodDecl::new("bye").translation("En", "Bye"))
}

#[test]
fn test_properties_bundle_resolution() {
    init_test_logging();
    let dir = create_temp_dir();
    write_fixture(dir.path(), "app/messages.properties", "greeter.bye = Goodbye\n");
    write_fixture(dir.path(), "app/messages_ru.properties", "greeter.greet = Привет, {0}!\n");
    write_fixture(
        dir.path(),
        "app/messages_ru_RU.properties",
        "# regional overrides\ngreeter.bye = До \\\n    свидания\n",
    );

    let mut root = ConfigurationNode::new("root", "");
    root.bind(greeter());
    root.bind_bundle("app.messages").to_all().unwrap();

    let mut context = MessageContext::new()
        .with_system_locale(Locale::language_only("en"))
        .with_bundle_loader(PropertiesBundleLoader::new(dir.path()));
    context.configure_node(root).unwrap();

    let interface = MessageInterfaceId::new("com.app.Greeter");
    let russia = Locale::with_region("ru", "RU");

    let greet = context
        .resolve_text(&interface, &MethodId::with_params("greet", ["String"]), &["Мир".into()], Some(&russia))
        .unwrap();
    assert_eq!(greet, "Привет, Мир!");

    let bye = context
        .resolve_text(&interface, &MethodId::new("bye"), &[], Some(&russia))
        .unwrap();
    assert_eq!(bye, "До свидания");

    // The base bundle wins over the annotation for any locale
    let english = context
        .resolve_text(&interface, &MethodId::new("bye"), &[], Some(&Locale::language_only("en")))
        .unwrap();
    assert_eq!(english, "Goodbye");
}

#[test]
fn test_latin1_bundles_and_key_listing() {
    let dir = create_temp_dir();
    write_fixture(dir.path(), "legacy.properties", b"a=1\n".as_slice());
    write_fixture(dir.path(), "legacy_de.properties", b"b=Gr\xfc\xdfe\n".as_slice());

    let loader = PropertiesBundleLoader::new(dir.path());
    let german = Locale::language_only("de");

    assert_eq!(
        loader.lookup("legacy", Charset::Latin1, &german, "b").unwrap().as_deref(),
        Some("Grüße")
    );
    assert_eq!(
        loader.list_keys("legacy", Charset::Latin1, &german).unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );

    // Not valid UTF-8
    let error = loader.lookup("legacy", Charset::Utf8, &german, "b").unwrap_err();
    assert!(matches!(error, MsgBindError::BundleLoad { .. }));
}

#[test]
fn test_file_resources() {
    init_test_logging();
    let dir = create_temp_dir();
    write_fixture(dir.path(), "texts/welcome.txt", "Welcome, {0}");
    write_fixture(dir.path(), "remote/notice.txt", "Read the notice");

    let notice_url = url::Url::from_file_path(dir.path().join("remote/notice.txt")).unwrap();
    let mut root = ConfigurationNode::new("root", "");
    root.bind(
        InterfaceDecl::new("com.app.Pages")
            .method(MethodDecl::new("welcome").param("String").translation_from(
                "En",
                TextSource::Internal("texts/welcome.txt".to_string()),
                false,
            ))
            .method(MethodDecl::new("notice").translation_from("En", TextSource::Url(notice_url.to_string()), false))
            .method(MethodDecl::new("escape").translation_from(
                "En",
                TextSource::Internal("../outside.txt".to_string()),
                false,
            )),
    );

    let mut context = MessageContext::new().with_resource_reader(FsResourceReader::new(dir.path()));
    context.configure_node(root).unwrap();
    let pages = MessageInterfaceId::new("com.app.Pages");
    let en = Locale::language_only("en");

    let welcome = context
        .resolve_text(&pages, &MethodId::with_params("welcome", ["String"]), &["Eve".into()], Some(&en))
        .unwrap();
    assert_eq!(welcome, "Welcome, Eve");

    let notice = context
        .resolve_text(&pages, &MethodId::new("notice"), &[], Some(&en))
        .unwrap();
    assert_eq!(notice, "Read the notice");

    let error = context
        .resolve(&pages, &MethodId::new("escape"), &[], Some(&en))
        .unwrap_err();
    assert!(matches!(error, MsgBindError::ResourceAccess { .. }));
}
