//! Integration tests for multilang
//!
//! These tests drive the public API the way a build host would: load a
//! manifest, resolve it, and inspect the collection and locale index that
//! downstream renderers receive.

use multilang::{manifest, CollisionPolicy, Config, FileEntry, Files, MultilangError, Resolver};
use serde_json::{json, Value};
use tempfile::TempDir;

// ==================== Test Helpers ====================

fn resolver(default: &str, locales: Vec<&str>) -> Resolver {
    Resolver::new(Config::new(default, locales).expect("config")).expect("resolver")
}

fn files(entries: Vec<(&str, FileEntry)>) -> Files {
    entries
        .into_iter()
        .map(|(name, entry)| (name.to_string(), entry))
        .collect()
}

// ==================== Merge Tests ====================

#[test]
fn test_base_metadata_flows_into_variant_but_contents_do_not() {
    let mut files = files(vec![
        ("post_en.md", FileEntry::new("B").with_meta("title", "Hi")),
        ("post_es.md", FileEntry::new("T")),
    ]);

    resolver("en", vec!["en", "es"]).resolve(&mut files).unwrap();

    assert_eq!(files["post_es.md"].get("title"), Some(&json!("Hi")));
    assert_eq!(files["post_es.md"].contents, b"T".to_vec());
}

#[test]
fn test_path_layout_inherits_from_default_document() {
    let mut files = files(vec![
        (
            "page.md",
            FileEntry::new("default").with_meta("layout", "page.hbs"),
        ),
        ("es/page.md", FileEntry::new("spanish").with_meta("title", "Página")),
    ]);

    resolver("en", vec!["en", "es"]).resolve(&mut files).unwrap();

    let es = &files["es/page.md"];
    assert_eq!(es.get("layout"), Some(&json!("page.hbs")));
    assert_eq!(es.get("title"), Some(&json!("Página")));
    assert_eq!(es.contents, b"spanish".to_vec());

    let en = &files["page.md"];
    assert!(en.get("title").is_none());
    assert_eq!(en.contents, b"default".to_vec());
}

#[test]
fn test_three_locales_with_non_english_default() {
    let mut files = files(vec![
        ("file_es.md", FileEntry::new("es").with_meta("template", "t.hbs")),
        ("file_ca.md", FileEntry::new("ca")),
        ("file_en.md", FileEntry::new("en").with_meta("template", "other.hbs")),
    ]);

    resolver("es", vec!["ca", "es", "en"])
        .resolve(&mut files)
        .unwrap();

    assert_eq!(files["file_ca.md"].get("template"), Some(&json!("t.hbs")));
    assert_eq!(files["file_en.md"].get("template"), Some(&json!("other.hbs")));

    let ca = &files["file_ca.md"];
    assert_eq!(
        ca.alt_files.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["es", "en"]
    );
    assert_eq!(ca.lang(&files, "en").unwrap().contents, b"en".to_vec());
}

// ==================== lang() Tests ====================

#[test]
fn test_lang_unknown_locale_is_an_error() {
    let mut files = files(vec![("page_en.md", FileEntry::new("x"))]);

    resolver("en", vec!["en", "es"]).resolve(&mut files).unwrap();

    let err = files["page_en.md"].lang(&files, "xx").unwrap_err();
    assert_eq!(
        err,
        MultilangError::UnknownLocale {
            locale: "xx".to_string()
        }
    );
}

// ==================== Index Tests ====================

#[test]
fn test_index_documents_are_routed_by_locale() {
    let mut files = files(vec![
        ("index.html", FileEntry::new("home").with_meta("index", true)),
        ("index_es.html", FileEntry::new("inicio").with_meta("index", true)),
    ]);

    let index = resolver("en", vec!["en", "es"]).resolve(&mut files).unwrap();

    assert_eq!(files["index.html"].path.as_deref(), Some(""));
    assert_eq!(files["es/index.html"].path.as_deref(), Some("es/"));
    assert!(!files.contains_key("index_es.html"));
    assert_eq!(index.default_locale, "en");
}

#[test]
fn test_strict_collision_policy_fails_the_run() {
    let config = Config::new("en", vec!["en", "es"])
        .unwrap()
        .with_collision_policy(CollisionPolicy::Error);
    let resolver = Resolver::new(config).unwrap();
    let mut files = files(vec![
        ("docs/index_en.html", FileEntry::new("a").with_meta("index", true)),
        ("blog/index_en.html", FileEntry::new("b").with_meta("index", true)),
    ]);

    let result = resolver.resolve(&mut files);

    assert!(matches!(
        result,
        Err(MultilangError::DestinationCollision { .. })
    ));
    assert!(files.contains_key("docs/index_en.html"));
    assert!(files.contains_key("blog/index_en.html"));
}

// ==================== Idempotence Tests ====================

#[test]
fn test_second_run_changes_nothing() {
    let mut files = files(vec![
        ("index.html", FileEntry::new("home").with_meta("index", true)),
        ("index_es.html", FileEntry::new("inicio").with_meta("index", true)),
        (
            "about_en.md",
            FileEntry::new("about").with_meta("nav", json!({"order": 2})),
        ),
        ("about_es.md", FileEntry::new("sobre")),
    ]);
    let resolver = resolver("en", vec!["en", "es"]);

    resolver.resolve(&mut files).unwrap();
    let first = files.clone();
    let keys: Vec<String> = files.keys().cloned().collect();

    resolver.resolve(&mut files).unwrap();

    assert_eq!(files.keys().cloned().collect::<Vec<_>>(), keys);
    assert_eq!(files, first);
}

// ==================== Manifest Tests ====================

#[test]
fn test_manifest_round_trip_through_disk() {
    let temp_dir = TempDir::new().expect("temp dir");
    let input = temp_dir.path().join("manifest.json");
    let output = temp_dir.path().join("resolved.json");

    std::fs::write(
        &input,
        r#"{
            "index.html":    { "contents": "<h1>Home</h1>", "index": true, "title": "Home" },
            "index_es.html": { "contents": "<h1>Inicio</h1>", "index": true },
            "about.md":      { "contents": "About", "layout": "page.hbs" },
            "es/about.md":   { "contents": "Sobre" }
        }"#,
    )
    .expect("write manifest");

    let resolver = resolver("en", vec!["en", "es"]);
    let mut files = manifest::load(&input).expect("load");
    let index = resolver.resolve(&mut files).expect("resolve");
    manifest::save(&output, &files, &index).expect("save");

    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).expect("valid json");

    assert_eq!(json["defaultLocale"], json!("en"));
    assert_eq!(json["locales"]["es"], json!(["index_es.html", "es/about.md"]));
    assert_eq!(json["files"]["es/index.html"]["path"], json!("es/"));
    assert_eq!(json["files"]["es/index.html"]["title"], json!("Home"));
    assert_eq!(json["files"]["es/index.html"]["contents"], json!("<h1>Inicio</h1>"));
    assert_eq!(json["files"]["es/about.md"]["layout"], json!("page.hbs"));
    assert_eq!(json["files"]["about.md"]["altFiles"]["es"], json!("es/about.md"));
    assert!(json["files"].get("index_es.html").is_none());
}

#[test]
fn test_manifest_load_missing_file() {
    let temp_dir = TempDir::new().expect("temp dir");
    let err = manifest::load(&temp_dir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}
