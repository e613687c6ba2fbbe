use irc_phpdoc::error::ConfigError;
use irc_phpdoc::php::{ManualKind, ManualSource, ManualSourceConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

fn fixture(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(rel)
}

fn local_source(kind: ManualKind, path: PathBuf) -> ManualSource {
    let config = ManualSourceConfig::new(kind, Some(path.to_str().unwrap()), "en");
    ManualSource::from_config(&config).unwrap()
}

#[test]
fn many_files_finds_strlen() {
    let source = local_source(ManualKind::ManyFiles, fixture("many"));
    let entry = source.find_function("strlen").unwrap();
    assert_eq!(entry.name, "strlen");
    assert_eq!(entry.synopsis, "strlen(string $string): int");
    assert_eq!(entry.description, "Get string length");
}

#[test]
fn many_files_normalizes_the_query() {
    let source = local_source(ManualKind::ManyFiles, fixture("many"));
    let entry = source.find_function(" Array_Key_Exists() ").unwrap();
    assert_eq!(entry.name, " Array_Key_Exists() ");
    assert_eq!(entry.synopsis, "array_key_exists(string|int $key, array $array): bool");
    assert_eq!(entry.description, "Checks if the given key or index exists in the array");
}

#[test]
fn many_files_missing_page_or_section_is_absent() {
    let source = local_source(ManualKind::ManyFiles, fixture("many"));
    assert_eq!(source.find_function("strpos"), None);
    // The page exists but has no synopsis.
    assert_eq!(source.find_function("print_r"), None);
}

#[test]
fn many_files_never_reads_outside_the_directory() {
    let root = tempfile::tempdir().unwrap();
    let manual_dir = root.path().join("manual");
    fs::create_dir(&manual_dir).unwrap();
    fs::write(root.path().join("hidden.x.html"), r#"<div id="hidden.x">
        <div class="refnamediv"><p class="refpurpose"><span class="dc-title">Not part of the manual</span></p></div>
        <div class="methodsynopsis dc-description">hidden()</div>
    </div>"#).unwrap();
    let source = local_source(ManualKind::ManyFiles, manual_dir);

    let absolute = format!("{}/hidden::x", root.path().display());
    assert_eq!(source.find_function(&absolute), None);
    assert_eq!(source.find_function("../hidden::x"), None);
}

#[test]
fn single_file_answers_for_each_entry() {
    let source = local_source(ManualKind::SingleFile, fixture("single/php_manual_en.html"));

    let strlen = source.find_function("strlen").unwrap();
    assert_eq!(strlen.synopsis, "strlen(string $string): int");
    assert_eq!(strlen.description, "Get string length");

    let replace = source.find_function("str_replace").unwrap();
    assert_eq!(replace.synopsis,
               "str_replace( array|string $search, array|string $replace, string|array $subject, int &$count = null): string|array");
    assert_eq!(replace.description, "Replace all occurrences of the search string with the replacement string");

    let construct = source.find_function("SplStack::__construct").unwrap();
    assert_eq!(construct.synopsis, "public SplStack::__construct()");
    assert_eq!(construct.description, "Constructs a new stack implemented using a doubly linked list");

    assert_eq!(source.find_function("array_key_exists"), None);
}

#[test]
fn single_file_is_read_per_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manual.html");
    fs::write(&path, "<html><body></body></html>").unwrap();
    let source = local_source(ManualKind::SingleFile, path.clone());
    assert_eq!(source.find_function("strlen"), None);

    fs::copy(fixture("single/php_manual_en.html"), &path).unwrap();
    assert!(source.find_function("strlen").is_some());

    // Gone after construction: just no results.
    fs::remove_file(&path).unwrap();
    assert_eq!(source.find_function("strlen"), None);
}

#[test]
fn extracted_text_is_clean() {
    let source = local_source(ManualKind::SingleFile, fixture("single/php_manual_en.html"));
    for name in ["strlen", "str_replace", "SplStack::__construct"] {
        let entry = source.find_function(name).unwrap();
        for text in [&entry.synopsis, &entry.description] {
            assert!(!text.contains('<') && !text.contains('>'), "{:?}", text);
            assert!(!text.contains('\n'), "{:?}", text);
            assert!(!text.chars().zip(text.chars().skip(1)).any(|(a, b)| a.is_whitespace() && b.is_whitespace()),
                    "{:?}", text);
        }
    }
}

#[test]
fn many_files_rejects_a_file_at_construction() {
    let config = ManualSourceConfig::new(ManualKind::ManyFiles,
                                         Some(fixture("single/php_manual_en.html").to_str().unwrap()), "en");
    assert!(matches!(ManualSource::from_config(&config), Err(ConfigError::NotADirectory(_))));
}

#[test]
fn single_file_rejects_a_directory_at_construction() {
    let config = ManualSourceConfig::new(ManualKind::SingleFile, Some(fixture("many").to_str().unwrap()), "en");
    assert!(matches!(ManualSource::from_config(&config), Err(ConfigError::NotAFile(_))));
}

#[test]
fn local_manuals_need_an_existing_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nowhere");
    for kind in [ManualKind::SingleFile, ManualKind::ManyFiles] {
        let config = ManualSourceConfig::new(kind, Some(missing.to_str().unwrap()), "en");
        assert!(ManualSource::from_config(&config).is_err());
        let config = ManualSourceConfig::new(kind, None, "en");
        assert!(matches!(ManualSource::from_config(&config), Err(ConfigError::MissingPath(k)) if k == kind));
    }
}

#[test]
fn online_manual_found_and_not_found() {
    let mut server = mockito::Server::new();
    let page = fs::read_to_string(fixture("many/function.strlen.html")).unwrap();
    let found = server.mock("GET", "/en/function.strlen.php")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(page)
        .create();
    let missing = server.mock("GET", "/en/function.nope.php")
        .with_status(404)
        .with_body("<html><body>Not Found</body></html>")
        .create();

    let config = ManualSourceConfig::new(ManualKind::Online, Some(&format!("{}/", server.url())), "en");
    let source = ManualSource::from_config(&config).unwrap();

    let entry = source.find_function("strlen()").unwrap();
    assert_eq!(entry.synopsis, "strlen(string $string): int");
    assert_eq!(source.find_function("nope"), None);

    found.assert();
    missing.assert();
}

#[test]
fn online_manual_search_page_is_absent() {
    let mut server = mockito::Server::new();
    // Unknown functions land on a search page with a 200.
    let search = server.mock("GET", "/fr/function.strlenn.php")
        .with_status(200)
        .with_body("<html><body><div id=\"quickref-results\">strlen</div></body></html>")
        .create();

    let config = ManualSourceConfig::new(ManualKind::Online, Some(&server.url()), "fr");
    let source = ManualSource::from_config(&config).unwrap();
    assert_eq!(source.find_function("strlenn"), None);
    search.assert();
}

#[test]
fn concurrent_lookups_share_one_source() {
    let source = Arc::new(local_source(ManualKind::ManyFiles, fixture("many")));
    let workers: Vec<_> = (0..8).map(|i| {
        let source = source.clone();
        thread::spawn(move || {
            let name = if i % 2 == 0 { "strlen" } else { "array_key_exists" };
            source.find_function(name).map(|e| e.description)
        })
    }).collect();
    for (i, worker) in workers.into_iter().enumerate() {
        let expected = if i % 2 == 0 { "Get string length" } else { "Checks if the given key or index exists in the array" };
        assert_eq!(worker.join().unwrap().as_deref(), Some(expected));
    }
}
