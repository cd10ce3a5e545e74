//! End-to-end parsing of a realistic descriptor file.

use std::path::PathBuf;

use wordfile_core::{
    FontStyle, LanguageKind, Rgb, Wordfile, WordfileOrigin, WordfileRegistry,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn demo_source() -> String {
    std::fs::read_to_string(fixture_path("c-demo.wordfile")).unwrap()
}

#[test]
fn test_parse_demo_descriptor() {
    let wordfile = Wordfile::parse_strict(&demo_source()).unwrap();

    assert_eq!(wordfile.number(), 1);
    assert_eq!(wordfile.name(), "Demo C");
    assert_eq!(wordfile.kind(), LanguageKind::C);
    assert!(!wordfile.is_tag_based());

    assert_eq!(wordfile.comments().line.as_deref(), Some("//"));
    assert_eq!(wordfile.comments().block_on.as_deref(), Some("/*"));
    assert_eq!(wordfile.comments().block_off.as_deref(), Some("*/"));
    assert_eq!(wordfile.escape_char(), Some('\\'));
    assert_eq!(wordfile.string_chars(), "\"'");
    assert_eq!(wordfile.file_extensions(), ["C", "H"]);
    assert_eq!(wordfile.delimiters(), "~!@%^&*()-+=|\\/{}[]:;\"'<> ,.?");

    assert_eq!(wordfile.colors()[0], Rgb::new(0, 0, 0));
    assert_eq!(wordfile.colors()[4], Rgb::new(255, 0, 0));
    assert!(wordfile.colors_auto_back().iter().all(|b| *b));

    assert_eq!(wordfile.open_brace_strings(), ["{", "(", "["]);
    assert_eq!(wordfile.close_brace_strings(), ["}", ")", "]"]);
    assert_eq!(wordfile.open_fold_strings(), ["{"]);
    assert_eq!(wordfile.close_fold_strings(), ["}"]);
}

#[test]
fn test_parse_demo_code_formats() {
    let wordfile = Wordfile::parse_strict(&demo_source()).unwrap();
    let formats = wordfile.code_formats();
    assert_eq!(formats.len(), 3);

    let keywords = &formats[0];
    assert_eq!(keywords.name(), "Keywords");
    assert_eq!(keywords.color(), Rgb::new(0, 0, 255));
    assert_eq!(keywords.font_style(), FontStyle::Bold);
    assert!(keywords.keywords().iter().any(|k| k == "while"));
    assert!(keywords.keywords().iter().any(|k| k == "sizeof"));
    assert!(keywords.prefixes().is_empty());

    let preprocessor = &formats[1];
    assert_eq!(preprocessor.type_tag(), "PREPROCESSOR");
    assert!(preprocessor.keywords().is_empty());
    assert_eq!(preprocessor.prefixes(), ["#"]);

    let operators = &formats[2];
    assert_eq!(operators.color(), Rgb::new(255, 0, 0));
    assert!(operators.keywords().iter().any(|k| k == "=="));
    assert!(operators.keywords().iter().any(|k| k == "<="));
}

#[test]
fn test_registry_loads_fixture_from_disk() {
    let mut registry = WordfileRegistry::new();
    let shared = registry
        .load_path(fixture_path("c-demo.wordfile"), WordfileOrigin::Bundled)
        .unwrap()
        .unwrap();
    assert_eq!(shared.name(), "Demo C");
    assert_eq!(registry.by_extension("h").unwrap().number(), 1);
    let entry = registry.iter().next().unwrap();
    assert_eq!(entry.origin(), WordfileOrigin::Bundled);
    assert!(entry.path().is_some());
}
