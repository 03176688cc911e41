//! Tests for profile file loading.

use kidbook_error::{KidbookErrorKind, ValidationErrorKind};
use kidbook_pipeline::load_profile_mapping;
use serde_json::json;
use std::io::Write;

fn temp_with(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Create temp file");
    file.write_all(contents.as_bytes()).expect("Write temp file");
    file
}

#[test]
fn test_loads_json_profile() {
    let file = temp_with(".json", r#"{"name": "Leo", "age": 7}"#);
    let mapping = load_profile_mapping(file.path()).expect("Valid JSON");
    assert_eq!(mapping["name"], json!("Leo"));
    assert_eq!(mapping["age"], json!(7));
}

#[test]
fn test_loads_yml_profile_case_insensitively() {
    let file = temp_with(".YML", "name: Leo\nlanguage: French\n");
    let mapping = load_profile_mapping(file.path()).expect("Valid YAML");
    assert_eq!(mapping["language"], json!("French"));
}

#[test]
fn test_unknown_extension_is_a_validation_error() {
    let file = temp_with(".toml", "name = 'Leo'");
    let err = load_profile_mapping(file.path()).expect_err("Unsupported");
    assert!(matches!(
        err.as_validation(),
        Some(ValidationErrorKind::UnsupportedFormat(_))
    ));
}

#[test]
fn test_top_level_list_is_rejected() {
    let file = temp_with(".yaml", "- name: Leo\n");
    let err = load_profile_mapping(file.path()).expect_err("Not a mapping");
    assert!(matches!(
        err.as_validation(),
        Some(ValidationErrorKind::InvalidProfileField { .. })
    ));
}

#[test]
fn test_malformed_json_is_a_serialization_error() {
    let file = temp_with(".json", "{name: ");
    let err = load_profile_mapping(file.path()).expect_err("Malformed");
    assert!(matches!(err.kind(), KidbookErrorKind::Serialization(_)));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = load_profile_mapping(std::path::Path::new("/no/such/profile.yaml"))
        .expect_err("Missing file");
    assert!(matches!(err.kind(), KidbookErrorKind::Io(_)));
}
