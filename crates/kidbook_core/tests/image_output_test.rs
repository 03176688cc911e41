//! Tests for image output tagging and flattening.

use kidbook_core::ImageOutput;
use serde_json::json;

#[test]
fn test_single_string_is_not_split_into_characters() {
    let output = ImageOutput::from("https://img/page-1.png");
    assert_eq!(output.flatten(), vec!["https://img/page-1.png".to_string()]);
}

#[test]
fn test_nested_lists_flatten_in_order() {
    let output = ImageOutput::List(vec![
        ImageOutput::from("a"),
        ImageOutput::List(vec![ImageOutput::from("b"), ImageOutput::Empty]),
        ImageOutput::from(vec!["c", "d"]),
    ]);
    assert_eq!(output.flatten(), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_empty_flattens_to_nothing() {
    assert!(ImageOutput::Empty.flatten().is_empty());
    assert!(ImageOutput::from_json(&json!(null)).flatten().is_empty());
}

#[test]
fn test_object_payloads_unwrap_url_or_output() {
    assert_eq!(
        ImageOutput::from_json(&json!({"url": "https://img/1.png"})).flatten(),
        vec!["https://img/1.png"]
    );
    assert_eq!(
        ImageOutput::from_json(&json!({"output": ["u1", "u2"]})).flatten(),
        vec!["u1", "u2"]
    );
}

#[test]
fn test_other_scalars_use_display_form() {
    assert_eq!(ImageOutput::from_json(&json!(42)).flatten(), vec!["42"]);
}
