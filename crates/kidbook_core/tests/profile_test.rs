//! Tests for profile parsing and prompt rendering.

use kidbook_core::{Profile, RawMapping};
use kidbook_error::ValidationErrorKind;
use serde_json::json;

fn mapping(value: serde_json::Value) -> RawMapping {
    value.as_object().cloned().expect("fixture is an object")
}

#[test]
fn test_minimal_profile_defaults() {
    let profile = Profile::from_mapping(&mapping(json!({"name": "  Mia "}))).expect("Valid profile");

    assert_eq!(profile.name(), "Mia");
    assert_eq!(*profile.age(), None);
    assert!(profile.hobbies().is_empty());
    assert_eq!(profile.story_language(), "English");
    assert!(profile.supporting_characters().is_empty());
    assert!(profile.continuity_notes().is_empty());
}

#[test]
fn test_missing_or_blank_name_is_rejected() {
    for raw in [json!({}), json!({"name": "   "}), json!({"name": null})] {
        let err = Profile::from_mapping(&mapping(raw)).expect_err("Name is required");
        assert_eq!(err.as_validation(), Some(&ValidationErrorKind::MissingName));
    }
}

#[test]
fn test_aliases_are_honored() {
    let profile = Profile::from_mapping(&mapping(json!({
        "name": "Leo",
        "pronouns": "he/him",
        "favorite_theme": "space pirates",
        "lesson": "sharing is brave",
        "language": "Spanish",
        "caregiver_name": "Grandma Rosa",
        "appearance": ["Curly brown hair", "Freckles"],
        "supporting_cast": [
            {"name": "Pip", "description": "a small grey owl"},
            {"name": "  ", "description": "ignored"}
        ]
    })))
    .expect("Valid profile");

    assert_eq!(profile.gender().as_deref(), Some("he/him"));
    assert_eq!(profile.favorite_theme().as_deref(), Some("space pirates"));
    assert_eq!(profile.desired_takeaway().as_deref(), Some("sharing is brave"));
    assert_eq!(profile.story_language(), "Spanish");
    assert_eq!(profile.guardian_name().as_deref(), Some("Grandma Rosa"));
    assert_eq!(
        profile.identity_traits().as_deref(),
        Some("Curly brown hair\nFreckles")
    );
    assert_eq!(profile.supporting_characters().len(), 1);
    assert_eq!(profile.supporting_characters().get("Pip"), Some("a small grey owl"));
}

#[test]
fn test_age_coercion() {
    let numeric = Profile::from_mapping(&mapping(json!({"name": "A", "age": 6}))).expect("Valid");
    assert_eq!(*numeric.age(), Some(6));

    let text = Profile::from_mapping(&mapping(json!({"name": "A", "age": " 7 "}))).expect("Valid");
    assert_eq!(*text.age(), Some(7));

    let blank = Profile::from_mapping(&mapping(json!({"name": "A", "age": ""}))).expect("Valid");
    assert_eq!(*blank.age(), None);

    let err = Profile::from_mapping(&mapping(json!({"name": "A", "age": "seven"})))
        .expect_err("Non-numeric age");
    assert!(matches!(err.as_validation(), Some(ValidationErrorKind::InvalidAge(_))));
}

#[test]
fn test_float_ages_must_be_whole_and_in_range() {
    let whole = Profile::from_mapping(&mapping(json!({"name": "A", "age": 6.0}))).expect("Valid");
    assert_eq!(*whole.age(), Some(6));

    for age in [json!(1e12), json!(6.5), json!(-1.0)] {
        let err = Profile::from_mapping(&mapping(json!({"name": "A", "age": age})))
            .expect_err("Unusable age");
        assert!(matches!(err.as_validation(), Some(ValidationErrorKind::InvalidAge(_))));
    }
}

#[test]
fn test_hobbies_normalization() {
    let split = Profile::from_mapping(&mapping(json!({
        "name": "A",
        "hobbies": "stargazing, , painting"
    })))
    .expect("Valid");
    assert_eq!(split.hobbies(), &vec!["stargazing".to_string(), "painting".to_string()]);

    let listed = Profile::from_mapping(&mapping(json!({
        "name": "A",
        "hobbies": [" soccer ", "", 3]
    })))
    .expect("Valid");
    assert_eq!(listed.hobbies(), &vec!["soccer".to_string(), "3".to_string()]);

    let err = Profile::from_mapping(&mapping(json!({"name": "A", "hobbies": {"x": 1}})))
        .expect_err("Mapping is not a hobby list");
    assert!(matches!(err.as_validation(), Some(ValidationErrorKind::InvalidHobbies(_))));
}

#[test]
fn test_continuity_notes_are_deduplicated() {
    let profile = Profile::from_mapping(&mapping(json!({
        "name": "A",
        "continuity_notes": "- Always carries a red kite\n• always carries a red kite\nHas a dog named Bo"
    })))
    .expect("Valid");

    assert_eq!(
        profile.continuity_notes(),
        &vec![
            "Always carries a red kite".to_string(),
            "Has a dog named Bo".to_string()
        ]
    );
}

#[test]
fn test_supporting_characters_skip_blank_descriptions() {
    let profile = Profile::from_mapping(&mapping(json!({
        "name": "A",
        "supporting_characters": {"Zed": "a zebra", "Amy": "an ant", "Blank": "  "}
    })))
    .expect("Valid");

    let cast = profile.supporting_characters();
    assert_eq!(cast.len(), 2);
    assert_eq!(cast.get("Zed"), Some("a zebra"));
    assert_eq!(cast.get("Amy"), Some("an ant"));
    assert_eq!(cast.get("Blank"), None);
}

#[test]
fn test_summary_for_prompt_lists_present_fields() {
    let profile = Profile::from_mapping(&mapping(json!({
        "name": "Mia",
        "nickname": "Mimi",
        "age": 6,
        "hobbies": ["stargazing"]
    })))
    .expect("Valid");

    let summary = profile.summary_for_prompt();
    assert_eq!(
        summary,
        "- Name: Mia\n- Nickname: Mimi\n- Age: 6\n- Hobbies/interests: stargazing\n- Story language: English"
    );
}
