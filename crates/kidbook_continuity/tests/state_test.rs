//! Tests for the continuity state and directive resolver.

mod test_utils;

use kidbook_continuity::{ContinuityConfig, ContinuityState, SEED_OVERRIDE_KEY, SeedPolicy};
use kidbook_core::{SceneDescription, SupportingCast};
use serde_json::json;
use test_utils::{mia, profile};

fn scene(page: u32, details: &str) -> SceneDescription {
    SceneDescription::simple(page, "Mia looks up at the night sky", details)
}

fn carrying(size: usize, promote: bool) -> ContinuityConfig {
    ContinuityConfig::builder()
        .carry_reference_image_forward(true)
        .reference_history_size(size)
        .promote_latest_reference(promote)
        .reference_history_parameter("reference_image_history")
        .build()
        .expect("Valid config")
}

fn outputs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_mia_end_to_end_scenario() {
    let mut state = ContinuityState::new(&mia(), "mia.jpg", carrying(1, true));

    let page_one = state.build_directives(&scene(1, ""), 1);
    assert_eq!(page_one.primary_reference_image(), "mia.jpg");
    assert!(page_one.additional_reference_images().is_empty());

    state.record_generation(&scene(1, ""), &outputs(&["url_a"]));

    let page_two = state.build_directives(&scene(2, ""), 2);
    assert_eq!(page_two.primary_reference_image(), "url_a");
    assert_eq!(page_two.additional_reference_images(), &outputs(&["mia.jpg"]));
}

#[test]
fn test_promotion_appends_base_after_remaining_history() {
    let mut state = ContinuityState::new(&mia(), "B", carrying(3, true));
    state.record_generation(&scene(1, ""), &outputs(&["h2"]));
    state.record_generation(&scene(2, ""), &outputs(&["h1"]));

    let directives = state.build_directives(&scene(3, ""), 3);
    assert_eq!(directives.primary_reference_image(), "h1");
    assert_eq!(directives.additional_reference_images(), &outputs(&["h2", "B"]));
}

#[test]
fn test_promotion_does_not_duplicate_base_reference() {
    let mut state = ContinuityState::new(&mia(), "B", carrying(3, true));
    state.record_generation(&scene(1, ""), &outputs(&["B"]));
    state.record_generation(&scene(2, ""), &outputs(&["h1"]));

    let directives = state.build_directives(&scene(3, ""), 3);
    assert_eq!(directives.primary_reference_image(), "h1");
    assert_eq!(directives.additional_reference_images(), &outputs(&["B"]));
}

#[test]
fn test_without_promotion_history_becomes_additional_references() {
    let mut state = ContinuityState::new(&mia(), "B", carrying(2, false));
    state.record_generation(&scene(1, ""), &outputs(&["h2"]));
    state.record_generation(&scene(2, ""), &outputs(&["h1"]));

    let directives = state.build_directives(&scene(3, ""), 3);
    assert_eq!(directives.primary_reference_image(), "B");
    assert_eq!(directives.additional_reference_images(), &outputs(&["h1", "h2"]));
    assert_eq!(
        directives.reference_history_parameter().as_deref(),
        Some("reference_image_history")
    );
}

#[test]
fn test_history_is_bounded_most_recent_first() {
    let mut state = ContinuityState::new(&mia(), "B", carrying(2, false));
    for (page, url) in ["u1", "u2", "u3", "u4"].iter().enumerate() {
        state.record_generation(&scene(page as u32 + 1, ""), &outputs(&[url]));
    }

    let history: Vec<_> = state.reference_history().iter().cloned().collect();
    assert_eq!(history, outputs(&["u4", "u3"]));
}

#[test]
fn test_only_first_non_blank_output_is_remembered() {
    let mut state = ContinuityState::new(&mia(), "B", carrying(3, false));
    state.record_generation(&scene(1, ""), &outputs(&["  ", " u1 ", "u2"]));
    state.record_generation(&scene(2, ""), &outputs(&["u1"]));

    let history: Vec<_> = state.reference_history().iter().cloned().collect();
    assert_eq!(history, outputs(&["u1"]));
}

#[test]
fn test_disabled_history_ignores_outputs_and_parameter() {
    let config = ContinuityConfig::builder()
        .reference_history_size(3usize)
        .reference_history_parameter("reference_image_history")
        .promote_latest_reference(true)
        .build()
        .expect("Valid config");
    let mut state = ContinuityState::new(&mia(), "B", config);
    state.record_generation(&scene(1, ""), &outputs(&["u1"]));

    let directives = state.build_directives(&scene(2, ""), 2);
    assert!(state.reference_history().is_empty());
    assert_eq!(directives.primary_reference_image(), "B");
    assert!(directives.additional_reference_images().is_empty());
    assert!(directives.reference_history_parameter().is_none());
}

#[test]
fn test_zero_capacity_history_behaves_as_disabled() {
    let mut state = ContinuityState::new(&mia(), "B", carrying(0, true));
    state.record_generation(&scene(1, ""), &outputs(&["u1"]));

    let directives = state.build_directives(&scene(2, ""), 2);
    assert!(state.reference_history().is_empty());
    assert_eq!(directives.primary_reference_image(), "B");
    assert!(directives.reference_history_parameter().is_none());
}

#[test]
fn test_continuity_notes_combine_static_history_and_scene() {
    let config = ContinuityConfig::builder()
        .static_continuity_notes(vec![
            "Mia always carries a star-shaped lantern".to_string(),
            "   ".to_string(),
        ])
        .build()
        .expect("Valid config");
    let mut state = ContinuityState::new(&mia(), "B", config);

    state.record_generation(&scene(1, "- Pip the owl\n- red kite"), &[]);
    let directives = state.build_directives(&scene(2, "• red kite\n• silver moon boat"), 2);

    assert_eq!(
        directives.continuity_notes(),
        &outputs(&[
            "Mia always carries a star-shaped lantern",
            "red kite",
            "Pip the owl",
            "silver moon boat",
        ])
    );
}

#[test]
fn test_continuity_notes_never_repeat_ignoring_case() {
    let config = ContinuityConfig::builder()
        .static_continuity_notes(vec!["Pip the owl".to_string()])
        .build()
        .expect("Valid config");
    let mut state = ContinuityState::new(&mia(), "B", config);

    let page1 = scene(1, "- Pip the owl");
    assert_eq!(
        state.build_directives(&page1, 1).continuity_notes(),
        &outputs(&["Pip the owl"])
    );
    state.record_generation(&page1, &[]);

    let page2 = scene(2, "- PIP THE OWL\n- red kite");
    assert_eq!(
        state.build_directives(&page2, 2).continuity_notes(),
        &outputs(&["Pip the owl", "red kite"])
    );
    state.record_generation(&page2, &[]);

    let page3 = scene(3, "pip the owl");
    assert_eq!(
        state.build_directives(&page3, 3).continuity_notes(),
        &outputs(&["Pip the owl", "red kite"])
    );
    assert_eq!(state.supporting_history().len(), 2);
}

#[test]
fn test_supporting_history_is_bounded() {
    let mut state = ContinuityState::new(&mia(), "B", ContinuityConfig::default());
    state.record_generation(&scene(1, "one\ntwo\nthree"), &[]);
    state.record_generation(&scene(2, "two"), &[]);

    let carried: Vec<_> = state.supporting_history().iter().cloned().collect();
    assert_eq!(carried, outputs(&["three", "two"]));
}

#[test]
fn test_propagation_disabled_keeps_only_current_scene() {
    let config = ContinuityConfig::builder()
        .propagate_supporting_details(false)
        .build()
        .expect("Valid config");
    let mut state = ContinuityState::new(&mia(), "B", config);
    state.record_generation(&scene(1, "Pip the owl"), &[]);

    let directives = state.build_directives(&scene(2, "red kite"), 2);
    assert!(state.supporting_history().is_empty());
    assert_eq!(directives.continuity_notes(), &outputs(&["red kite"]));
}

#[test]
fn test_supporting_cast_notes_skip_blank_entries() {
    let cast: SupportingCast = [("Pip", "a small grey owl"), ("Luna", "  "), (" ", "ghost")]
        .into_iter()
        .collect();
    let config = ContinuityConfig::builder()
        .supporting_character_notes(cast)
        .build()
        .expect("Valid config");
    let state = ContinuityState::new(&mia(), "B", config);

    let directives = state.build_directives(&scene(1, ""), 1);
    assert_eq!(
        directives.supporting_cast_notes(),
        &outputs(&["Pip: a small grey owl"])
    );
}

#[test]
fn test_identity_falls_back_to_profile_bullets() {
    let state = ContinuityState::new(&mia(), "B", ContinuityConfig::default());
    let directives = state.build_directives(&scene(1, ""), 1);

    let identity = directives.identity_notes().clone().expect("Identity text");
    assert!(identity.starts_with("Name: Mia"));
    assert!(identity.contains("Hobbies/interests: stargazing"));
}

#[test]
fn test_configured_identity_is_fixed_for_every_page() {
    let config = ContinuityConfig::builder()
        .identity_notes("- Round face\n- Hazel eyes")
        .build()
        .expect("Valid config");
    let mut state = ContinuityState::new(&mia(), "B", config);

    let first = state.build_directives(&scene(1, ""), 1);
    state.record_generation(&scene(1, "kite"), &outputs(&["u1"]));
    let second = state.build_directives(&scene(2, ""), 2);

    assert_eq!(first.identity_notes(), second.identity_notes());
    assert_eq!(first.identity_notes().as_deref(), Some("- Round face\n- Hazel eyes"));
}

#[test]
fn test_seed_lands_in_model_overrides() {
    let config = ContinuityConfig::builder()
        .vary_seed_per_page(true)
        .build()
        .expect("Valid config");
    let state = ContinuityState::new(&mia(), "B", config);
    let base = state.base_seed().expect("Auto seed");

    let first = state.build_directives(&scene(1, ""), 1);
    let third = state.build_directives(&scene(3, ""), 3);
    assert_eq!(first.model_overrides().get(SEED_OVERRIDE_KEY), Some(&json!(base)));
    assert_eq!(third.seed(), Some((base + 2) % kidbook_continuity::SEED_MODULUS));
}

#[test]
fn test_locked_seed_ignores_per_page_variation() {
    let config = ContinuityConfig::builder()
        .seed_policy(SeedPolicy::Locked(1234))
        .vary_seed_per_page(true)
        .build()
        .expect("Valid config");
    let state = ContinuityState::new(&mia(), "B", config);

    assert_eq!(state.build_directives(&scene(5, ""), 5).seed(), Some(1234));
}

#[test]
fn test_disabled_seed_produces_no_override() {
    let config = ContinuityConfig::builder()
        .seed_policy(SeedPolicy::Disabled)
        .build()
        .expect("Valid config");
    let state = ContinuityState::new(&profile(json!({"name": "Leo"})), "B", config);

    let directives = state.build_directives(&scene(1, ""), 1);
    assert!(directives.model_overrides().is_empty());
}

#[test]
fn test_prompt_payload_exposes_note_fields() {
    let config = ContinuityConfig::builder()
        .identity_notes("- Freckles")
        .build()
        .expect("Valid config");
    let state = ContinuityState::new(&mia(), "B", config);

    let payload = state.build_directives(&scene(1, "kite"), 1).prompt_payload();
    assert_eq!(payload["identity_notes"], json!("- Freckles"));
    assert_eq!(payload["continuity_notes"], json!(["kite"]));
    assert_eq!(payload["supporting_cast_notes"], json!([]));
}
