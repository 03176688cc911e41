//! Tests for model settings layering.

use kidbook_error::ModelErrorKind;
use kidbook_models::{ChatModelSettings, ModelSettings};
use std::io::Write;

#[test]
fn test_file_overrides_defaults() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Temp file");
    writeln!(
        file,
        r#"
[story]
model = "gpt-4.1"
api_key = "sk-story"

[image]
model = "black-forest-labs/flux-kontext-pro"
api_token = "r8-token"
"#
    )
    .expect("Write settings");

    let settings = ModelSettings::load(Some(file.path())).expect("Settings load");

    assert_eq!(settings.story().model(), "gpt-4.1");
    assert_eq!(settings.story().api_key().as_deref(), Some("sk-story"));
    assert_eq!(settings.pages().model(), "gpt-4.1-mini");
    assert_eq!(
        settings.image().model().as_deref(),
        Some("black-forest-labs/flux-kontext-pro")
    );
    assert_eq!(settings.image().base_url(), "https://api.replicate.com/v1");
}

#[test]
fn test_fallbacks_fill_only_unset_values() {
    let mut settings = ModelSettings::default();
    settings.apply_fallbacks(Some("sk-env"), Some("r8-env"), Some("zsxkib/instant-id"));

    assert_eq!(settings.scene().api_key().as_deref(), Some("sk-env"));
    assert_eq!(settings.image().api_token().as_deref(), Some("r8-env"));

    settings.apply_fallbacks(Some("sk-other"), None, Some("acme/other"));
    assert_eq!(settings.scene().api_key().as_deref(), Some("sk-env"));
    assert_eq!(settings.image().model().as_deref(), Some("zsxkib/instant-id"));
}

#[test]
fn test_missing_api_key_is_reported() {
    let err = ChatModelSettings::new("gpt-4o-mini")
        .require_api_key()
        .expect_err("No key");
    assert!(matches!(err.as_model(), Some(ModelErrorKind::MissingCredentials(_))));
}
