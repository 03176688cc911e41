//! Per-page image argument merging.

use kidbook_continuity::GenerationDirectives;
use serde_json::{Map, Value};
use tracing::debug;

/// Image argument that selects camera framing instead of being forwarded.
pub const CAMERA_SHOT_KEY: &str = "camera_shot";

/// Combine caller image arguments with a page's directive overrides.
///
/// Caller keys always win: a directive override is only added when the
/// caller left that key unset. When the directives name a reference history
/// parameter and carry extra references, the references are added under that
/// name unless the caller already set it.
///
/// # Examples
///
/// ```
/// use kidbook_continuity::{ContinuityConfig, ContinuityState, SeedPolicy};
/// use kidbook_core::{Profile, SceneDescription};
/// use kidbook_pipeline::merge_image_args;
/// use serde_json::json;
///
/// let profile = Profile::from_mapping(json!({"name": "Mia"}).as_object().unwrap()).unwrap();
/// let config = ContinuityConfig::builder().seed_policy(SeedPolicy::Locked(7)).build().unwrap();
/// let state = ContinuityState::new(&profile, "mia.jpg", config);
/// let directives = state.build_directives(&SceneDescription::simple(1, "park", ""), 1);
///
/// let caller = json!({"seed": 99, "steps": 30}).as_object().unwrap().clone();
/// let merged = merge_image_args(&caller, &directives);
/// assert_eq!(merged["seed"], json!(99));
/// assert_eq!(merged["steps"], json!(30));
/// ```
pub fn merge_image_args(caller: &Map<String, Value>, directives: &GenerationDirectives) -> Map<String, Value> {
    let mut merged = caller.clone();

    for (key, value) in directives.model_overrides() {
        if merged.contains_key(key) {
            debug!(key = %key, "Caller image argument overrides continuity value");
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }

    if let Some(parameter) = directives.reference_history_parameter() {
        let references = directives.additional_reference_images();
        if !references.is_empty() && !merged.contains_key(parameter) {
            let references = references.iter().cloned().map(Value::String).collect();
            merged.insert(parameter.clone(), Value::Array(references));
        }
    }

    merged
}

/// Remove `camera_shot` from the arguments and return it as text.
///
/// Null or blank values count as unset.
pub fn take_camera_shot(args: &mut Map<String, Value>) -> Option<String> {
    match args.remove(CAMERA_SHOT_KEY)? {
        Value::Null => None,
        Value::String(shot) => {
            let shot = shot.trim();
            (!shot.is_empty()).then(|| shot.to_string())
        }
        other => Some(other.to_string()),
    }
}
