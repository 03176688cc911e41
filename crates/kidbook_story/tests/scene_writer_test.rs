//! Tests for the chat-backed scene writer.

mod test_utils;

use kidbook_core::StoryPage;
use kidbook_error::ValidationErrorKind;
use kidbook_story::{LlmSceneWriter, SceneWriter};
use serde_json::json;
use std::sync::Arc;
use test_utils::{MockChat, sample_profile};

fn page() -> StoryPage {
    StoryPage::new(4, "Rocket Picnic".to_string(), "Mia shares her snacks on the moon.".to_string())
}

#[tokio::test]
async fn test_full_scene_is_carried_through() {
    let reply = json!({
        "scene_description": " Mia sits on a crater rim. ",
        "outfit_description": "silver space suit",
        "facial_expression": "delighted grin",
        "pose_description": "cross-legged, offering a sandwich",
        "supporting_details": "Pip the owl floats beside her"
    })
    .to_string();
    let chat = Arc::new(MockChat::replying(reply));
    let writer = LlmSceneWriter::new(chat.clone(), "m");

    let scene = writer.page_to_scene(&page(), &sample_profile()).await.expect("Scene");

    assert_eq!(*scene.page_number(), 4);
    assert_eq!(scene.scene_description(), "Mia sits on a crater rim.");
    assert_eq!(scene.outfit_description(), "silver space suit");
    assert_eq!(scene.supporting_details(), "Pip the owl floats beside her");

    let request = chat.last_request();
    assert_eq!(*request.temperature(), Some(0.4));
    assert_eq!(*request.max_tokens(), Some(900));
    let user = request.messages()[1].text();
    assert!(user.contains("Page title: Rocket Picnic"));
    assert!(user.contains("Favorite theme"));
}

#[tokio::test]
async fn test_only_scene_description_is_mandatory() {
    let reply = json!({"scene_description": "Mia waves goodbye", "supporting_details": null}).to_string();
    let writer = LlmSceneWriter::new(MockChat::replying(reply), "m");

    let scene = writer.page_to_scene(&page(), &sample_profile()).await.expect("Scene");
    assert_eq!(scene.outfit_description(), "");
    assert_eq!(scene.supporting_details(), "");
}

#[tokio::test]
async fn test_missing_scene_description_rejected() {
    let reply = json!({"outfit_description": "raincoat"}).to_string();
    let writer = LlmSceneWriter::new(MockChat::replying(reply), "m");

    let err = writer
        .page_to_scene(&page(), &sample_profile())
        .await
        .expect_err("Missing scene");
    assert_eq!(
        err.as_validation(),
        Some(&ValidationErrorKind::MissingSceneField("scene_description".to_string()))
    );
}
