//! Tests for the chat-backed story writer.

mod test_utils;

use kidbook_core::{ContentPart, Role};
use kidbook_error::ModelErrorKind;
use kidbook_story::{LlmStoryWriter, StoryWriter};
use std::sync::Arc;
use test_utils::{MockChat, sample_profile};

#[tokio::test]
async fn test_story_request_shape() {
    let chat = Arc::new(MockChat::replying("  # La gran aventura\n\nMia...  "));
    let writer = LlmStoryWriter::new(chat.clone(), "gpt-4.1-mini");

    let story = writer.write_story(&sample_profile()).await.expect("Story");
    assert_eq!(story, "# La gran aventura\n\nMia...");

    let request = chat.last_request();
    assert_eq!(request.model(), "gpt-4.1-mini");
    assert_eq!(*request.temperature(), Some(0.7));
    assert_eq!(*request.max_tokens(), Some(1400));
    assert_eq!(*request.messages()[0].role(), Role::System);
    assert!(request.messages()[0].text().contains("Write only in Spanish"));

    let ContentPart::Text(user) = &request.messages()[1].content()[0] else {
        panic!("User prompt should be text");
    };
    assert!(user.contains("- Name: Mia"));
    assert!(user.contains("- Hobbies/interests: stargazing, painting"));
}

#[tokio::test]
async fn test_blank_story_is_an_error() {
    let writer = LlmStoryWriter::new(MockChat::replying("   \n "), "m");
    let err = writer.write_story(&sample_profile()).await.expect_err("Blank story");
    assert_eq!(err.as_model(), Some(&ModelErrorKind::EmptyResponse));
}

#[tokio::test]
async fn test_custom_guidance_reaches_prompt() {
    let chat = Arc::new(MockChat::replying("Once upon a time"));
    let writer = LlmStoryWriter::new(chat.clone(), "m")
        .with_length_guidance("Keep it under 300 words.")
        .with_structure_guidance("Plain paragraphs only.");

    writer.write_story(&sample_profile()).await.expect("Story");
    let request = chat.last_request();
    assert!(request.messages()[0].text().contains("Keep it under 300 words."));
    assert!(request.messages()[1].text().contains("Plain paragraphs only."));
}
