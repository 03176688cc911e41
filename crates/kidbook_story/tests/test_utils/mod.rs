//! Test utilities for story collaborator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kidbook_core::Profile;
use kidbook_error::KidbookResult;
use kidbook_models::{ChatCompletion, ChatRequest};
use serde_json::json;
use std::sync::Mutex;

/// Chat model that returns a fixed reply and records every request.
pub struct MockChat {
    reply: String,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChat {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> ChatRequest {
        self.requests
            .lock()
            .expect("Lock requests")
            .last()
            .cloned()
            .expect("At least one request")
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("Lock requests").len()
    }
}

#[async_trait]
impl ChatCompletion for MockChat {
    async fn complete(&self, request: &ChatRequest) -> KidbookResult<String> {
        self.requests
            .lock()
            .expect("Lock requests")
            .push(request.clone());
        Ok(self.reply.clone())
    }
}

/// Profile used across story tests.
pub fn sample_profile() -> Profile {
    Profile::from_mapping(
        json!({
            "name": "Mia",
            "age": 6,
            "hobbies": ["stargazing", "painting"],
            "favorite_theme": "space exploration",
            "desired_takeaway": "courage grows when shared",
            "story_language": "Spanish"
        })
        .as_object()
        .expect("Fixture is an object"),
    )
    .expect("Valid profile")
}

/// JSON reply with `count` well-formed pages.
pub fn pages_reply(count: u32) -> String {
    let pages: Vec<_> = (1..=count)
        .map(|n| json!({"page_number": n, "title": format!("Page {}", n), "story_text": format!("Text {}", n)}))
        .collect();
    json!({ "pages": pages }).to_string()
}
