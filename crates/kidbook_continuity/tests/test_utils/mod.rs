//! Test utilities for continuity tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kidbook_continuity::IdentityExtractor;
use kidbook_core::Profile;
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use kidbook_models::{ChatCompletion, ChatRequest};
use serde_json::{Value, json};
use std::sync::Mutex;

/// Build a profile from a JSON literal.
pub fn profile(raw: Value) -> Profile {
    Profile::from_mapping(raw.as_object().expect("Fixture is an object")).expect("Valid profile")
}

/// The profile from the end-to-end scenario.
pub fn mia() -> Profile {
    profile(json!({"name": "Mia", "hobbies": ["stargazing"]}))
}

/// Extractor returning a fixed result and counting calls.
pub struct MockExtractor {
    reply: Result<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn replying(notes: impl Into<String>) -> Self {
        Self {
            reply: Ok(notes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("Lock calls").len()
    }
}

#[async_trait]
impl IdentityExtractor for MockExtractor {
    async fn extract(&self, reference_image: &str) -> KidbookResult<String> {
        self.calls
            .lock()
            .expect("Lock calls")
            .push(reference_image.to_string());
        match &self.reply {
            Ok(notes) => Ok(notes.clone()),
            Err(message) => Err(ModelError::new(ModelErrorKind::Api {
                status: 500,
                message: message.clone(),
            })
            .into()),
        }
    }
}

/// Chat model with a scripted reply that records requests.
pub struct MockChat {
    reply: Result<String, u16>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChat {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self {
            reply: Err(status),
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
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ModelError::new(ModelErrorKind::Api {
                status: *status,
                message: "scripted failure".to_string(),
            })
            .into()),
        }
    }
}
