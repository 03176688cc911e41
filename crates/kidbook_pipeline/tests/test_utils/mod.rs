//! Scripted collaborators for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kidbook_core::{ImageOutput, Profile, SceneDescription, StoryPage};
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use kidbook_models::{ImageGenerator, ImageRequest};
use kidbook_pipeline::Orchestrator;
use kidbook_story::{PageSplitter, SceneWriter, StoryWriter};
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex};

pub struct MockStoryWriter;

#[async_trait]
impl StoryWriter for MockStoryWriter {
    async fn write_story(&self, profile: &Profile) -> KidbookResult<String> {
        Ok(format!("# {} and the Moon\n\nOnce upon a time there was a brave child.", profile.name()))
    }
}

/// Splits into a fixed number of pages and records the requested count.
pub struct MockSplitter {
    pages: u32,
    pub requested: Mutex<Vec<Option<usize>>>,
}

impl MockSplitter {
    pub fn with_pages(pages: u32) -> Self {
        Self {
            pages,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageSplitter for MockSplitter {
    async fn split_story(
        &self,
        _story: &str,
        _profile: &Profile,
        desired_pages: Option<usize>,
    ) -> KidbookResult<Vec<StoryPage>> {
        self.requested.lock().expect("Lock").push(desired_pages);
        Ok((1..=self.pages)
            .map(|n| StoryPage::new(n, format!("Page {}", n), format!("Text for page {}", n)))
            .collect())
    }
}

/// Scene writer that attaches a supporting detail to every page.
pub struct MockSceneWriter;

#[async_trait]
impl SceneWriter for MockSceneWriter {
    async fn page_to_scene(&self, page: &StoryPage, _profile: &Profile) -> KidbookResult<SceneDescription> {
        Ok(SceneDescription::builder()
            .page_number(*page.page_number())
            .scene_description(format!("Scene for {}", page.title()))
            .outfit_description("starry pajamas")
            .supporting_details(format!("detail {}", page.page_number()))
            .build()
            .expect("Valid scene"))
    }
}

/// Image generator returning `url_<page>` and recording every request.
pub struct MockImageGenerator {
    fail_on_call: Option<usize>,
    pub requests: Mutex<Vec<ImageRequest>>,
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            fail_on_call: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().expect("Lock").clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, request: &ImageRequest) -> KidbookResult<ImageOutput> {
        let mut requests = self.requests.lock().expect("Lock");
        requests.push(request.clone());
        let call = requests.len();
        if self.fail_on_call == Some(call) {
            return Err(ModelError::new(ModelErrorKind::ImageGeneration("scripted failure".to_string())).into());
        }
        Ok(ImageOutput::List(vec![
            ImageOutput::Text(format!("url_{}", call)),
            ImageOutput::List(vec![ImageOutput::Text(format!("alt_{}", call))]),
        ]))
    }
}

pub fn profile_mapping() -> Map<String, Value> {
    json!({
        "name": "Mia",
        "age": 6,
        "hobbies": ["stargazing"],
        "favorite_theme": "space",
        "story_language": "English"
    })
    .as_object()
    .cloned()
    .expect("Fixture is an object")
}

pub fn orchestrator(
    pages: u32,
    images: Arc<MockImageGenerator>,
    config: kidbook_continuity::ContinuityConfig,
) -> Orchestrator {
    Orchestrator::builder()
        .story_writer(Arc::new(MockStoryWriter))
        .page_splitter(Arc::new(MockSplitter::with_pages(pages)))
        .scene_writer(Arc::new(MockSceneWriter))
        .image_generator(images)
        .continuity_config(config)
        .build()
        .expect("Valid orchestrator")
}
