//! Page splitting through a chat model.

use crate::prompting::page_split_prompt;
use crate::{PageSplitter, parse_json};
use async_trait::async_trait;
use kidbook_core::{ChatMessage, Profile, StoryPage, ensure_contiguous};
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind, ValidationError, ValidationErrorKind};
use kidbook_models::{ChatCompletion, ChatRequest};
use serde_json::Value;
use std::ops::RangeInclusive;
use tracing::{debug, info, instrument};

/// Accepted page counts unless configured otherwise.
pub const DEFAULT_PAGE_RANGE: RangeInclusive<usize> = 12..=18;

/// Page splitter backed by a chat completion model.
#[derive(Debug, Clone)]
pub struct LlmPageSplitter<C> {
    client: C,
    model: String,
    page_range: RangeInclusive<usize>,
    temperature: f32,
    max_tokens: u32,
}

impl<C: ChatCompletion> LlmPageSplitter<C> {
    /// Creates a splitter calling `model` through `client`.
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            page_range: DEFAULT_PAGE_RANGE,
            temperature: 0.3,
            max_tokens: 2500,
        }
    }

    /// Accept page counts in `range` instead of the default.
    pub fn with_page_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.page_range = range;
        self
    }

    /// Page count used when the caller does not ask for one.
    pub fn default_page_count(&self) -> usize {
        (self.page_range.start() + self.page_range.end()) / 2
    }

    fn resolve_page_count(&self, desired_pages: Option<usize>) -> KidbookResult<usize> {
        let requested = desired_pages.unwrap_or_else(|| self.default_page_count());
        if !self.page_range.contains(&requested) {
            return Err(ValidationError::new(ValidationErrorKind::PageCountOutOfRange {
                lower: *self.page_range.start(),
                upper: *self.page_range.end(),
                requested,
            })
            .into());
        }
        Ok(requested)
    }
}

#[async_trait]
impl<C: ChatCompletion> PageSplitter for LlmPageSplitter<C> {
    #[instrument(skip(self, story, profile), fields(model = %self.model, desired_pages = ?desired_pages))]
    async fn split_story(
        &self,
        story: &str,
        profile: &Profile,
        desired_pages: Option<usize>,
    ) -> KidbookResult<Vec<StoryPage>> {
        if story.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyStory).into());
        }
        let desired = self.resolve_page_count(desired_pages)?;
        let (lower, upper) = (*self.page_range.start(), *self.page_range.end());

        let prompt = page_split_prompt(profile, story, desired, lower, upper);
        let request = ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![
                ChatMessage::system(prompt.system().clone()),
                ChatMessage::user(prompt.user().clone()),
            ])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| ModelError::new(ModelErrorKind::InvalidRequest(e.to_string())))?;

        let reply = self.client.complete(&request).await?;
        let payload = parse_json(&reply, "page split")?;
        let entries = payload
            .get("pages")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ModelError::new(ModelErrorKind::ResponseParsing(
                    "Page split JSON must contain a 'pages' list".to_string(),
                ))
            })?;

        let pages = entries
            .iter()
            .map(page_from_entry)
            .collect::<KidbookResult<Vec<_>>>()?;
        debug!(received = pages.len(), desired, "Pages parsed");

        if !(lower..=upper).contains(&pages.len()) {
            return Err(ValidationError::new(ValidationErrorKind::UnexpectedPageCount {
                lower,
                upper,
                received: pages.len(),
            })
            .into());
        }
        ensure_contiguous(pages.iter().map(|page| *page.page_number()))?;

        info!(total_pages = pages.len(), "Story split into pages");
        Ok(pages)
    }
}

fn page_from_entry(entry: &Value) -> KidbookResult<StoryPage> {
    let invalid = || ValidationError::new(ValidationErrorKind::InvalidPage(entry.to_string()));

    let number = match entry.get("page_number") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .and_then(|n| u32::try_from(n).ok())
    .ok_or_else(invalid)?;

    let text = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let title = text("title").ok_or_else(invalid)?;
    let story_text = text("story_text").ok_or_else(invalid)?;

    Ok(StoryPage::new(number, title, story_text))
}
