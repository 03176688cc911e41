//! Identity notes read off the reference photo by a vision chat model.

use async_trait::async_trait;
use kidbook_core::{ChatMessage, MediaSource, non_blank};
use kidbook_error::{KidbookResult, ModelError, ModelErrorKind};
use kidbook_models::{ChatCompletion, ChatRequest};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

const CLOTHING_AND_ACCESSORIES: &[&str] = &[
    "jacket", "hoodie", "sweater", "coat", "shirt", "t-shirt", "tee", "top", "blouse", "pants",
    "jeans", "shorts", "skirt", "dress", "outfit", "clothing", "attire", "costume", "cape",
    "uniform", "boots", "shoes", "sneakers", "sandals", "socks", "hat", "beanie", "cap", "helmet",
    "gloves", "scarf", "mask", "backpack", "bag", "vest", "overalls", "glasses", "goggles",
    "bracelet", "necklace", "earrings", "watch", "rings", "belt",
];

static NON_PHYSICAL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let pattern = format!(r"\b({})\b", CLOTHING_AND_ACCESSORIES.join("|"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .inspect_err(|e| warn!(error = %e, "Clothing filter failed to compile"))
        .ok()
});

const SYSTEM_PROMPT: &str = "You keep a picture book's illustrations consistent. \
Answer with bullet points about the child's permanent physical features only: face shape, \
eyes, hair and skin. Leave out clothing, accessories and props, and do not guess at names \
or personality.";

const USER_PROMPT: &str = "Look at the child in this photo and list 6 to 8 traits an \
illustrator must keep identical on every page, such as face shape, skin tone, eye colour, \
freckles or hair colour and texture. Physical features only, nothing the child is wearing. \
Write each one as '- detail'.";

/// Keep only lines about the child's body, as `- ` bullets.
///
/// Blank lines are dropped, leading `-`/`•` markers are stripped and any
/// line that mentions clothing or an accessory is discarded.
///
/// # Examples
///
/// ```
/// use kidbook_continuity::filter_physical_identity_notes;
///
/// let raw = "- Round face\n• Red Hoodie with stars\n\n  -  Hazel eyes";
/// assert_eq!(filter_physical_identity_notes(raw), "- Round face\n- Hazel eyes");
/// ```
pub fn filter_physical_identity_notes(notes: &str) -> String {
    notes
        .lines()
        .filter_map(non_blank)
        .map(|line| line.trim_start_matches(['-', '•']).trim())
        .filter(|line| !line.is_empty())
        .filter(|line| {
            NON_PHYSICAL
                .as_ref()
                .is_none_or(|pattern| !pattern.is_match(line))
        })
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Derives identity bullet text from a reference image.
///
/// Implementations may fail; config assembly treats any error as "no notes".
#[async_trait]
pub trait IdentityExtractor: Send + Sync {
    /// Return `- ` bulleted physical traits, or an empty string.
    async fn extract(&self, reference_image: &str) -> KidbookResult<String>;
}

/// Identity extractor backed by a vision-capable chat model.
///
/// Never returns an error: failures are logged and produce an empty string.
#[derive(Debug, Clone)]
pub struct ChatIdentityExtractor<C> {
    client: C,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl<C: ChatCompletion> ChatIdentityExtractor<C> {
    /// Creates an extractor calling `model` through `client`.
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.2,
            max_tokens: 450,
        }
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_notes(&self, reference_image: &str) -> KidbookResult<String> {
        let image = MediaSource::classify(reference_image).to_transport()?;
        let request = ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user_with_image(USER_PROMPT, image),
            ])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| ModelError::new(ModelErrorKind::InvalidRequest(e.to_string())))?;

        let reply = self.client.complete(&request).await?;
        Ok(filter_physical_identity_notes(reply.trim()))
    }
}

#[async_trait]
impl<C: ChatCompletion> IdentityExtractor for ChatIdentityExtractor<C> {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn extract(&self, reference_image: &str) -> KidbookResult<String> {
        if non_blank(reference_image).is_none() {
            debug!("No reference image; skipping identity extraction");
            return Ok(String::new());
        }

        match self.request_notes(reference_image).await {
            Ok(notes) => {
                info!(lines = notes.lines().count(), "Extracted identity notes");
                Ok(notes)
            }
            Err(e) => {
                warn!(error = %e, "Identity extraction failed; continuing without automatic notes");
                Ok(String::new())
            }
        }
    }
}
