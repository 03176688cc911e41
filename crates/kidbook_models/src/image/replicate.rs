//! Replicate-hosted image models.

use super::{ImageGenerator, ImageRequest, StorybookPrompt, build_storybook_prompt};
use crate::ImageModelSettings;
use async_trait::async_trait;
use kidbook_core::{ImageOutput, MediaSource};
use kidbook_error::{ConfigError, HttpError, KidbookResult, ModelError, ModelErrorKind};
use reqwest::Client;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Model argument holding earlier illustrations, when the model accepts several references.
pub const REFERENCE_HISTORY_KEY: &str = "reference_image_history";

const INSTANT_ID: &str = "zsxkib/instant-id";
const INSTANT_ID_PINNED: &str =
    "zsxkib/instant-id:2e4785a4d80dadf580077b2244c8d7c05d8e3faac04a04c02d8e099dd2876789";
const FLUX_KONTEXT_PRO: &str = "black-forest-labs/flux-kontext-pro";

type InputBuilder = fn(&StorybookPrompt, &str, String) -> Map<String, Value>;

fn instant_id_input(prompt: &StorybookPrompt, negative: &str, image: String) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("prompt".into(), json!(prompt.positive()));
    input.insert("negative_prompt".into(), json!(negative));
    input.insert("image".into(), json!(image));
    input.insert("output_format".into(), json!("png"));
    input.insert("sdxl_weights".into(), json!("protovision-xl-high-fidel"));
    input.insert("guidance_scale".into(), json!(5));
    input
}

fn flux_kontext_input(prompt: &StorybookPrompt, negative: &str, image: String) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("prompt".into(), json!(prompt.positive()));
    input.insert("negative_prompt".into(), json!(negative));
    input.insert("input_image".into(), json!(image));
    input.insert("output_format".into(), json!("png"));
    input.insert("safety_tolerance".into(), json!(2));
    input.insert("prompt_upsampling".into(), json!(true));
    input.insert("aspect_ratio".into(), json!("1:1"));
    input
}

fn input_builder(identifier: &str) -> Option<InputBuilder> {
    match identifier {
        INSTANT_ID | INSTANT_ID_PINNED => Some(instant_id_input),
        FLUX_KONTEXT_PRO => Some(flux_kontext_input),
        _ => None,
    }
}

/// Model identifiers with a default input payload, sorted.
pub fn supported_image_models() -> Vec<&'static str> {
    let mut models = vec![INSTANT_ID, INSTANT_ID_PINNED, FLUX_KONTEXT_PRO];
    models.sort_unstable();
    models
}

/// Default model input for `model`, before caller arguments are applied.
///
/// Identifiers are matched case-insensitively; an unknown `owner/model:version`
/// falls back to its `owner/model` part.
///
/// # Errors
///
/// [`ModelErrorKind::UnsupportedModel`] when neither form is known.
pub fn build_prediction_input(
    model: &str,
    prompt: &StorybookPrompt,
    negative_prompt: &str,
    image_input: String,
) -> KidbookResult<Map<String, Value>> {
    let normalized = model.trim().to_lowercase();
    let builder = input_builder(&normalized).or_else(|| {
        normalized
            .split_once(':')
            .and_then(|(base, _)| input_builder(base))
    });

    match builder {
        Some(builder) => Ok(builder(prompt, negative_prompt, image_input)),
        None => Err(ModelError::new(ModelErrorKind::UnsupportedModel {
            model: model.to_string(),
            supported: supported_image_models().join(", "),
        })
        .into()),
    }
}

/// Image output of a finished prediction.
///
/// # Errors
///
/// [`ModelErrorKind::ImageGeneration`] for failed or canceled predictions.
///
/// # Examples
///
/// ```
/// use kidbook_models::prediction_output;
/// use serde_json::json;
///
/// let body = json!({"status": "succeeded", "output": ["https://img/1.png"]});
/// assert_eq!(prediction_output(&body).unwrap().flatten(), vec!["https://img/1.png"]);
/// ```
pub fn prediction_output(body: &Value) -> KidbookResult<ImageOutput> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
    if matches!(status, "failed" | "canceled") {
        let reason = body
            .get("error")
            .filter(|e| !e.is_null())
            .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
            .unwrap_or_else(|| format!("prediction {}", status));
        return Err(ModelError::new(ModelErrorKind::ImageGeneration(reason)).into());
    }
    Ok(ImageOutput::from_json(body.get("output").unwrap_or(&Value::Null)))
}

fn is_terminal(body: &Value) -> bool {
    matches!(
        body.get("status").and_then(Value::as_str),
        Some("succeeded" | "failed" | "canceled") | None
    )
}

/// Image generator backed by the Replicate predictions API.
#[derive(Debug, Clone)]
pub struct ReplicateImageGenerator {
    client: Client,
    api_token: String,
    model: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl ReplicateImageGenerator {
    /// Creates a generator for `model` (`owner/model` or `owner/model:version`).
    #[instrument(skip(api_token))]
    pub fn new(api_token: String, model: String, base_url: String) -> Self {
        debug!(model = %model, url = %base_url, "Created Replicate image generator");
        Self {
            client: Client::new(),
            api_token,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(1),
            max_polls: 300,
        }
    }

    /// Creates a generator from image settings.
    ///
    /// # Errors
    ///
    /// Missing API token or model identifier.
    pub fn from_settings(settings: &ImageModelSettings) -> KidbookResult<Self> {
        let api_token = settings.api_token().clone().ok_or_else(|| {
            ModelError::new(ModelErrorKind::MissingCredentials(
                "Replicate API token is required. Set REPLICATE_API_TOKEN".to_string(),
            ))
        })?;
        let model = settings.model().clone().ok_or_else(|| {
            ConfigError::new(
                "Replicate model identifier is required. Set REPLICATE_MODEL in the form 'owner/model:version'",
            )
        })?;
        Ok(Self::new(api_token, model, settings.base_url().clone()))
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint and body for a prediction with `input`.
    fn prediction_call(&self, input: Map<String, Value>) -> (String, Value) {
        match self.model.split_once(':') {
            Some((_, version)) => (
                format!("{}/predictions", self.base_url),
                json!({"version": version, "input": input}),
            ),
            None => (
                format!("{}/models/{}/predictions", self.base_url, self.model),
                json!({"input": input}),
            ),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> KidbookResult<Value> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Replicate request failed");
                HttpError::new(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, error = %message, "Replicate API error");
            return Err(ModelError::new(ModelErrorKind::Api {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        response.json().await.map_err(|e| {
            ModelError::new(ModelErrorKind::ResponseParsing(format!(
                "Failed to parse prediction: {}",
                e
            )))
            .into()
        })
    }

    /// Poll a prediction that outlived the synchronous wait.
    async fn wait_for(&self, mut body: Value) -> KidbookResult<Value> {
        for attempt in 1..=self.max_polls {
            if is_terminal(&body) {
                return Ok(body);
            }
            let Some(url) = body.pointer("/urls/get").and_then(Value::as_str).map(str::to_string) else {
                return Err(ModelError::new(ModelErrorKind::ResponseParsing(
                    "Pending prediction has no polling URL".to_string(),
                ))
                .into());
            };
            debug!(attempt, status = ?body.get("status"), "Prediction still running");
            tokio::time::sleep(self.poll_interval).await;
            body = self.send(self.client.get(&url)).await?;
        }
        if is_terminal(&body) {
            return Ok(body);
        }
        Err(ModelError::new(ModelErrorKind::ImageGeneration(format!(
            "prediction did not finish after {} polls",
            self.max_polls
        )))
        .into())
    }
}

#[async_trait]
impl ImageGenerator for ReplicateImageGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, kid = %request.kid_name()))]
    async fn generate(&self, request: &ImageRequest) -> KidbookResult<ImageOutput> {
        let prompt = build_storybook_prompt(request)?;
        let image = MediaSource::classify(request.input_image()).to_transport()?;

        let mut input = build_prediction_input(&self.model, &prompt, prompt.negative(), image)?;
        for (key, value) in request.extra() {
            let value = if key == REFERENCE_HISTORY_KEY {
                encode_history(value)?
            } else {
                value.clone()
            };
            input.insert(key.clone(), value);
        }

        let (url, body) = self.prediction_call(input);
        info!(url = %url, "Requesting illustration");
        let prediction = self
            .send(self.client.post(&url).header("Prefer", "wait").json(&body))
            .await?;
        let prediction = self.wait_for(prediction).await?;

        let output = prediction_output(&prediction)?;
        if output.flatten().is_empty() {
            warn!("Prediction finished without output");
        }
        Ok(output)
    }
}

/// Inline local files referenced in a history list.
fn encode_history(value: &Value) -> KidbookResult<Value> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(reference) => {
                    MediaSource::classify(reference).to_transport().map(Value::String)
                }
                other => Ok(other.clone()),
            })
            .collect::<KidbookResult<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}
