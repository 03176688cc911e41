//! Client for OpenAI-compatible chat completion APIs.

use super::{ChatCompletion, ChatRequest, conversions};
use crate::ChatModelSettings;
use async_trait::async_trait;
use kidbook_error::{HttpError, KidbookResult, ModelError, ModelErrorKind};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument};

/// Client for any API that speaks the OpenAI chat completions format.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    base_url: String,
    provider_name: &'static str,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for bearer authentication
    /// * `base_url` - Full chat completions endpoint
    /// * `provider_name` - Name of the provider (for logging/tracing)
    #[instrument(skip(api_key), fields(provider = provider_name))]
    pub fn new(api_key: String, base_url: String, provider_name: &'static str) -> Self {
        debug!(provider = provider_name, url = %base_url, "Created OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key,
            base_url,
            provider_name,
        }
    }

    /// Creates a client from role settings.
    ///
    /// # Errors
    ///
    /// [`ModelErrorKind::MissingCredentials`] when no API key is configured.
    pub fn from_settings(settings: &ChatModelSettings) -> KidbookResult<Self> {
        let api_key = settings.require_api_key()?;
        Ok(Self::new(
            api_key.to_string(),
            settings.base_url().clone(),
            "openai",
        ))
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }
}

#[async_trait]
impl ChatCompletion for OpenAICompatibleClient {
    #[instrument(skip(self, request), fields(provider = self.provider_name, model = %request.model()))]
    async fn complete(&self, request: &ChatRequest) -> KidbookResult<String> {
        let body = conversions::to_wire_request(request)?;

        debug!(
            provider = self.provider_name,
            message_count = request.messages().len(),
            "Sending request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider_name, error = ?e, "HTTP request failed");
                HttpError::new(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                provider = self.provider_name,
                status = %status,
                error = %error_text,
                "API error"
            );
            return Err(ModelError::new(ModelErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            })
            .into());
        }

        let payload: Value = response.json().await.map_err(|e| {
            error!(provider = self.provider_name, error = ?e, "Failed to parse response");
            ModelError::new(ModelErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        let text = conversions::parse_chat_response(&payload)?;
        debug!(provider = self.provider_name, chars = text.len(), "Received response");
        Ok(text)
    }
}
