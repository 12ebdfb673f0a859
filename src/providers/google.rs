use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// Default endpoint of the public Google Translate web API
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the keyless Google Translate endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Full URL of the `translate_a/single` endpoint
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new client; an empty endpoint selects the public one
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_GOOGLE_ENDPOINT.to_string()
            } else {
                endpoint
            },
        }
    }

    /// Build the GET URL for one request
    pub fn request_url(&self, request: &TranslationRequest) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", self.endpoint, e)))
    }

    /// Extract the translated text from a response body.
    ///
    /// The body is a nested array whose first element lists the translated
    /// sentences; each sentence is an array starting with the translated text.
    pub fn extract_text_from_response(body: &Value) -> Result<String, ProviderError> {
        let sentences = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Response has no sentence list".to_string()))?;

        let translated: String = sentences
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() && !sentences.is_empty() {
            return Err(ProviderError::ParseError(
                "Response sentences carry no translated text".to_string(),
            ));
        }

        Ok(translated)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let url = self.request_url(request)?;
        debug!("Google Translate request ({} -> {})", request.source_language, request.target_language);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_text_from_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate(&TranslationRequest::new("hello", "en", "fr"))
            .await
            .map(|_| ())
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
