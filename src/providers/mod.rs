/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported back ends:
 * - Google: the public Google Translate web endpoint (default)
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One text to translate between two languages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// The text to translate
    pub text: String,
    /// Source language code, passed to the provider as is
    pub source_language: String,
    /// Target language code, passed to the provider as is
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate one text with a single request
    ///
    /// # Arguments
    /// * `request` - The text and language pair
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Display name used in logs
    fn name(&self) -> &str;
}

/// Strip the wrapping an LLM sometimes puts around a bare translation
pub(crate) fn clean_llm_output(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

pub mod anthropic;
pub mod google;
pub mod mock;
pub mod ollama;
