/*!
 * Core translation service implementation.
 *
 * This module defines the `TranslationGateway` seam the document transformer
 * translates through, and `TranslationService`, the gateway backed by one of
 * the configured providers. The service waits a fixed delay before every
 * request, optionally retries transient failures with exponential backoff and
 * optionally memoizes results.
 */

use async_trait::async_trait;
use log::{debug, trace, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationCommonConfig, TranslationConfig, TranslationProvider};
use crate::errors::{AppError, ProviderError};
use crate::providers::anthropic::Anthropic;
use crate::providers::google::GoogleTranslate;
use crate::providers::mock::MockProvider;
use crate::providers::ollama::Ollama;
use crate::providers::{Provider, TranslationRequest};
use super::cache::{truncate_text, CacheStats, TranslationCache};

/// Longest wait between two attempts, whatever the attempt number
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Narrow translation interface used by the document transformer
#[async_trait]
pub trait TranslationGateway: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
impl<T: TranslationGateway + ?Sized> TranslationGateway for Arc<T> {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        (**self).translate(text, source_language, target_language).await
    }
}

/// Request pacing, retry and caching settings of the service
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Fixed wait before every request
    pub request_delay: Duration,
    /// Extra attempts after a transient failure
    pub retry_count: u32,
    /// Base backoff, doubled on each retry
    pub retry_backoff: Duration,
    /// Memoize on `(text, source, target)`
    pub cache_enabled: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(500),
            retry_count: 0,
            retry_backoff: Duration::from_millis(1000),
            cache_enabled: false,
        }
    }
}

impl TranslationOptions {
    /// Build options from the common translation settings
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(common.request_delay_ms),
            retry_count: common.retry_count,
            retry_backoff: Duration::from_millis(common.retry_backoff_ms),
            cache_enabled: common.cache_enabled,
        }
    }

    /// Wait before retry number `attempt + 1`: `retry_backoff * 2^attempt`, capped
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.retry_backoff.checked_mul(factor))
            .map_or(MAX_RETRY_BACKOFF, |backoff| backoff.min(MAX_RETRY_BACKOFF))
    }

    /// No delay, no retry, no cache; for in-process providers
    pub fn immediate() -> Self {
        Self {
            request_delay: Duration::ZERO,
            retry_count: 0,
            retry_backoff: Duration::ZERO,
            cache_enabled: false,
        }
    }
}

/// Translation gateway backed by a provider
#[derive(Debug)]
pub struct TranslationService {
    provider: Box<dyn Provider>,
    options: TranslationOptions,
    cache: TranslationCache,
    requests_sent: AtomicUsize,
}

impl TranslationService {
    /// Create the service for the provider selected in the configuration
    pub fn new(config: &TranslationConfig) -> Result<Self, AppError> {
        let provider = build_provider(config)?;
        Ok(Self::with_provider(provider, TranslationOptions::from_config(&config.common)))
    }

    /// Create the service around an existing provider
    pub fn with_provider(provider: Box<dyn Provider>, options: TranslationOptions) -> Self {
        let cache = TranslationCache::new(options.cache_enabled);
        Self {
            provider,
            options,
            cache,
            requests_sent: AtomicUsize::new(0),
        }
    }

    /// Display name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Pacing/retry/cache settings in use
    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// Check that the provider answers; paced like any other request
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.pace().await;
        self.provider.test_connection().await
    }

    /// Number of requests handed to the provider, retries included
    pub fn requests_sent(&self) -> usize {
        self.requests_sent.load(Ordering::SeqCst)
    }

    /// Cache hit/miss counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn pace(&self) {
        if !self.options.request_delay.is_zero() {
            tokio::time::sleep(self.options.request_delay).await;
        }
    }

    async fn request_with_retry(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let mut attempt = 0;

        loop {
            self.pace().await;

            self.requests_sent.fetch_add(1, Ordering::SeqCst);
            match self.provider.translate(request).await {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_transient() && attempt < self.options.retry_count => {
                    let backoff = self.options.backoff_for(attempt);
                    attempt += 1;
                    warn!(
                        "{} request failed: {} - retry {}/{} in {:?}",
                        self.provider.name(),
                        e,
                        attempt,
                        self.options.retry_count,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl TranslationGateway for TranslationService {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            trace!("Skipping request for blank text");
            return Ok(text.to_string());
        }

        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(cached);
        }

        debug!("Translating text: {}", truncate_text(text, 80));
        let request = TranslationRequest::new(text, source_language, target_language);
        let translated = self.request_with_retry(&request).await?;
        trace!("Translated '{}' -> '{}'", truncate_text(text, 40), truncate_text(&translated, 40));

        self.cache.store(text, source_language, target_language, &translated);
        Ok(translated)
    }
}

/// Instantiate the client for the active provider
fn build_provider(config: &TranslationConfig) -> Result<Box<dyn Provider>, AppError> {
    let common = &config.common;
    let timeout_secs = config.get_timeout_secs();

    let provider: Box<dyn Provider> = match config.provider {
        TranslationProvider::Google => Box::new(GoogleTranslate::new(config.get_endpoint(), timeout_secs)),
        TranslationProvider::Ollama => Box::new(Ollama::new(
            &config.get_endpoint(),
            config.get_model(),
            &common.system_prompt,
            common.temperature,
            timeout_secs,
        )),
        TranslationProvider::Anthropic => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(AppError::Configuration(
                    "Translation API key is required for Anthropic provider".to_string(),
                ));
            }
            Box::new(Anthropic::new(
                api_key,
                config.get_endpoint(),
                config.get_model(),
                &common.system_prompt,
                common.temperature,
                timeout_secs,
            ))
        }
        TranslationProvider::Mock => Box::new(MockProvider::working()),
    };

    Ok(provider)
}
