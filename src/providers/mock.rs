/*!
 * Mock provider implementation for tests and dry runs.
 *
 * This module provides a provider that never touches the network:
 * - `MockProvider::working()` - Tags the text with the target language
 * - `MockProvider::dictionary(..)` - Looks translations up in a fixed table
 * - `MockProvider::intermittent(n)` - Fails every Nth request
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[target] text`
    Working,
    /// Translates from a fixed table, echoing unknown text
    Dictionary(HashMap<String, String>),
    /// Fails on every Nth request (1-based) with a connection error
    Intermittent { fail_every: usize },
    /// Fails whenever the text equals the given value
    FailOn(String),
    /// Always fails with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider translating from a fixed table
    pub fn dictionary<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(MockBehavior::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock provider that fails on one specific text
    pub fn fail_on(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailOn(text.into()))
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().push(request.clone());

        match &self.behavior {
            MockBehavior::Working => Ok(format!("[{}] {}", request.target_language, request.text)),
            MockBehavior::Dictionary(table) => Ok(table
                .get(&request.text)
                .cloned()
                .unwrap_or_else(|| request.text.clone())),
            MockBehavior::Intermittent { fail_every } => {
                if *fail_every > 0 && count % fail_every == 0 {
                    Err(ProviderError::ConnectionError(format!(
                        "Simulated connection failure on request {}",
                        count
                    )))
                } else {
                    Ok(format!("[{}] {}", request.target_language, request.text))
                }
            }
            MockBehavior::FailOn(text) if *text == request.text => Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated failure for '{}'", text),
            }),
            MockBehavior::FailOn(_) => Ok(format!("[{}] {}", request.target_language, request.text)),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated provider outage".to_string(),
            )),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated provider outage".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
