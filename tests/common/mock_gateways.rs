/*!
 * Translation gateways for tests
 *
 * These implement `TranslationGateway` directly, so the transformer and the
 * controller can be exercised without request pacing or any network access.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use editorjs_translator::errors::ProviderError;
use editorjs_translator::TranslationGateway;

/// One call received by a gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Gateway translating from a table, tagging unknown text with the target language
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    table: HashMap<String, String>,
    fail_on: Option<String>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl ScriptedGateway {
    /// Gateway that answers `[target] text` for everything
    pub fn tagging() -> Self {
        Self::default()
    }

    /// Gateway answering from `entries`
    pub fn with_table(entries: &[(&str, &str)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(source, translated)| (source.to_string(), translated.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Gateway failing with a server error when asked to translate `text`
    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// What `translate` answers for `text`, without recording a call
    pub fn expected(&self, text: &str, target_language: &str) -> String {
        self.table
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target_language, text))
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts received so far, in order
    pub fn texts(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.text).collect()
    }
}

#[async_trait]
impl TranslationGateway for ScriptedGateway {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(GatewayCall {
            text: text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        });

        if self.fail_on.as_deref() == Some(text) {
            return Err(ProviderError::ApiError {
                status_code: 503,
                message: "service unavailable".to_string(),
            });
        }

        Ok(self.expected(text, target_language))
    }
}
