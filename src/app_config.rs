/*!
 * Application configuration.
 *
 * This module handles the application configuration including loading,
 * validating and saving configuration settings.
 */

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::database::{DatabaseBackend, DatabaseQuery, DocumentSource, PostgresSettings};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation::FieldPolicy;

/// Smallest accepted pause before each translation request, in milliseconds
pub const MIN_REQUEST_DELAY_MS: u64 = 500;

/// Largest accepted number of retries per request
pub const MAX_RETRY_COUNT: u32 = 10;

/// Largest accepted retry backoff base, in milliseconds
pub const MAX_RETRY_BACKOFF_MS: u64 = 60_000;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the stored document
    pub source_language: String,

    /// Language to translate into
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Which fields of which block types are translated
    #[serde(default)]
    pub policy: FieldPolicy,

    /// Where the source document comes from
    #[serde(default)]
    pub source: SourceConfig,

    /// Where the translated document goes
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Translate web endpoint
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
    // @provider: In-process mock, no network
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (LLM providers only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Fixed delay in milliseconds before every request
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Retry count for transient failures (0 disables retrying)
    #[serde(default)]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Memoize translations of identical text within a run
    #[serde(default)]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            request_delay_ms: default_request_delay_ms(),
            retry_count: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            cache_enabled: false,
        }
    }
}

/// Location of the source document
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SourceConfig {
    /// JSON file holding the document; takes precedence over the database
    #[serde(default)]
    pub input_file: Option<PathBuf>,

    /// SQLite database file; takes precedence over PostgreSQL
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// PostgreSQL server, used when no SQLite file is set
    #[serde(default)]
    pub postgres: Option<PostgresSettings>,

    /// File containing the SQL query returning one row per language
    #[serde(default)]
    pub sql_query_path: Option<PathBuf>,

    /// Column holding the document JSON
    #[serde(default)]
    pub column_name: Option<String>,

    /// Column holding the row's language code
    #[serde(default)]
    pub language_column_name: Option<String>,
}

impl SourceConfig {
    /// Turn the settings into a concrete document source
    pub fn resolve(&self) -> Result<DocumentSource, AppError> {
        if let Some(path) = &self.input_file {
            return Ok(DocumentSource::File(path.clone()));
        }

        let backend = match (&self.database_path, &self.postgres) {
            (Some(database_path), _) => DatabaseBackend::Sqlite(database_path.clone()),
            (None, Some(settings)) if !settings.host.trim().is_empty() => {
                if settings.database.trim().is_empty() {
                    return Err(missing_input("the PostgreSQL database name"));
                }
                DatabaseBackend::Postgres(settings.clone())
            }
            _ => return Err(missing_input("the database path, a PostgreSQL host (or an input file)")),
        };
        let sql_query_path = self
            .sql_query_path
            .clone()
            .ok_or_else(|| missing_input("the path to the SQL query"))?;
        let column_name = self
            .column_name
            .clone()
            .ok_or_else(|| missing_input("the column name to translate"))?;
        let language_column_name = self
            .language_column_name
            .clone()
            .ok_or_else(|| missing_input("the column name with the language"))?;

        Ok(DocumentSource::Database(DatabaseQuery {
            backend,
            sql_query_path,
            column_name,
            language_column_name,
        }))
    }
}

fn missing_input(what: &str) -> AppError {
    AppError::Configuration(format!("Please provide {}", what))
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// File the translated document is written to
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Pretty-print the JSON
    #[serde(default)]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_request_delay_ms() -> u64 {
    MIN_REQUEST_DELAY_MS
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output_editorjs.json")
}

fn default_model(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::Ollama => "llama3.2:3b".to_string(),
        TranslationProvider::Anthropic => "claude-3-haiku-20240307".to_string(),
        TranslationProvider::Google | TranslationProvider::Mock => String::new(),
    }
}

fn default_endpoint(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::Google => crate::providers::google::DEFAULT_GOOGLE_ENDPOINT.to_string(),
        TranslationProvider::Ollama => "http://localhost:11434".to_string(),
        TranslationProvider::Anthropic => "https://api.anthropic.com".to_string(),
        TranslationProvider::Mock => String::new(),
    }
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the user's text from {source_language} to {target_language}. \
     Reply with the translation only, keeping any inline HTML tags and entities exactly as they are."
        .to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.source_language.trim().is_empty() {
            return Err(AppError::Configuration("Please provide the input language".to_string()));
        }
        if self.target_language.trim().is_empty() {
            return Err(AppError::Configuration("Please provide the desired language".to_string()));
        }

        if self.translation.common.request_delay_ms < MIN_REQUEST_DELAY_MS {
            return Err(AppError::Configuration(format!(
                "request_delay_ms must be at least {} (got {})",
                MIN_REQUEST_DELAY_MS, self.translation.common.request_delay_ms
            )));
        }

        let common = &self.translation.common;
        if common.retry_count > MAX_RETRY_COUNT {
            return Err(AppError::Configuration(format!(
                "retry_count must be at most {} (got {})",
                MAX_RETRY_COUNT, common.retry_count
            )));
        }
        if common.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(AppError::Configuration(format!(
                "retry_backoff_ms must be at most {} (got {})",
                MAX_RETRY_BACKOFF_MS, common.retry_backoff_ms
            )));
        }

        if self.translation.provider == TranslationProvider::Anthropic
            && self.translation.get_api_key().is_empty()
        {
            return Err(AppError::Configuration(
                "Translation API key is required for Anthropic provider".to_string(),
            ));
        }

        if self.policy.default_field.trim().is_empty() {
            return Err(AppError::Configuration("policy.default_field cannot be empty".to_string()));
        }

        for block_type in self.policy.shadowed_mappings() {
            warn!("Block type '{}' is forbidden; its field mapping is never used", block_type);
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            translation: TranslationConfig::default(),
            policy: FieldPolicy::default(),
            source: SourceConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Configuration written when no config file exists yet.
    ///
    /// The languages are left blank so a run fails validation until they are
    /// given on the command line or filled in.
    pub fn template() -> Self {
        Config {
            source_language: String::new(),
            target_language: String::new(),
            ..Config::default()
        }
    }

    /// Load the config file, writing the template when it is missing
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if FileManager::file_exists(config_path) {
            let json = FileManager::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            warn!("Config file not found at {:?}, creating default config.", config_path);

            let config = Config::template();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;
            FileManager::write_to_file(config_path, &config_json)?;

            Ok(config)
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to a provider configuration, created with defaults if missing
    pub fn provider_config_mut(&mut self, provider_type: &TranslationProvider) -> &mut ProviderConfig {
        let provider_str = provider_type.to_lowercase_string();
        let position = match self
            .available_providers
            .iter()
            .position(|p| p.provider_type == provider_str)
        {
            Some(position) => position,
            None => {
                self.available_providers.push(ProviderConfig::new(provider_type.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) if !provider_config.model.is_empty() => provider_config.model.clone(),
            _ => default_model(&self.provider),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) if !provider_config.endpoint.is_empty() => provider_config.endpoint.clone(),
            _ => default_endpoint(&self.provider),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
