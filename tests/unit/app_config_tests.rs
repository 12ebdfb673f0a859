/*!
 * Tests for application configuration
 */

use std::path::PathBuf;
use std::str::FromStr;

use editorjs_translator::app_config::{
    Config, LogLevel, TranslationProvider, MAX_RETRY_BACKOFF_MS, MAX_RETRY_COUNT, MIN_REQUEST_DELAY_MS,
};
use editorjs_translator::database::{DatabaseBackend, DocumentSource, PostgresSettings};
use editorjs_translator::errors::AppError;

#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.common.request_delay_ms, 500);
    assert_eq!(config.translation.common.retry_count, 0);
    assert!(!config.translation.common.cache_enabled);
    assert_eq!(config.output.path, PathBuf::from("output_editorjs.json"));
    assert!(!config.output.pretty);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_validate_delayBelowMinimum_shouldFail() {
    let mut config = Config::default();
    config.translation.common.request_delay_ms = MIN_REQUEST_DELAY_MS - 1;

    let err = config.validate().unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("request_delay_ms"));
}

#[test]
fn test_validate_retryCountAboveMaximum_shouldFail() {
    let mut config = Config::default();
    config.translation.common.retry_count = MAX_RETRY_COUNT;
    assert!(config.validate().is_ok());

    config.translation.common.retry_count = 40;
    let err = config.validate().unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("retry_count"));
}

#[test]
fn test_validate_retryBackoffAboveMaximum_shouldFail() {
    let mut config = Config::default();
    config.translation.common.retry_backoff_ms = MAX_RETRY_BACKOFF_MS + 1;

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("retry_backoff_ms"));
}

#[test]
fn test_template_withoutLanguages_shouldAskForInputLanguage() {
    let mut config = Config::template();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Please provide the input language"));

    config.source_language = "en".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Please provide the desired language"));

    config.target_language = "de".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_emptyLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "  ".to_string();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("desired language"));
}

#[test]
fn test_validate_anthropicWithoutKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());

    config
        .translation
        .provider_config_mut(&TranslationProvider::Anthropic)
        .api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_emptyDefaultField_shouldFail() {
    let mut config = Config::default();
    config.policy.default_field = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_deserialize_minimalConfig_shouldFillDefaults() {
    let config: Config = serde_json::from_str(r#"{"source_language":"de","target_language":"es"}"#).unwrap();

    assert_eq!(config.source_language, "de");
    assert_eq!(config.translation.common.request_delay_ms, 500);
    assert_eq!(config.policy.default_field, "text");
    assert!(config.policy.forbidden_types.contains("toc"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_serialize_defaultConfig_shouldRoundTrip() {
    let json = serde_json::to_string_pretty(&Config::default()).unwrap();
    let restored: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.translation.provider, TranslationProvider::Google);
    assert_eq!(restored.policy, Config::default().policy);
    assert_eq!(restored.translation.available_providers.len(), 3);
}

#[test]
fn test_loadOrCreate_missingFile_shouldWriteTemplateWithoutLanguages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings").join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.is_file());
    assert!(config.source_language.is_empty());
    assert!(config.validate().unwrap_err().to_string().contains("Please provide the input language"));

    let written: Config = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.policy, config.policy);
}

#[test]
fn test_loadOrCreate_existingFile_shouldLoadItUnchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");
    let json = r#"{"source_language":"de","target_language":"es"}"#;
    std::fs::write(&path, json).unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!((config.source_language.as_str(), config.target_language.as_str()), ("de", "es"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), json);
}

#[test]
fn test_loadOrCreate_invalidJson_shouldNameTheFile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_or_create(&path).unwrap_err();

    assert!(format!("{:#}", err).contains("conf.json"));
}

#[test]
fn test_translationProvider_fromStr_shouldAcceptAnyCase() {
    assert_eq!(TranslationProvider::from_str("Google").unwrap(), TranslationProvider::Google);
    assert_eq!(TranslationProvider::from_str("OLLAMA").unwrap(), TranslationProvider::Ollama);
    assert_eq!(TranslationProvider::from_str("mock").unwrap(), TranslationProvider::Mock);
    assert!(TranslationProvider::from_str("openai").is_err());
    assert_eq!(TranslationProvider::Anthropic.to_string(), "anthropic");
}

#[test]
fn test_providerAccessors_shouldFallBackToDefaults() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_model(), "llama3.2:3b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_timeout_secs(), 30);
    assert!(config.translation.get_api_key().is_empty());
}

#[test]
fn test_providerConfigMut_missingProvider_shouldCreateEntry() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    config.translation.provider_config_mut(&TranslationProvider::Ollama).model = "mistral".to_string();
    config.translation.provider = TranslationProvider::Ollama;

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "mistral");
}

#[test]
fn test_sourceResolve_inputFile_shouldTakePrecedence() {
    let mut config = Config::default();
    config.source.input_file = Some(PathBuf::from("page.json"));
    config.source.database_path = Some(PathBuf::from("site.db"));

    assert_eq!(
        config.source.resolve().unwrap(),
        DocumentSource::File(PathBuf::from("page.json"))
    );
}

#[test]
fn test_sourceResolve_databaseWithoutColumn_shouldAskForIt() {
    let mut config = Config::default();
    config.source.database_path = Some(PathBuf::from("site.db"));
    config.source.sql_query_path = Some(PathBuf::from("page.sql"));
    config.source.language_column_name = Some("lang".to_string());

    let err = config.source.resolve().unwrap_err();

    assert!(matches!(err, AppError::Configuration(_)));
    assert!(err.to_string().contains("Please provide the column name to translate"));
}

#[test]
fn test_sourceResolve_nothingConfigured_shouldFail() {
    let config = Config::default();
    assert!(config.source.resolve().is_err());
}

#[test]
fn test_sourceResolve_completeDatabaseSettings_shouldBuildQuery() {
    let mut config = Config::default();
    config.source.database_path = Some(PathBuf::from("site.db"));
    config.source.sql_query_path = Some(PathBuf::from("page.sql"));
    config.source.column_name = Some("body".to_string());
    config.source.language_column_name = Some("lang".to_string());

    match config.source.resolve().unwrap() {
        DocumentSource::Database(query) => {
            assert_eq!(query.backend, DatabaseBackend::Sqlite(PathBuf::from("site.db")));
            assert_eq!(query.column_name, "body");
            assert_eq!(query.language_column_name, "lang");
        }
        other => panic!("unexpected source: {:?}", other),
    }
}

fn postgres_source_config() -> Config {
    let mut config = Config::default();
    config.source.postgres = Some(PostgresSettings {
        host: "db.internal".to_string(),
        port: Some(5433),
        database: "cms".to_string(),
        user: Some("editor".to_string()),
        password: None,
    });
    config.source.sql_query_path = Some(PathBuf::from("page.sql"));
    config.source.column_name = Some("body".to_string());
    config.source.language_column_name = Some("lang".to_string());
    config
}

#[test]
fn test_sourceResolve_postgresSettings_shouldBuildPostgresQuery() {
    let config = postgres_source_config();

    match config.source.resolve().unwrap() {
        DocumentSource::Database(query) => match query.backend {
            DatabaseBackend::Postgres(settings) => {
                assert_eq!(settings.host, "db.internal");
                assert_eq!(settings.port(), 5433);
            }
            other => panic!("unexpected backend: {:?}", other),
        },
        other => panic!("unexpected source: {:?}", other),
    }
}

#[test]
fn test_sourceResolve_sqliteAndPostgres_shouldPreferSqlite() {
    let mut config = postgres_source_config();
    config.source.database_path = Some(PathBuf::from("site.db"));

    match config.source.resolve().unwrap() {
        DocumentSource::Database(query) => {
            assert_eq!(query.backend, DatabaseBackend::Sqlite(PathBuf::from("site.db")));
        }
        other => panic!("unexpected source: {:?}", other),
    }
}

#[test]
fn test_sourceResolve_postgresWithoutDatabaseName_shouldAskForIt() {
    let mut config = postgres_source_config();
    if let Some(settings) = config.source.postgres.as_mut() {
        settings.database.clear();
    }

    let err = config.source.resolve().unwrap_err();

    assert!(err.to_string().contains("Please provide the PostgreSQL database name"));
}

#[test]
fn test_serialize_postgresSettings_shouldOmitMissingPassword() {
    let json = serde_json::to_string(&postgres_source_config()).unwrap();

    assert!(json.contains("\"host\":\"db.internal\""));
    assert!(!json.contains("password"));
}
