/*!
 * Tests for provider implementations that do not need a running service
 */

use serde_json::json;

use editorjs_translator::errors::ProviderError;
use editorjs_translator::providers::google::GoogleTranslate;
use editorjs_translator::providers::mock::{MockBehavior, MockProvider};
use editorjs_translator::providers::ollama::Ollama;
use editorjs_translator::providers::{Provider, TranslationRequest};

#[test]
fn test_google_requestUrl_customEndpoint_shouldKeepEndpointAndGtxClient() {
    let client = GoogleTranslate::new("http://localhost:8080/translate_a/single", 5);

    let url = client
        .request_url(&TranslationRequest::new("<b>Hi</b> there", "en", "pt-BR"))
        .unwrap();

    assert_eq!(url.host_str(), Some("localhost"));
    assert_eq!(url.path(), "/translate_a/single");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("client".to_string(), "gtx".to_string())));
    assert!(pairs.contains(&("dt".to_string(), "t".to_string())));
    assert!(pairs.contains(&("tl".to_string(), "pt-BR".to_string())));
    assert!(pairs.contains(&("q".to_string(), "<b>Hi</b> there".to_string())));
}

#[test]
fn test_google_requestUrl_invalidEndpoint_shouldFailWithRequestFailed() {
    let client = GoogleTranslate::new("not a url", 5);

    let result = client.request_url(&TranslationRequest::new("Hi", "en", "fr"));

    assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
}

#[test]
fn test_google_extractText_emptySentenceList_shouldReturnEmptyText() {
    let body = json!([[], null, "en"]);
    assert_eq!(GoogleTranslate::extract_text_from_response(&body).unwrap(), "");
}

#[test]
fn test_google_extractText_sentencesWithoutText_shouldFail() {
    let body = json!([[[null, "Hello"]], null, "en"]);
    assert!(matches!(
        GoogleTranslate::extract_text_from_response(&body),
        Err(ProviderError::ParseError(_))
    ));
}

#[test]
fn test_ollama_buildRequest_shouldCarryTemperature() {
    let ollama = Ollama::new("localhost:11434", "llama3.2:3b", "{source_language}->{target_language}", 0.5, 30);

    let request = ollama.build_request(&TranslationRequest::new("Hello", "de", "it"));
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["system"], "de->it");
    assert_eq!(json["options"]["temperature"], 0.5);
}

#[tokio::test]
async fn test_mock_working_shouldTagWithTargetLanguage() {
    let mock = MockProvider::working();

    let translated = mock.translate(&TranslationRequest::new("Hello", "en", "fr")).await.unwrap();

    assert_eq!(translated, "[fr] Hello");
    assert_eq!(mock.name(), "Mock");
    assert!(mock.test_connection().await.is_ok());
}

#[tokio::test]
async fn test_mock_failOn_shouldOnlyFailMatchingText() {
    let mock = MockProvider::fail_on("boom");

    assert!(mock.translate(&TranslationRequest::new("fine", "en", "fr")).await.is_ok());
    let err = mock
        .translate(&TranslationRequest::new("boom", "en", "fr"))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError { status_code: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_mock_failing_shouldFailConnectionTest() {
    let mock = MockProvider::new(MockBehavior::Failing);

    assert!(mock.test_connection().await.is_err());
    assert!(mock.translate(&TranslationRequest::new("Hello", "en", "fr")).await.is_err());
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_mock_clones_shouldShareRequestLog() {
    let mock = MockProvider::working();
    let observer = mock.clone();

    mock.translate(&TranslationRequest::new("a", "en", "fr")).await.unwrap();
    mock.translate(&TranslationRequest::new("b", "en", "fr")).await.unwrap();

    let texts: Vec<String> = observer.requests().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["a", "b"]);
}
