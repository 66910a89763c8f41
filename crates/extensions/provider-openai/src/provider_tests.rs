use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> OpenAIBackend {
    OpenAIBackend::with_url(Some("test-key".to_string()), None, server.uri())
}

#[test]
fn test_backend_defaults() {
    let backend = OpenAIBackend::new(Some("key".to_string()), None);
    assert_eq!(backend.id(), "openai");
    assert_eq!(backend.model(), DEFAULT_MODEL);
    assert_eq!(backend.api_url, DEFAULT_API_URL);

    let custom = OpenAIBackend::new(None, Some("gpt-4o".to_string()));
    assert_eq!(custom.model(), "gpt-4o");
}

#[tokio::test]
async fn test_missing_key() {
    let backend = OpenAIBackend::new(Some(" ".to_string()), None);
    let err = backend
        .generate(GenerationRequest::new("prompt", 200))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing OPENAI_API_KEY.");
}

#[tokio::test]
async fn test_generate_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "Pick one"}],
            "max_tokens": 700,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"choiceIndex\": 2}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = backend(&server)
        .generate(GenerationRequest::new("Pick one", 700))
        .await
        .unwrap();
    assert_eq!(text, "{\"choiceIndex\": 2}");
}

#[tokio::test]
async fn test_generate_without_choices_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let text = backend(&server)
        .generate(GenerationRequest::new("prompt", 200))
        .await
        .unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .generate(GenerationRequest::new("prompt", 200))
        .await
        .unwrap_err();
    match err {
        ProviderError::ApiError { provider, status, message } => {
            assert_eq!(provider, "OpenAI");
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}
