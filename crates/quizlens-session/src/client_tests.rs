use super::*;
use quizlens_protocols::NO_RATIONALE_PLACEHOLDER;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn answers() -> Vec<String> {
    vec!["3".to_string(), "4".to_string(), "5".to_string()]
}

#[tokio::test]
async fn test_fast_request_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_partial_json(json!({"question": "2+2=?", "mode": "fast"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choiceIndex": 1,
            "confidence": 0.9,
            "explanation": "",
            "wrongAnswers": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(Some(format!("{}/", server.uri()))).unwrap();
    let result = client
        .analyze(AnalyzeRequest::fast("2+2=?", answers()))
        .await
        .unwrap();

    assert_eq!(result.choice_index, 1);
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.explanation, "");
}

#[tokio::test]
async fn test_deep_request_keeps_prior_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_partial_json(json!({"mode": "deep", "choiceIndex": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "explanation": "Basic arithmetic",
            "wrongAnswers": {"0": "too low", "2": "too high"}
        })))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(Some(server.uri())).unwrap();
    let result = client
        .analyze(AnalyzeRequest::deep("2+2=?", answers(), 1, 0.9))
        .await
        .unwrap();

    assert_eq!(result.choice_index, 1);
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.explanation, "Basic arithmetic");
    assert_eq!(result.reason_for(2), "too high");
}

#[tokio::test]
async fn test_malformed_body_normalizes_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(Some(server.uri())).unwrap();
    let result = client
        .analyze(AnalyzeRequest::fast("2+2=?", answers()))
        .await
        .unwrap();

    assert_eq!(result.choice_index, 0);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.explanation, "");
    assert_eq!(result.wrong_answers.len(), 2);
    assert!(result.wrong_answers.values().all(|r| r == NO_RATIONALE_PLACEHOLDER));
}

#[tokio::test]
async fn test_fenced_body_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("```json\n{\"choiceIndex\": 2, \"confidence\": 4}\n```"),
        )
        .mount(&server)
        .await;

    let client = AnalysisClient::new(Some(server.uri())).unwrap();
    let result = client
        .analyze(AnalyzeRequest::fast("2+2=?", answers()))
        .await
        .unwrap();
    assert_eq!(result.choice_index, 2);
    assert_eq!(result.confidence, 1.0);
}

#[tokio::test]
async fn test_non_success_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error":"Missing GEMINI_API_KEY."}"#))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(Some(server.uri())).unwrap();
    let err = client
        .analyze(AnalyzeRequest::fast("2+2=?", answers()))
        .await
        .unwrap_err();

    match err {
        AnalysisError::Transport { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Missing GEMINI_API_KEY."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unconfigured_proxy() {
    let client = AnalysisClient::new(None).unwrap();
    let err = client
        .analyze(AnalyzeRequest::fast("Q", answers()))
        .await
        .unwrap_err();
    assert!(err.is_configuration());

    let blank = AnalysisClient::new(Some("  ".to_string())).unwrap();
    assert!(blank.base_url().is_none());
    assert!(blank.warm_up().await.unwrap_err().is_configuration());
}

#[tokio::test]
async fn test_warm_up_hits_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(Some(server.uri())).unwrap();
    client.warm_up().await.unwrap();
}
