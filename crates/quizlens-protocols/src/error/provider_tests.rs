use super::*;

#[test]
fn test_missing_api_key_message() {
    let err = ProviderError::MissingApiKey("GEMINI_API_KEY".to_string());
    assert_eq!(err.to_string(), "Missing GEMINI_API_KEY.");
}

#[test]
fn test_api_error_message() {
    let err = ProviderError::api("Gemini", 500, "Internal error");
    assert_eq!(err.to_string(), "Gemini error 500: Internal error");
}

#[test]
fn test_model_not_found_by_status() {
    let err = ProviderError::api("Gemini", 404, "gone");
    assert!(err.is_model_not_found());
}

#[test]
fn test_model_not_found_by_message() {
    let err = ProviderError::api(
        "Gemini",
        400,
        "models/gemini-1.0-pro is not supported for generateContent",
    );
    assert!(err.is_model_not_found());

    let err = ProviderError::api("Gemini", 400, "status: NOT_FOUND");
    assert!(err.is_model_not_found());
}

#[test]
fn test_other_errors_are_not_model_not_found() {
    assert!(!ProviderError::api("Gemini", 401, "API key invalid").is_model_not_found());
    assert!(!ProviderError::Network("reset".to_string()).is_model_not_found());
    assert!(!ProviderError::MissingApiKey("KEY".to_string()).is_model_not_found());
}
