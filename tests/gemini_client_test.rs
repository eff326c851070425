// Gemini client and clue service against a local mockito server.

use mockito::{Matcher, Server};
use std::time::Duration;

use cluesmith::error::ProviderError;
use cluesmith::llm::{GeminiClient, GenerateRequest, LlmClient};
use cluesmith::model::ClueRequest;
use cluesmith::retry::{Classification, RetryPolicy};
use cluesmith::service::ClueService;

const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

fn client(base_url: String) -> GeminiClient {
    GeminiClient::with_base_url(
        "test-key".to_string(),
        "gemini-2.5-flash".to_string(),
        base_url,
        1024,
        10,
    )
    .unwrap()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3)
        .with_base_delay(Duration::from_millis(1))
        .with_max_jitter(Duration::ZERO)
}

fn text_response(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_sends_key_and_returns_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "define listen"}]}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response("To pay attention to sound"))
        .create_async()
        .await;

    let text = client(server.url())
        .generate(&GenerateRequest::new("define listen"))
        .await
        .unwrap();
    assert_eq!(text, "To pay attention to sound");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_http_error_keeps_status_and_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(400)
        .with_body(r#"{"error": {"status": "INVALID_ARGUMENT", "message": "API key not valid"}}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .generate(&GenerateRequest::new("p"))
        .await
        .unwrap_err();
    match err {
        ProviderError::Http { status, ref body } => {
            assert_eq!(status, 400);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_json() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body("<html>proxy</html>")
        .create_async()
        .await;

    let err = client(server.url())
        .generate(&GenerateRequest::new("p"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidJson(_)));
}

#[tokio::test]
async fn test_service_generates_clues_from_fenced_response() {
    let mut server = Server::new_async().await;
    let body = "```json\n[{\"clue\": \"Silent rearrangement to pay attention (6)\", \"explanation\": \"Anagram of SILENT\"}]\n```";
    let _mock = server
        .mock("POST", ENDPOINT)
        .match_body(Matcher::PartialJson(serde_json::json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .with_status(200)
        .with_body(text_response(body))
        .create_async()
        .await;

    let service = ClueService::new(Box::new(client(server.url()))).with_policy(fast_policy());
    let clues = service
        .generate_clues(&ClueRequest::new("LISTEN", "Pay attention"))
        .await
        .unwrap();
    assert_eq!(clues.len(), 1);
    assert_eq!(clues[0].clue, "Silent rearrangement to pay attention (6)");
}

#[tokio::test]
async fn test_service_retries_429_until_attempts_run_out() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(429)
        .with_body(r#"{"error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}}"#)
        .expect(3)
        .create_async()
        .await;

    let service = ClueService::new(Box::new(client(server.url()))).with_policy(fast_policy());
    let err = service
        .generate_clues(&ClueRequest::new("LISTEN", "Pay attention"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.classification(), Classification::RateLimited);
    assert_eq!(err.attempts(), 3);
    assert!(err.to_string().contains("currently busy"));
}

#[tokio::test]
async fn test_service_does_not_retry_invalid_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(400)
        .with_body(r#"{"error": {"status": "INVALID_ARGUMENT", "details": [{"reason": "API_KEY_INVALID"}]}}"#)
        .expect(1)
        .create_async()
        .await;

    let service = ClueService::new(Box::new(client(server.url()))).with_policy(fast_policy());
    let err = service.find_definition("listen").await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.classification(), Classification::Permanent);
    assert_eq!(
        err.to_string(),
        "The API key is invalid or missing. Please check your configuration."
    );
}

#[tokio::test]
async fn test_service_safety_block_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let service = ClueService::new(Box::new(client(server.url()))).with_policy(fast_policy());
    let err = service
        .generate_clues(&ClueRequest::new("LISTEN", "Pay attention"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.to_string().contains("blocked for safety reasons"));
}

#[tokio::test]
async fn test_service_does_not_retry_400_whose_body_mentions_429() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(400)
        .with_body(r#"{"error": {"status": "INVALID_ARGUMENT", "message": "maxOutputTokens 429 out of range"}}"#)
        .expect(1)
        .create_async()
        .await;

    let service = ClueService::new(Box::new(client(server.url()))).with_policy(fast_policy());
    let err = service
        .generate_clues(&ClueRequest::new("LISTEN", "Pay attention"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.classification(), Classification::Permanent);
    assert!(!err.to_string().contains("currently busy"));
}
