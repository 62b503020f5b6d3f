//! Pipeline integration tests against mocked API endpoints
//!
//! Exercises the observable pipeline behavior: cleaned text wins, cleanup
//! failures fall back to the raw transcript, and transient transcription
//! failures are retried.

use std::time::Duration as StdDuration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use v2t::application::pipeline;
use v2t::application::ports::{ApiError, Transcriber};
use v2t::application::RetryPolicy;
use v2t::domain::audio::AudioClip;
use v2t::infrastructure::{ChatCleaner, WhisperTranscriber};

fn test_clip() -> AudioClip {
    AudioClip::new(vec![0i16; 1600], 16_000, 1)
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, StdDuration::from_millis(1))
}

fn transcription_body(text: &str) -> serde_json::Value {
    json!({ "text": text })
}

fn chat_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

async fn mock_transcription(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mock_chat(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pipeline_displays_cleaned_text() {
    let server = MockServer::start().await;

    mock_transcription(
        &server,
        ResponseTemplate::new(200).set_body_json(transcription_body("um so basically hello world")),
    )
    .await;
    mock_chat(
        &server,
        ResponseTemplate::new(200).set_body_json(chat_body("Hello world")),
    )
    .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("test-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip())
        .await
        .unwrap();

    assert_eq!(result.as_str(), "Hello world");
    assert!(!result.is_fallback());
}

#[tokio::test]
async fn cleanup_server_error_falls_back_to_transcript() {
    let server = MockServer::start().await;

    mock_transcription(
        &server,
        ResponseTemplate::new(200).set_body_json(transcription_body("hello world")),
    )
    .await;

    // 5xx is transient: the retry budget is spent before falling back
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(3)
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("test-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip())
        .await
        .unwrap();

    assert_eq!(result.as_str(), "hello world");
    assert!(result.is_fallback());
}

#[tokio::test]
async fn cleanup_rejection_falls_back_without_retry() {
    let server = MockServer::start().await;

    mock_transcription(
        &server,
        ResponseTemplate::new(200).set_body_json(transcription_body("hello world")),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("test-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip())
        .await
        .unwrap();

    assert_eq!(result.as_str(), "hello world");
    assert!(result.is_fallback());
}

#[tokio::test]
async fn transcription_retries_transient_failures_then_succeeds() {
    let server = MockServer::start().await;

    // First two attempts hit a transient server error, the third succeeds
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcription_body("hello world")))
        .expect(1)
        .mount(&server)
        .await;
    mock_chat(
        &server,
        ResponseTemplate::new(200).set_body_json(chat_body("hello world")),
    )
    .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("test-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip())
        .await
        .unwrap();

    assert_eq!(result.as_str(), "hello world");
    assert!(!result.is_fallback());
}

#[tokio::test]
async fn transcription_unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new("bad-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("bad-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip()).await;

    assert!(matches!(result, Err(ApiError::InvalidApiKey)));
}

#[tokio::test]
async fn transcription_rate_limit_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transcription_body("hello world")))
        .mount(&server)
        .await;
    mock_chat(
        &server,
        ResponseTemplate::new(200).set_body_json(chat_body("hello world")),
    )
    .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("test-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip())
        .await
        .unwrap();

    assert_eq!(result.as_str(), "hello world");
}

#[tokio::test]
async fn empty_transcript_is_an_error() {
    let server = MockServer::start().await;

    mock_transcription(
        &server,
        ResponseTemplate::new(200).set_body_json(transcription_body("   ")),
    )
    .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());

    let result = transcriber.transcribe(&test_clip()).await;
    assert!(matches!(result, Err(ApiError::EmptyResponse)));
}

#[tokio::test]
async fn malformed_cleanup_response_falls_back() {
    let server = MockServer::start().await;

    mock_transcription(
        &server,
        ResponseTemplate::new(200).set_body_json(transcription_body("hello world")),
    )
    .await;
    mock_chat(
        &server,
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    let cleaner = ChatCleaner::new("test-key").with_base_url(server.uri());

    let result = pipeline::run(&transcriber, &cleaner, &fast_policy(), test_clip())
        .await
        .unwrap();

    assert_eq!(result.as_str(), "hello world");
    assert!(result.is_fallback());
}

#[tokio::test]
async fn transcription_request_is_multipart_wav() {
    let server = MockServer::start().await;

    mock_transcription(
        &server,
        ResponseTemplate::new(200).set_body_json(transcription_body("hello world")),
    )
    .await;

    let transcriber = WhisperTranscriber::new("test-key").with_base_url(server.uri());
    transcriber.transcribe(&test_clip()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let auth = request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(auth, "Bearer test-key");

    // The WAV payload travels inside the multipart body
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("clip.wav"));
    assert!(body.contains("whisper-1"));
}
