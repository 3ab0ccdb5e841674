use axum::http::StatusCode;
use std::time::Duration;

use crate::services::GenerationBackend;
use crate::services::tutor::{ErrorKind, TutorError};
use crate::tests::common::{
    TEST_MODEL, ollama_client, spawn_backend, spawn_stalled_backend, unreachable_backend_url, wait_for,
};

#[tokio::test]
async fn test_sends_single_non_streaming_request() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"ሰላም! (selam!)","done":true}"#).await;

    let reply = backend.client().generate("Say hello in Amharic").await.unwrap();
    assert_eq!(reply.text, "ሰላም! (selam!)");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        serde_json::json!({ "model": TEST_MODEL, "prompt": "Say hello in Amharic", "stream": false })
    );
}

#[tokio::test]
async fn test_server_error_is_backend_unavailable() {
    let backend =
        spawn_backend(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"model 'llama3' not found"}"#)
            .await;

    let err = backend.client().generate("prompt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("model 'llama3' not found"));
    // no retry
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_missing_response_field_is_empty_reply() {
    let backend = spawn_backend(StatusCode::OK, "{}").await;

    let reply = backend.client().generate("prompt").await.unwrap();
    assert_eq!(reply.text, "");
}

#[tokio::test]
async fn test_unparseable_success_body_is_unexpected() {
    let backend = spawn_backend(StatusCode::OK, "<html>proxy page</html>").await;

    let err = backend.client().generate("prompt").await.unwrap_err();
    assert!(matches!(err, TutorError::Unexpected(_)));
}

#[tokio::test]
async fn test_connection_refused_is_backend_unavailable() {
    let client = ollama_client(&unreachable_backend_url().await);

    let err = client.generate("prompt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
}

#[tokio::test]
async fn test_dropping_generate_cancels_backend_call() {
    let (url, handler_dropped) = spawn_stalled_backend().await;
    let client = ollama_client(&url);

    let outcome = tokio::time::timeout(Duration::from_millis(300), client.generate("prompt")).await;
    assert!(outcome.is_err(), "stalled backend should not answer");

    // the abandoned connection closes and the backend drops its handler
    assert!(wait_for(&handler_dropped, Duration::from_secs(5)).await);
}
