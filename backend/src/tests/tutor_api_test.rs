use axum::http::{StatusCode, header};
use serde_json::json;
use std::sync::Arc;

use crate::services::tutor::{ANCHOR_DIRECTIVE, PROFILE_MARKER, SESSION_MARKER};
use crate::tests::common::{
    MockBackend, TEST_MODEL, ollama_client, post_json, send, spawn_backend, test_app,
    unreachable_backend_url,
};

fn prompt_of(backend: &MockBackend) -> String {
    let requests = backend.requests();
    assert_eq!(requests.len(), 1, "expected exactly one backend call");
    assert_eq!(requests[0]["model"], TEST_MODEL);
    assert_eq!(requests[0]["stream"], false);
    requests[0]["prompt"].as_str().unwrap().to_string()
}

fn anchor_of(prompt: &str) -> &str {
    let start = prompt.rfind(ANCHOR_DIRECTIVE).unwrap() + ANCHOR_DIRECTIVE.len() + 1;
    prompt[start..].trim_end_matches('\n')
}

#[tokio::test]
async fn test_single_message_without_profile() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"1) ሰላም!"}"#).await;
    let app = test_app(Arc::new(backend.client()));

    let res = send(
        app,
        post_json("/api/tutor", r#"{"messages":[{"role":"user","content":"Hello"}]}"#),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "reply": "1) ሰላም!" }));

    let prompt = prompt_of(&backend);
    assert!(!prompt.contains(PROFILE_MARKER));
    assert_eq!(anchor_of(&prompt), "Hello");
}

#[tokio::test]
async fn test_profile_and_latest_question() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"አመሰግናለሁ (amesegenallo)"}"#).await;
    let app = test_app(Arc::new(backend.client()));

    let body = json!({
        "messages": [
            { "role": "user", "content": "Hi" },
            { "role": "assistant", "content": "Selam!" },
            { "role": "user", "content": "How do I say thanks?" }
        ],
        "profile": { "level": "absolute-beginner", "goal": "heritage", "learningMode": "amharic" }
    });
    let res = send(app, post_json("/api/tutor", &body.to_string())).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["reply"], "አመሰግናለሁ (amesegenallo)");

    let prompt = prompt_of(&backend);
    assert!(prompt.contains(
        "Learner profile:\n- Level: absolute-beginner\n- Goal: heritage\n- Learning mode: amharic\n"
    ));
    assert_eq!(anchor_of(&prompt), "How do I say thanks?");
}

#[tokio::test]
async fn test_empty_messages_rejected_without_backend_call() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"unused"}"#).await;

    for body in [r#"{"messages":[]}"#, "{}", r#"{"messages":null}"#] {
        let app = test_app(Arc::new(backend.client()));
        let res = send(app, post_json("/api/tutor", body)).await;

        assert_eq!(res.status, StatusCode::BAD_REQUEST, "body {body}");
        assert!(res.body["error"].is_string());
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"unused"}"#).await;

    let bodies = [
        "not json at all",
        r#"{"messages":"Hello"}"#,
        r#"{"messages":[{"role":"narrator","content":"Hello"}]}"#,
        r#"{"messages":[{"role":"user"}]}"#,
        r#"{"messages":[{"role":"user","content":"Hi"}],"profile":{"level":"expert"}}"#,
    ];
    for body in bodies {
        let app = test_app(Arc::new(backend.client()));
        let res = send(app, post_json("/api/tutor", body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(res.body["code"], 4002);
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_server_error() {
    let backend = spawn_backend(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"out of memory"}"#).await;
    let app = test_app(Arc::new(backend.client()));

    let res = send(
        app,
        post_json("/api/tutor", r#"{"messages":[{"role":"user","content":"Hello"}]}"#),
    )
    .await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Failed to reach local model");
    assert!(!res.body["error"].as_str().unwrap().contains("out of memory"));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_message_is_localized() {
    let app = test_app(Arc::new(ollama_client(&unreachable_backend_url().await)));

    let mut request =
        post_json("/api/tutor", r#"{"messages":[{"role":"user","content":"ሰላም"}]}"#);
    request.headers_mut().insert(header::ACCEPT_LANGUAGE, "am-ET,am;q=0.9".parse().unwrap());
    let res = send(app, request).await;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "ከአካባቢው ሞዴል ጋር መገናኘት አልተቻለም");
    assert_eq!(res.body["code"], 5002);
}

#[tokio::test]
async fn test_empty_backend_response_is_empty_reply() {
    let backend = spawn_backend(StatusCode::OK, "{}").await;
    let app = test_app(Arc::new(backend.client()));

    let res = send(
        app,
        post_json("/api/tutor", r#"{"messages":[{"role":"user","content":"Hello"}]}"#),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "reply": "" }));
}

#[tokio::test]
async fn test_session_info_reaches_prompt() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"ok"}"#).await;
    let app = test_app(Arc::new(backend.client()));

    let body = json!({
        "messages": [{ "role": "user", "content": "Quiz me on greetings" }],
        "sessionInfo": { "course": "amharic-beginner-1", "lesson": 0 }
    });
    let res = send(app, post_json("/api/tutor", &body.to_string())).await;
    assert_eq!(res.status, StatusCode::OK);

    let prompt = prompt_of(&backend);
    assert!(prompt.contains("Course context:\n- Course: amharic-beginner-1\n- Lesson index: 0\n"));
}

#[tokio::test]
async fn test_blank_session_info_is_ignored() {
    let backend = spawn_backend(StatusCode::OK, r#"{"response":"ok"}"#).await;
    let app = test_app(Arc::new(backend.client()));

    let body = json!({
        "messages": [{ "role": "tutor", "text": "Selam! Say something." }],
        "profile": null,
        "sessionInfo": { "course": null, "lesson": "" }
    });
    let res = send(app, post_json("/api/tutor", &body.to_string())).await;
    assert_eq!(res.status, StatusCode::OK);

    let prompt = prompt_of(&backend);
    assert!(!prompt.contains(SESSION_MARKER));
    assert!(!prompt.contains(PROFILE_MARKER));
    assert_eq!(anchor_of(&prompt), "Selam! Say something.");
}
