// Common test utilities and helpers

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::post,
};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use crate::config::{Config, GenerationConfig};
use crate::services::{GenerationBackend, OllamaClient};
use crate::{AppState, build_router};

pub const TEST_MODEL: &str = "llama3:latest";

/// Stand-in for the local model server, bound to an ephemeral port
pub struct MockBackend {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    /// JSON bodies received so far, in arrival order
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(&self) -> OllamaClient {
        ollama_client(&self.url)
    }
}

/// Start a backend answering every generate call with `status` and `body`
pub async fn spawn_backend(status: StatusCode, body: &'static str) -> MockBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);

    let app = Router::new().route(
        "/api/generate",
        post(move |Json(payload): Json<Value>| {
            let recorded = Arc::clone(&recorded);
            async move {
                recorded.lock().unwrap().push(payload);
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { url: format!("http://{}/api/generate", addr), requests }
}

/// Sets its flag when the handler future holding it is dropped
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Backend that never answers; the flag flips once its handler is abandoned
pub async fn spawn_stalled_backend() -> (String, Arc<AtomicBool>) {
    let dropped = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&dropped);

    let app = Router::new().route(
        "/api/generate",
        post(move || {
            let guard = DropFlag(Arc::clone(&flag));
            async move {
                let _guard = guard;
                tokio::time::sleep(Duration::from_secs(30)).await;
                StatusCode::OK
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stalled backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/generate", addr), dropped)
}

/// Poll `flag` until it is set or `within` elapses
pub async fn wait_for(flag: &AtomicBool, within: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    flag.load(Ordering::SeqCst)
}

/// URL of a port nothing listens on
pub async fn unreachable_backend_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/generate", addr)
}

pub fn ollama_client(url: &str) -> OllamaClient {
    OllamaClient::new(&GenerationConfig { endpoint: url.to_string(), model: TEST_MODEL.to_string() })
}

/// Application router wired to the given backend, default config
pub fn test_app(backend: Arc<dyn GenerationBackend>) -> Router {
    test_app_with_config(backend, &Config::default())
}

pub fn test_app_with_config(backend: Arc<dyn GenerationBackend>, config: &Config) -> Router {
    let state = Arc::new(AppState::with_backend(backend).expect("Failed to build app state"));
    build_router(state, config)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Send one request through the router and decode the JSON body
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("Router failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse { status, body }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
