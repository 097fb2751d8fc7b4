#![allow(dead_code)]

use std::sync::Arc;

use axum::{extract::Json, http::StatusCode, routing::post, Router};
use serde_json::json;
use tokio::sync::Mutex;

use quizforge_api::models::{QuizItem, QuizPayload};
use quizforge_api::{create_router, services::AppState, store::MemoryStore, Config};

/// Three-item answer key used across the grading tests:
/// item 1 -> "A", item 2 -> "B", item 3 -> "C".
pub fn sample_payload() -> QuizPayload {
    QuizPayload {
        title: "World History Basics".to_string(),
        items: [(1, "A"), (2, "B"), (3, "C")]
            .into_iter()
            .map(|(id, correct)| QuizItem {
                id,
                question_text: format!("Question {id}"),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                correct_answer: correct.to_string(),
            })
            .collect(),
    }
}

pub fn test_config(generator_base_url: &str) -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "quizforge_test".to_string(),
        generator_base_url: generator_base_url.to_string(),
        generator_api_key: Some("test-key".to_string()),
        generator_model: "test-model".to_string(),
    }
}

/// Test app over the in-memory store. The generator base URL points nowhere;
/// generation tests spawn their own stub and use
/// `create_test_app_with_generator`.
pub fn create_test_app() -> (Router, Arc<MemoryStore>) {
    create_test_app_with_config(test_config("http://127.0.0.1:9"))
}

pub fn create_test_app_with_generator(base_url: &str) -> (Router, Arc<MemoryStore>) {
    create_test_app_with_config(test_config(base_url))
}

pub fn create_test_app_with_config(config: Config) -> (Router, Arc<MemoryStore>) {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(MemoryStore::new());
    let app_state = Arc::new(AppState::with_store(config, store.clone()));

    (create_router(app_state), store)
}

/// Spawns a loopback chat-completion stub that always answers with the given
/// message content, and returns its base URL.
pub async fn spawn_generator_stub(content: &str) -> String {
    let content = content.to_string();
    let app = Router::new().route(
        "/chat/completions",
        post(move |_body: Json<serde_json::Value>| {
            let content = content.clone();
            async move {
                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": content } }
                    ]
                }))
            }
        }),
    );

    serve_stub(app).await
}

/// Stub that records every request body it receives before answering, so
/// tests can assert on the prompt the orchestrator built.
pub async fn spawn_recording_generator_stub(
    content: &str,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
) -> String {
    let content = content.to_string();
    let app = Router::new().route(
        "/chat/completions",
        post(move |Json(body): Json<serde_json::Value>| {
            let content = content.clone();
            let requests = requests.clone();
            async move {
                requests.lock().await.push(body);
                Json(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": content } }
                    ]
                }))
            }
        }),
    );

    serve_stub(app).await
}

/// Stub that fails every call with the given provider status code.
pub async fn spawn_failing_generator_stub(status: u16) -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(move || async move {
            (
                StatusCode::from_u16(status).unwrap(),
                "provider error".to_string(),
            )
        }),
    );

    serve_stub(app).await
}

async fn serve_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind generator stub");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
