//! GeminiClient against a local fake of the generateContent endpoint

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use code_aura::core::testing::{ScriptedInteraction, StaticSettings};
use code_aura::{AuraConfig, CodeTranslator, CommandOutcome, GeminiClient, TextGenerator, TranslationError};

/// What the fake server saw
#[derive(Debug, Clone)]
struct Seen {
    model_action: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Default)]
struct FakeState {
    seen: Mutex<Vec<Seen>>,
}

async fn generate_content(
    State(state): State<Arc<FakeState>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    state.seen.lock().unwrap().push(Seen {
        model_action,
        api_key: api_key.clone(),
        body,
    });

    match api_key.as_deref() {
        Some("valid") => Json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "console.log(\"hi\");\n" }]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 17 }
        }))
        .into_response(),
        Some("empty") => Json(json!({ "candidates": [] })).into_response(),
        Some("garbage") => (StatusCode::OK, "definitely not json").into_response(),
        Some("slow") => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({})).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })),
        )
            .into_response(),
    }
}

async fn start_fake() -> (SocketAddr, Arc<FakeState>) {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/v1beta/models/:model_action", post(generate_content))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

fn config_for(addr: SocketAddr) -> AuraConfig {
    AuraConfig {
        api_endpoint: format!("http://{}/v1beta", addr),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_success() {
    let (addr, state) = start_fake().await;
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    let result = client
        .generate("valid", "gemini-1.5-flash", "Translate this python code")
        .await
        .unwrap();

    assert_eq!(result.text, "console.log(\"hi\");\n");
    assert_eq!(result.tokens_used, 17);
    assert_eq!(result.model_used, "gemini-1.5-flash");

    let seen = state.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model_action, "gemini-1.5-flash:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("valid"));
    assert_eq!(
        seen[0].body["contents"][0]["parts"][0]["text"],
        "Translate this python code"
    );
}

#[tokio::test]
async fn test_rejected_key_carries_service_message() {
    let (addr, _state) = start_fake().await;
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    let err = client.generate("nope", "gemini-1.5-flash", "x").await.unwrap_err();

    match err {
        TranslationError::ApiError { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("API key not valid"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_candidates_is_invalid_response() {
    let (addr, _state) = start_fake().await;
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    let err = client.generate("empty", "gemini-1.5-flash", "x").await.unwrap_err();
    assert!(matches!(err, TranslationError::InvalidResponseError { .. }));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let (addr, _state) = start_fake().await;
    let client = GeminiClient::new(&config_for(addr)).unwrap();

    let err = client.generate("garbage", "gemini-1.5-flash", "x").await.unwrap_err();
    assert!(matches!(err, TranslationError::InvalidResponseError { .. }));
}

#[tokio::test]
async fn test_configured_timeout() {
    let (addr, _state) = start_fake().await;
    let config = AuraConfig {
        timeout_ms: Some(100),
        ..config_for(addr)
    };
    let client = GeminiClient::new(&config).unwrap();

    let err = client.generate("slow", "gemini-1.5-flash", "x").await.unwrap_err();
    assert!(matches!(err, TranslationError::TimeoutError));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GeminiClient::new(&config_for(addr)).unwrap();
    let err = client.generate("valid", "gemini-1.5-flash", "x").await.unwrap_err();

    assert!(matches!(err, TranslationError::NetworkError { .. }));
    assert!(err.is_service_error());
}

#[tokio::test]
async fn test_command_end_to_end() {
    let (addr, state) = start_fake().await;
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("hello.py");
    std::fs::write(&original, "print(\"hi\")\n").unwrap();

    let translator = CodeTranslator::from_config(&config_for(addr)).unwrap();
    let ui = ScriptedInteraction::new(&original, "print(\"hi\")\n")
        .with_answers(["python", "javascript"]);

    let outcome = translator.run(&ui, &StaticSettings::new("valid")).await;

    let expected = dir.path().join("hello.js");
    assert!(matches!(outcome, CommandOutcome::Completed { ref output, .. } if *output == expected));
    assert_eq!(
        std::fs::read_to_string(&expected).unwrap(),
        "console.log(\"hi\");\n"
    );
    assert_eq!(ui.opened(), vec![expected]);

    let prompt = state.seen.lock().unwrap()[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.contains("print(\"hi\")"));
    assert!(prompt.contains("javascript"));
}

#[tokio::test]
async fn test_command_with_rejected_key_writes_nothing() {
    let (addr, _state) = start_fake().await;
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("hello.py");

    let translator = CodeTranslator::from_config(&config_for(addr)).unwrap();
    let ui = ScriptedInteraction::new(&original, "print(1)").with_answers(["python", "java"]);

    let outcome = translator.run(&ui, &StaticSettings::new("wrong")).await;

    assert!(!outcome.is_completed());
    assert!(ui.errors()[0].starts_with("Error translating code:"));
    assert!(ui.errors()[0].contains("API key not valid"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
