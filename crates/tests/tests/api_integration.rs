use ariana_agents::SessionOptions;
use ariana_api::build_app_with_provider;
use ariana_core::{
    catalog::{LAB_HOURS, LAB_TESTS, TEST_GUIDANCE},
    APOLOGY_REPLY, INVALID_MESSAGE_REPLY, SYSTEM_INSTRUCTION,
};
use ariana_provider::{ChatTurn, ProviderError, ProviderReply};
use ariana_tests::ScriptedProvider;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app_with(provider: &ScriptedProvider) -> Router {
    build_app_with_provider(provider.clone(), SessionOptions::default())
        .await
        .expect("app should build")
}

fn ask_request(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

async fn ask(app: &Router, message: &str) -> String {
    let request = ask_request(Body::from(json!({ "message": message }).to_string()));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    body["reply"].as_str().expect("reply should be a string").to_string()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).expect("body should be JSON");
    (status, parsed)
}

#[tokio::test]
async fn startup_seeds_system_instruction() {
    let provider = ScriptedProvider::new();
    let _app = app_with(&provider).await;

    assert_eq!(provider.calls(), vec![vec![ChatTurn::user(SYSTEM_INSTRUCTION)]]);
}

#[tokio::test]
async fn startup_fails_when_seed_turn_fails() {
    let provider = ScriptedProvider::new();
    provider.push(Err(ProviderError::Unauthorized(401)));

    let result = build_app_with_provider(provider, SessionOptions::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn blank_messages_get_prompt_without_model_call() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    for message in ["", "   ", "\t\n"] {
        assert_eq!(ask(&app, message).await, INVALID_MESSAGE_REPLY);
    }
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn hours_keywords_return_hours() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    for message in ["Your HOURS?", "are you open today", "What time should I come"] {
        assert_eq!(ask(&app, message).await, LAB_HOURS, "{message}");
    }
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn service_listing_is_numbered_in_order() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    let reply = ask(&app, "What tests do you offer").await;
    let expected = LAB_TESTS
        .iter()
        .enumerate()
        .map(|(index, name)| format!("{}. {}", index + 1, name))
        .collect::<Vec<_>>();
    assert_eq!(reply.lines().skip(1).collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn guidance_inside_sentence_returns_advisory() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    let reply = ask(&app, "Tell me about Insulin Dose Calculator").await;
    assert_eq!(reply, TEST_GUIDANCE[0].1);
}

#[tokio::test]
async fn higher_priority_category_wins() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    let services = ask(&app, "do your diagnostic services include the egfr").await;
    assert!(services.starts_with("Here are the tests offered at Ariana Labs:"));

    let hours = ask(&app, "what time can I get tests for insulin dose calculator").await;
    assert_eq!(hours, LAB_HOURS);
}

#[tokio::test]
async fn fallback_forwards_normalized_message_with_history() {
    let provider = ScriptedProvider::new();
    provider.push(Ok(ProviderReply::text("seeded")));
    provider.push(Ok(ProviderReply::candidate("Rest and drink fluids.")));
    let app = app_with(&provider).await;

    let reply = ask(&app, "  I Have A Cold ").await;
    assert_eq!(reply, "Rest and drink fluids.");

    let calls = provider.calls();
    assert_eq!(
        calls[1],
        vec![
            ChatTurn::user(SYSTEM_INSTRUCTION),
            ChatTurn::model("seeded"),
            ChatTurn::user("i have a cold"),
        ]
    );
}

#[tokio::test]
async fn provider_fault_returns_apology_with_ok_status() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;
    provider.push(Err(ProviderError::Network("connection refused".to_string())));
    provider.push(Ok(ProviderReply::Candidates {
        candidates: Vec::new(),
    }));

    assert_eq!(ask(&app, "is coffee bad for me").await, APOLOGY_REPLY);
    assert_eq!(ask(&app, "is tea bad for me").await, APOLOGY_REPLY);
    assert_eq!(ask(&app, "is water good for me").await, "echo: is water good for me");
}

#[tokio::test]
async fn malformed_payloads_still_get_ok_reply() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    let (status, body) = send(&app, ask_request(Body::from("{not json"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": INVALID_MESSAGE_REPLY }));

    let (status, body) = send(&app, ask_request(Body::from("{}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": INVALID_MESSAGE_REPLY }));

    let untyped = Request::builder()
        .method("POST")
        .uri("/ask")
        .body(Body::from(json!({ "message": "open?" }).to_string()))
        .unwrap();
    let (status, body) = send(&app, untyped).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": INVALID_MESSAGE_REPLY }));

    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/ask")
        .header("origin", "https://frontend.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn health_reports_model_and_counters() {
    let provider = ScriptedProvider::new();
    let app = app_with(&provider).await;
    ask(&app, "hours").await;
    ask(&app, "").await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "scripted");
    assert_eq!(body["metrics"]["requests_total"], 2);
    assert_eq!(body["metrics"]["canned_reply_total"], 1);
    assert_eq!(body["metrics"]["invalid_input_total"], 1);
}
