mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use ariana_agents::{ConversationSession, LabAssistant, SessionOptions};
use ariana_core::{AskReply, AskRequest};
use ariana_observability::{AppMetrics, MetricsSnapshot};
use ariana_provider::{ChatProvider, GeminiProvider};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json, State};
use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use crate::config::{ApiConfig, DEFAULT_BIND};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ApiState {
    pub assistant: LabAssistant,
    pub metrics: Arc<AppMetrics>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    model: String,
    metrics: MetricsSnapshot,
}

/// Builds the router against the real Gemini backend. Fails if the
/// conversation session cannot be seeded, so a broken process never serves.
pub async fn build_app(config: &ApiConfig) -> Result<Router> {
    let provider =
        GeminiProvider::new(config.gemini.clone()).context("failed to build Gemini client")?;
    build_app_with_provider(provider, config.session_options()).await
}

pub async fn build_app_with_provider<P: ChatProvider>(
    provider: P,
    options: SessionOptions,
) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let session = ConversationSession::start(provider, options)
        .await
        .context("failed to seed conversation session")?;
    let assistant = LabAssistant::new(session, metrics.clone());

    Ok(build_router(ApiState { assistant, metrics }))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .with_state(state)
}

/// Always answers 200 with a reply body. An unreadable payload is treated
/// like an empty message.
async fn ask(
    State(state): State<ApiState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Json<AskReply> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable ask payload");
            AskRequest::default()
        }
    };

    Json(state.assistant.handle_message(&request.message).await)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        model: state.assistant.model().to_string(),
        metrics: state.metrics.snapshot(),
    })
}

fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
