//! HTTP gateway (Axum) standing in for the function runtime.
//!
//! Used by the `grader` binary and the integration tests.

pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handler::{invoke_handler, parse_event, run_grader, score_handler};
pub use state::HandlerState;

pub const GRADER_STATUS_HEADER: &str = "X-Grader-Status";
pub const GRADER_STATUS_HEALTHY: &str = "healthy";
pub const GRADER_STATUS_READY: &str = "ready";
pub const GRADER_STATUS_NOT_READY: &str = "not_ready";
pub const GRADER_STATUS_SCORED: &str = "scored";
pub const GRADER_STATUS_ERROR: &str = "error";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/invoke", post(invoke_handler))
        .route("/score", post(score_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub(crate) fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(GRADER_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub models: &'static str,
    pub model_mode: &'static str,
    pub load_attempts: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        status_headers(GRADER_STATUS_HEALTHY),
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let registry = state.grader.registry();
    let is_ready = registry.is_loaded();

    let components = ComponentStatus {
        http: GRADER_STATUS_READY,
        models: if is_ready {
            GRADER_STATUS_READY
        } else {
            "pending"
        },
        model_mode: if state.stub_models { "stub" } else { "real" },
        load_attempts: registry.load_count(),
    };

    let (status_code, header, status_msg) = if is_ready {
        (StatusCode::OK, GRADER_STATUS_READY, "ok")
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            GRADER_STATUS_NOT_READY,
            "pending",
        )
    };

    (
        status_code,
        status_headers(header),
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
