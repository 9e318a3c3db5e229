//! Quiz server library logic.

pub mod api;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use quiz_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
///
/// The pool handle is injected here rather than read from any ambient
/// global; handlers receive it through an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (256 KiB). Quiz payloads are tiny; anything
/// larger is rejected before it reaches a handler.
const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load balancers,
/// monitoring, and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index_handler))
        .route("/health", get(health))
        .route("/questions/", post(api::create_question_handler))
        .route(
            "/questions/{questionId}",
            get(api::read_question_handler),
        )
        .route("/choices/{questionId}", get(api::read_choices_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
