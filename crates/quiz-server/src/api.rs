//! HTTP request handlers for the quiz API.
//!
//! Each handler is a stateless request/response transformation: acquire a
//! pooled connection inside a blocking task, run one store operation, shape
//! the result as JSON. Error bodies follow the `{"detail": ...}` contract.

use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use quiz_store::{Choice, NewChoice, Question, StoreError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// An error response: a status code plus a fixed `detail` message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    fn not_found(detail: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail,
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Maps a [`StoreError`] to an API error, logging non-404 failures.
///
/// `QuestionNotFound` → 404, everything else → 500.
fn store_err_to_api(e: StoreError) -> ApiError {
    match e {
        StoreError::QuestionNotFound(_) => ApiError::not_found("Question Not Found"),
        ref err => {
            tracing::error!(error = %err, "store operation failed");
            ApiError::internal()
        }
    }
}

/// Body shape for `POST /questions/`.
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub choices: Vec<NewChoice>,
}

/// GET /
pub async fn index_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

/// GET /questions/:questionId
pub async fn read_question_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(question_id): Path<i64>,
) -> Result<Json<Question>, ApiError> {
    let question = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for read_question");
            ApiError::internal()
        })?;
        quiz_store::get_question(&conn, question_id).map_err(store_err_to_api)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "read_question task join error");
        ApiError::internal()
    })??;

    Ok(Json(question))
}

/// GET /choices/:questionId
///
/// Both an unknown question and a question with zero choices yield 404; the
/// `detail` message distinguishes them so a client can tell which it hit.
pub async fn read_choices_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(question_id): Path<i64>,
) -> Result<Json<Vec<Choice>>, ApiError> {
    let choices = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for read_choices");
            ApiError::internal()
        })?;

        let choices = quiz_store::list_choices(&conn, question_id).map_err(store_err_to_api)?;
        if choices.is_empty() {
            let exists =
                quiz_store::question_exists(&conn, question_id).map_err(store_err_to_api)?;
            if !exists {
                return Err(ApiError::not_found("Question Not Found"));
            }
            return Err(ApiError::not_found("Choices is Not Found"));
        }
        Ok(choices)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "read_choices task join error");
        ApiError::internal()
    })??;

    Ok(Json(choices))
}

/// POST /questions/
pub async fn create_question_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let question_id = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_question");
            ApiError::internal()
        })?;
        quiz_store::create_question_with_choices(&conn, &payload.question_text, &payload.choices)
            .map_err(store_err_to_api)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_question task join error");
        ApiError::internal()
    })??;

    tracing::info!(question_id, "question created");
    Ok(Json(json!({ "message": "Question created successfully" })))
}
