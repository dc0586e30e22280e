use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::planner::PlannerError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Planner(PlannerError::NotFound(role)) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No blueprint found for role '{role}'"),
            ),
            AppError::Planner(e) => {
                tracing::error!("Planner error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PLANNER_ERROR",
                    "The planning service is unavailable".to_string(),
                )
            }
            AppError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a Postgres unique-violation to `Conflict`, passing other errors through.
pub fn conflict_on_unique(e: sqlx::Error, message: impl Into<String>) -> AppError {
    match pg_code(&e).as_deref() {
        Some(UNIQUE_VIOLATION) => AppError::Conflict(message.into()),
        _ => AppError::Database(e),
    }
}

/// Like `conflict_on_unique`, and maps a foreign-key violation (the referenced row
/// vanished mid-request) to `NotFound`.
pub fn constraint_error(
    e: sqlx::Error,
    conflict: impl Into<String>,
    missing: impl Into<String>,
) -> AppError {
    match pg_code(&e).as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => AppError::NotFound(missing.into()),
        _ => conflict_on_unique(e, conflict),
    }
}

fn pg_code(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}
