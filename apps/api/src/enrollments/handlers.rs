use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::enrollments::repository;
use crate::errors::{constraint_error, AppError};
use crate::experts::repository::get_expert;
use crate::models::enrollment::{EnrollmentRow, EnrollmentWithExpertRow};
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// POST /api/v1/experts/:id/enrollments
pub async fn handle_enroll(
    State(state): State<AppState>,
    Path(expert_id): Path<Uuid>,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollmentRow>), AppError> {
    let message = clean_message(req.message)?;

    // Inactive experts are hidden from enrollment, same as unknown ones.
    get_expert(&state.db, expert_id)
        .await?
        .filter(|e| e.is_active)
        .ok_or_else(|| AppError::NotFound(format!("Expert {expert_id} not found")))?;

    let enrollment =
        repository::insert_enrollment(&state.db, expert_id, req.user_id, message.as_deref())
            .await
            .map_err(|e| {
                constraint_error(
                    e,
                    "Already enrolled with this expert",
                    format!("Expert {expert_id} not found"),
                )
            })?;

    info!("User {} enrolled with expert {expert_id}", req.user_id);
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /api/v1/enrollments
pub async fn handle_list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<EnrollmentWithExpertRow>>, AppError> {
    Ok(Json(
        repository::list_for_user(&state.db, params.user_id).await?,
    ))
}

/// DELETE /api/v1/enrollments/:id
pub async fn handle_cancel_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentRow>, AppError> {
    let enrollment = repository::cancel_enrollment(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Active enrollment {id} not found")))?;
    info!("Cancelled enrollment {id}");
    Ok(Json(enrollment))
}

fn clean_message(message: Option<String>) -> Result<Option<String>, AppError> {
    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    if message
        .as_ref()
        .is_some_and(|m| m.chars().count() > MAX_MESSAGE_CHARS)
    {
        return Err(AppError::Validation(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_message_dropped() {
        assert_eq!(clean_message(Some("   ".to_string())).unwrap(), None);
        assert_eq!(clean_message(None).unwrap(), None);
    }

    #[test]
    fn test_message_trimmed() {
        assert_eq!(
            clean_message(Some(" hi there ".to_string())).unwrap().as_deref(),
            Some("hi there")
        );
    }

    #[test]
    fn test_long_message_rejected() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(clean_message(Some(long)), Err(AppError::Validation(_))));
    }
}
