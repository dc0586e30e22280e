use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeSubmissionRow;
use crate::resumes::repository::{self, NewSubmission};
use crate::resumes::review::{apply_review, ReviewDecision, ReviewRejection, ReviewStatus};
use crate::resumes::storage::{
    delete_resume, extract_preview, resume_key, upload_resume, validate_pdf,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub student_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub reviewer: String,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Fields collected from the upload form.
#[derive(Debug, Default)]
struct UploadForm {
    student_id: Option<String>,
    target_role: Option<String>,
    file: Option<(String, Bytes)>,
}

/// POST /api/v1/resumes
///
/// Multipart form: `student_id`, `target_role`, `file` (PDF).
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeSubmissionRow>), AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "student_id" | "target_role" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid field {name}: {e}")))?;
                if name == "student_id" {
                    form.student_id = Some(text);
                } else {
                    form.target_role = Some(text);
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid file upload: {e}")))?;
                form.file = Some((file_name, data));
            }
            _ => {}
        }
    }

    let student_id = form
        .student_id
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| AppError::Validation("student_id is required".to_string()))?
        .parse::<Uuid>()
        .map_err(|_| AppError::Validation("student_id must be a UUID".to_string()))?;
    let target_role = form
        .target_role
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("target_role is required".to_string()))?;
    let (file_name, data) = form
        .file
        .ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    validate_pdf(&file_name, &data, state.config.max_resume_bytes)?;

    let id = Uuid::new_v4();
    let key = resume_key(student_id, id);
    upload_resume(&state.s3, &state.config.s3_bucket, &key, data.clone()).await?;
    let preview = extract_preview(data.clone()).await;

    let inserted = repository::insert_submission(
        &state.db,
        NewSubmission {
            id,
            student_id,
            target_role: &target_role,
            file_name: &file_name,
            s3_key: &key,
            size_bytes: data.len() as i64,
            text_preview: preview.as_deref(),
        },
    )
    .await;

    // Nothing references the object without its row.
    let row = match inserted {
        Ok(row) => row,
        Err(e) => {
            let bucket = &state.config.s3_bucket;
            if let Err(cleanup) = delete_resume(&state.s3, bucket, &key).await {
                warn!("Orphaned resume left at {key}: {cleanup}");
            }
            return Err(e.into());
        }
    };

    info!("Resume {id} submitted by student {student_id} for {target_role}");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes
pub async fn handle_list_student_resumes(
    State(state): State<AppState>,
    Query(params): Query<StudentQuery>,
) -> Result<Json<Vec<ResumeSubmissionRow>>, AppError> {
    Ok(Json(
        repository::list_for_student(&state.db, params.student_id).await?,
    ))
}

/// GET /api/v1/admin/resumes
pub async fn handle_review_queue(
    State(state): State<AppState>,
    Query(params): Query<QueueQuery>,
) -> Result<Json<Vec<ResumeSubmissionRow>>, AppError> {
    let status = match params.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(s) => Some(
            ReviewStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("unknown status '{s}'")))?,
        ),
    };
    Ok(Json(repository::list_queue(&state.db, status).await?))
}

/// GET /api/v1/admin/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeSubmissionRow>, AppError> {
    let row = repository::get_submission(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(row))
}

/// PATCH /api/v1/admin/resumes/:id/review
pub async fn handle_review_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ResumeSubmissionRow>, AppError> {
    let current = repository::get_submission(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    let current_status = ReviewStatus::parse(&current.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "resume {id} has unknown status '{}'",
            current.status
        ))
    })?;

    let transition = apply_review(
        current_status,
        req.decision,
        &req.reviewer,
        req.feedback.as_deref(),
    )
    .map_err(|rejection| match rejection {
        ReviewRejection::Closed(_) => AppError::Conflict(rejection.to_string()),
        _ => AppError::Validation(rejection.to_string()),
    })?;

    let row = repository::record_review(&state.db, id, current_status, &transition)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Resume {id} was reviewed concurrently")))?;

    info!(
        "Resume {id} moved {} -> {} by {}",
        current_status.as_str(),
        transition.next.as_str(),
        transition.reviewer
    );
    Ok(Json(row))
}
