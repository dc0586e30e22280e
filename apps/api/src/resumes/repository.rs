use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::ResumeSubmissionRow;
use crate::resumes::review::{ReviewStatus, ReviewTransition};

pub struct NewSubmission<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub target_role: &'a str,
    pub file_name: &'a str,
    pub s3_key: &'a str,
    pub size_bytes: i64,
    pub text_preview: Option<&'a str>,
}

pub async fn insert_submission(
    pool: &PgPool,
    new: NewSubmission<'_>,
) -> Result<ResumeSubmissionRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeSubmissionRow>(
        r#"
        INSERT INTO resume_submissions
            (id, student_id, target_role, file_name, s3_key, size_bytes, text_preview, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.student_id)
    .bind(new.target_role)
    .bind(new.file_name)
    .bind(new.s3_key)
    .bind(new.size_bytes)
    .bind(new.text_preview)
    .bind(ReviewStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

pub async fn get_submission(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ResumeSubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeSubmissionRow>("SELECT * FROM resume_submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_student(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<ResumeSubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeSubmissionRow>(
        "SELECT * FROM resume_submissions WHERE student_id = $1 ORDER BY created_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// Review queue, oldest first. `None` lists every status.
pub async fn list_queue(
    pool: &PgPool,
    status: Option<ReviewStatus>,
) -> Result<Vec<ResumeSubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeSubmissionRow>(
        r#"
        SELECT * FROM resume_submissions
        WHERE ($1::TEXT IS NULL OR status = $1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

/// Applies a review only if the row still has the status it was checked against.
/// `None` means another reviewer got there first.
pub async fn record_review(
    pool: &PgPool,
    id: Uuid,
    expected: ReviewStatus,
    transition: &ReviewTransition,
) -> Result<Option<ResumeSubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeSubmissionRow>(
        r#"
        UPDATE resume_submissions SET
            status = $3, reviewer = $4, feedback = $5,
            reviewed_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(expected.as_str())
    .bind(transition.next.as_str())
    .bind(&transition.reviewer)
    .bind(&transition.feedback)
    .fetch_optional(pool)
    .await
}
