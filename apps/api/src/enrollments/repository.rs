use sqlx::PgPool;
use uuid::Uuid;

use crate::models::enrollment::{EnrollmentRow, EnrollmentWithExpertRow};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CANCELLED: &str = "cancelled";

pub async fn insert_enrollment(
    pool: &PgPool,
    expert_id: Uuid,
    user_id: Uuid,
    message: Option<&str>,
) -> Result<EnrollmentRow, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentRow>(
        r#"
        INSERT INTO enrollments (id, expert_id, user_id, message, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(expert_id)
    .bind(user_id)
    .bind(message)
    .bind(STATUS_ACTIVE)
    .fetch_one(pool)
    .await
}

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EnrollmentWithExpertRow>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentWithExpertRow>(
        r#"
        SELECT en.id, en.expert_id, ex.name AS expert_name, ex.title AS expert_title,
               en.user_id, en.message, en.status, en.created_at
        FROM enrollments en
        JOIN experts ex ON ex.id = en.expert_id
        WHERE en.user_id = $1
        ORDER BY en.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Marks an active enrollment cancelled. `None` if no active enrollment has that id.
pub async fn cancel_enrollment(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<EnrollmentRow>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentRow>(
        r#"
        UPDATE enrollments SET status = $2, updated_at = NOW()
        WHERE id = $1 AND status = $3
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(STATUS_CANCELLED)
    .bind(STATUS_ACTIVE)
    .fetch_optional(pool)
    .await
}
