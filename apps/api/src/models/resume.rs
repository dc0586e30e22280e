use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSubmissionRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub target_role: String,
    pub file_name: String,
    pub s3_key: String,
    pub size_bytes: i64,
    pub text_preview: Option<String>,
    pub status: String,
    pub reviewer: Option<String>,
    pub feedback: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
