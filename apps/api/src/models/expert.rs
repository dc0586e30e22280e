use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpertRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub title: String,
    pub company: Option<String>,
    pub expertise: Vec<String>,
    pub bio: Option<String>,
    pub years_experience: i32,
    pub hourly_rate: Option<f64>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
