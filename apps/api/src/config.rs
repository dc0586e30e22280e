use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOTAL_MONTHS: u32 = 6;
const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub planner_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Month count used when neither the request nor the plan carries one.
    pub default_total_months: u32,
    pub max_resume_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            planner_url: require_env("PLANNER_URL")?,
            port: optional_env("PORT", DEFAULT_PORT)
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_total_months: optional_env("DEFAULT_TOTAL_MONTHS", DEFAULT_TOTAL_MONTHS)
                .context("DEFAULT_TOTAL_MONTHS must be a non-negative integer")?,
            max_resume_bytes: optional_env("MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)
                .context("MAX_RESUME_BYTES must be a byte count")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
