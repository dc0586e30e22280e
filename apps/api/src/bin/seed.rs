//! One-shot fixture loader: POSTs a batch of experts to a running API.
//!
//! Usage: `seed [FIXTURE_PATH]`. Without a path the embedded fixtures are sent.
//! Target server: `SEED_TARGET` (default `http://localhost:8080`).

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_TARGET: &str = "http://localhost:8080";
const BULK_PATH: &str = "/api/v1/admin/experts/bulk";
const EMBEDDED_FIXTURES: &str = include_str!("../../fixtures/experts.json");

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fixtures = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read fixture file '{path}'"))?,
        None => EMBEDDED_FIXTURES.to_string(),
    };
    let payload: Value = serde_json::from_str(&fixtures).context("Fixture file is not valid JSON")?;
    let count = payload
        .get("experts")
        .and_then(Value::as_array)
        .map(Vec::len)
        .context("Fixture must contain an 'experts' array")?;

    let target = std::env::var("SEED_TARGET").unwrap_or_else(|_| DEFAULT_TARGET.to_string());
    let url = format!("{}{}", target.trim_end_matches('/'), BULK_PATH);
    info!("Seeding {count} experts into {url}");

    let response = reqwest::Client::new()
        .post(&url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("Could not reach {url}"))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        bail!("Seeding failed with status {status}: {body}");
    }

    let inserted = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("inserted").and_then(Value::as_u64))
        .unwrap_or_default();
    info!("Seeded {inserted} experts");
    Ok(())
}
