//! Client for the external planning service that serves blueprint plans.
//!
//! The response body is handed to the timeline normalizer untouched, as a
//! `serde_json::Value`; this module only extracts the envelope fields the API echoes
//! back (`totalMonths`, `warnings`, `chartType`).
//!
//! One request per call. No retry, no backoff.
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Planner returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("No plan found for role '{0}'")]
    NotFound(String),
}

/// A plan as delivered by the planning service.
#[derive(Debug, Clone)]
pub struct PlanEnvelope {
    pub raw: Value,
    pub total_months: Option<u32>,
    pub warnings: Vec<String>,
    pub chart_type: Option<String>,
}

impl PlanEnvelope {
    pub fn from_value(raw: Value) -> Self {
        let total_months = raw
            .get("totalMonths")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok());
        let warnings = raw
            .get("warnings")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|w| w.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        let chart_type = raw
            .get("chartType")
            .and_then(Value::as_str)
            .map(String::from);

        Self {
            raw,
            total_months,
            warnings,
            chart_type,
        }
    }
}

/// Source of blueprint plans. Carried in `AppState` as `Arc<dyn PlanSource>`.
#[async_trait]
pub trait PlanSource: Send + Sync {
    async fn fetch_plan(&self, role: &str, months: Option<u32>)
        -> Result<PlanEnvelope, PlannerError>;
}

/// HTTP client for the planning service.
#[derive(Clone)]
pub struct HttpPlanSource {
    client: Client,
    base_url: String,
}

impl HttpPlanSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PlannerError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PlanSource for HttpPlanSource {
    async fn fetch_plan(
        &self,
        role: &str,
        months: Option<u32>,
    ) -> Result<PlanEnvelope, PlannerError> {
        let url = format!("{}/plans/{}", self.base_url, role);
        let mut request = self.client.get(&url);
        if let Some(months) = months {
            request = request.query(&[("months", months)]);
        }

        debug!("Fetching plan from {url}");
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PlannerError::NotFound(role.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Planner returned {status} for role {role}");
            return Err(PlannerError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let raw: Value = response.json().await?;
        Ok(PlanEnvelope::from_value(raw))
    }
}
