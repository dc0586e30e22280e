use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::planner::PlanSource;
use crate::timeline::render::TimelineRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Pluggable plan source. Default: `HttpPlanSource` pointed at `PLANNER_URL`.
    pub planner: Arc<dyn PlanSource>,
    pub renderer: Arc<TimelineRenderer>,
}
