pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::enrollments::handlers as enrollments;
use crate::experts::handlers as experts;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::timeline::handlers as timeline;

/// Multipart framing overhead allowed on top of the resume size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Blueprint timelines
        .route(
            "/api/v1/blueprints/:role/timeline",
            get(timeline::handle_get_timeline),
        )
        .route(
            "/api/v1/blueprints/:role/timeline/html",
            get(timeline::handle_get_timeline_html),
        )
        .route(
            "/api/v1/timeline/preview",
            post(timeline::handle_preview_timeline),
        )
        // Experts (public)
        .route("/api/v1/experts", get(experts::handle_list_experts))
        .route("/api/v1/experts/:id", get(experts::handle_get_expert))
        .route(
            "/api/v1/experts/:id/enrollments",
            post(enrollments::handle_enroll),
        )
        // Enrollments
        .route(
            "/api/v1/enrollments",
            get(enrollments::handle_list_enrollments),
        )
        .route(
            "/api/v1/enrollments/:id",
            delete(enrollments::handle_cancel_enrollment),
        )
        // Resume submissions
        .route(
            "/api/v1/resumes",
            post(resumes::handle_submit_resume)
                .layer(DefaultBodyLimit::max(upload_limit))
                .get(resumes::handle_list_student_resumes),
        )
        // Admin
        .route("/api/v1/admin/experts", post(experts::handle_create_expert))
        .route(
            "/api/v1/admin/experts/bulk",
            post(experts::handle_bulk_create_experts),
        )
        .route(
            "/api/v1/admin/experts/:id",
            axum::routing::put(experts::handle_update_expert)
                .delete(experts::handle_delete_expert),
        )
        .route("/api/v1/admin/resumes", get(resumes::handle_review_queue))
        .route("/api/v1/admin/resumes/:id", get(resumes::handle_get_resume))
        .route(
            "/api/v1/admin/resumes/:id/review",
            patch(resumes::handle_review_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::planner::{PlanEnvelope, PlanSource, PlannerError};
    use crate::timeline::render::TimelineRenderer;

    /// Serves one fixed plan for the `data-analyst` role.
    struct StubPlanner;

    #[async_trait]
    impl PlanSource for StubPlanner {
        async fn fetch_plan(
            &self,
            role: &str,
            _months: Option<u32>,
        ) -> Result<PlanEnvelope, PlannerError> {
            if role != "data-analyst" {
                return Err(PlannerError::NotFound(role.to_string()));
            }
            Ok(PlanEnvelope::from_value(json!({
                "tasks": [
                    {"id": "sql", "name": "SQL", "type": "technical", "start": 2, "end": 4},
                    {"id": "talk", "name": "Storytelling", "type": "non-technical", "start": 1, "end": 1},
                    {"id": "tbd", "type": "technical", "start": 3}
                ],
                "labels": [],
                "totalMonths": 6,
                "warnings": ["skills data is 30 days old"],
                "chartType": "gantt"
            })))
        }
    }

    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/launchpad_test".to_string(),
            s3_bucket: "test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            planner_url: "http://localhost:9999".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            default_total_months: 6,
            max_resume_bytes: 1024,
        };
        // Never connects: the routes under test do not touch the database.
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();

        AppState {
            db,
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            config,
            planner: Arc::new(StubPlanner),
            renderer: Arc::new(TimelineRenderer::new().unwrap()),
        }
    }

    /// Resume storage backed by `s3_endpoint`, with a database that refuses every
    /// connection.
    fn state_with_storage(s3_endpoint: &str) -> AppState {
        let mut state = test_state();
        state.db = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(250))
            .connect_lazy("postgres://launchpad@127.0.0.1:1/launchpad_test")
            .unwrap();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                "test", "test", None, None, "test",
            ))
            .endpoint_url(s3_endpoint)
            .force_path_style(true)
            .build();
        state.s3 = aws_sdk_s3::Client::from_conf(s3_config);
        state
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        send_to(test_state(), request).await
    }

    async fn send_to(state: AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_timeline_ready_view() {
        let (status, body) = get_json("/api/v1/blueprints/data-analyst/timeline").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_months"], 6);
        assert_eq!(body["chart_type"], "gantt");
        assert_eq!(body["warnings"][0], "skills data is 30 days old");

        let view = &body["view"];
        assert_eq!(view["state"], "ready");
        assert_eq!(view["labels"].as_array().unwrap().len(), 6);
        assert_eq!(view["technical"].as_array().unwrap().len(), 1);
        assert_eq!(view["non_technical"].as_array().unwrap().len(), 1);
        assert_eq!(view["legend"].as_array().unwrap().len(), 3);
        assert_eq!(view["legend"][2]["name"], "Unnamed Task");
        assert_eq!(view["legend"][2]["skipped"], "missing_end");
        assert_eq!(view["technical"][0]["width_pct"], 50.0);
    }

    #[tokio::test]
    async fn test_timeline_tooltip_from_query() {
        let (_, body) =
            get_json("/api/v1/blueprints/data-analyst/timeline?hover_task=sql&hover_month=1").await;
        assert_eq!(body["tooltip"]["title"], "SQL");
        assert_eq!(body["tooltip"]["month"]["active"], false);
    }

    #[tokio::test]
    async fn test_timeline_unknown_role() {
        let (status, body) = get_json("/api/v1/blueprints/astronaut/timeline").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_timeline_rejects_bad_slug() {
        let (status, _) = get_json("/api/v1/blueprints/Data%20Analyst/timeline").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_timeline_html() {
        let (status, body) = send(
            Request::get("/api/v1/blueprints/data-analyst/timeline/html")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("Technical Skills"));
        assert!(html.contains("Non-Technical Skills"));
    }

    #[tokio::test]
    async fn test_preview_branches() {
        let post = |body: Value, uri: &'static str| {
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };

        let (_, body) = send(post(json!(null), "/api/v1/timeline/preview")).await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["view"]["state"], "no_data");

        let (_, body) = send(post(
            json!({"tasks": [{"start": 1, "end": 1}]}),
            "/api/v1/timeline/preview?months=0",
        ))
        .await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["view"]["state"], "unavailable");
        assert_eq!(body["view"]["task_count"], 1);

        let (_, body) = send(post(
            json!({"tasks": [{"type": "technical", "start": 2, "end": 4}]}),
            "/api/v1/timeline/preview",
        ))
        .await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["view"]["state"], "ready");
        assert_eq!(body["total_months"], 6);
    }

    #[tokio::test]
    async fn test_preview_clamps_plan_month_count() {
        let request = Request::post("/api/v1/timeline/preview")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "tasks": [{"type": "technical", "start": 1, "end": 2}],
                    "totalMonths": 150
                })
                .to_string(),
            ))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["total_months"], 120);
        assert_eq!(body["view"]["state"], "ready");
    }

    #[tokio::test]
    async fn test_preview_rejects_oversized_months_param() {
        let request = Request::post("/api/v1/timeline/preview?months=121")
            .header("content-type", "application/json")
            .body(Body::from(json!({"tasks": []}).to_string()))
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_submission_removes_uploaded_resume() {
        let s3 = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/test/resumes/.+\.pdf$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&s3)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/test/resumes/.+\.pdf$"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&s3)
            .await;

        let boundary = "launchpad-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"student_id\"\r\n\r\n\
             {student}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"target_role\"\r\n\r\n\
             data-analyst\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4 resume\r\n\
             --{boundary}--\r\n",
            student = uuid::Uuid::new_v4(),
        );
        let request = Request::post("/api/v1/resumes")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, _) = send_to(state_with_storage(&s3.uri()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        s3.verify().await;
    }
}
