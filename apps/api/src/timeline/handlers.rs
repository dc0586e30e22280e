//! Axum route handlers for blueprint timelines.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::planner::PlanEnvelope;
use crate::state::AppState;
use crate::timeline::hover::{HoverState, Pointer, PointerEvent, Tooltip};
use crate::timeline::layout::{build_view, TimelineView, MAX_MONTHS};
use crate::timeline::normalize::{normalize, NormalizedPlan, TaskEntry};

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub months: Option<u32>,
    pub hover_task: Option<String>,
    pub hover_month: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl TimelineQuery {
    /// Pointer event encoded in the query, for linking to a highlighted task.
    fn pointer_event(&self) -> PointerEvent {
        let pointer = Pointer {
            x: self.x.unwrap_or_default(),
            y: self.y.unwrap_or_default(),
        };
        match (self.hover_task.clone(), self.hover_month) {
            (Some(task_id), Some(month)) => PointerEvent::EnterCell {
                task_id,
                month,
                pointer,
            },
            (Some(task_id), None) => PointerEvent::EnterTask { task_id, pointer },
            (None, _) if self.x.is_some() || self.y.is_some() => PointerEvent::Move(pointer),
            (None, _) => PointerEvent::Leave,
        }
    }

    fn hover_state(&self) -> HoverState {
        let mut hover = HoverState::default();
        hover.apply(self.pointer_event());
        hover
    }
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub role: Option<String>,
    pub total_months: u32,
    pub warnings: Vec<String>,
    pub chart_type: Option<String>,
    pub view: TimelineView,
    pub tooltip: Option<Tooltip>,
}

/// GET /api/v1/blueprints/:role/timeline
pub async fn handle_get_timeline(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelineResponse>, AppError> {
    let (envelope, view, total_months) = fetch_and_build(&state, &role, &query).await?;
    let tooltip = match &view {
        TimelineView::Ready(layout) => query.hover_state().tooltip(layout),
        _ => None,
    };

    Ok(Json(TimelineResponse {
        role: Some(role),
        total_months,
        warnings: envelope.warnings,
        chart_type: envelope.chart_type,
        view,
        tooltip,
    }))
}

/// GET /api/v1/blueprints/:role/timeline/html
pub async fn handle_get_timeline_html(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> Result<Html<String>, AppError> {
    let (_, view, _) = fetch_and_build(&state, &role, &query).await?;
    let html = state.renderer.render(&view, &query.hover_state())?;
    Ok(Html(html))
}

/// POST /api/v1/timeline/preview
///
/// Lays out a plan supplied in the request body without contacting the planner.
/// Any JSON value is accepted; non-plans come back as the no-data view.
pub async fn handle_preview_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
    Json(raw): Json<Value>,
) -> Result<Json<TimelineResponse>, AppError> {
    let envelope = PlanEnvelope::from_value(raw);
    let total_months = resolve_months(
        query.months,
        envelope.total_months,
        state.config.default_total_months,
    )?;
    let plan = normalize(Some(&envelope.raw), total_months);
    let view = build_view(&plan, total_months);
    let tooltip = match &view {
        TimelineView::Ready(layout) => query.hover_state().tooltip(layout),
        _ => None,
    };

    Ok(Json(TimelineResponse {
        role: None,
        total_months,
        warnings: envelope.warnings,
        chart_type: envelope.chart_type,
        view,
        tooltip,
    }))
}

async fn fetch_and_build(
    state: &AppState,
    role: &str,
    query: &TimelineQuery,
) -> Result<(PlanEnvelope, TimelineView, u32), AppError> {
    validate_role(role)?;

    let envelope = state.planner.fetch_plan(role, query.months).await?;
    let total_months = resolve_months(
        query.months,
        envelope.total_months,
        state.config.default_total_months,
    )?;

    let plan = normalize(Some(&envelope.raw), total_months);
    log_skipped(role, &plan);
    let view = build_view(&plan, total_months);

    info!(
        "Built timeline for {role}: {} tasks over {total_months} months",
        plan.tasks.len()
    );
    Ok((envelope, view, total_months))
}

/// Request parameter, then the plan's own month count, then the configured default.
///
/// Only an explicit `months` parameter above `MAX_MONTHS` is a client error. A plan
/// that declares more months is laid out on the first `MAX_MONTHS`.
pub fn resolve_months(
    requested: Option<u32>,
    from_plan: Option<u32>,
    default: u32,
) -> Result<u32, AppError> {
    if let Some(months) = requested {
        if months > MAX_MONTHS {
            return Err(AppError::Validation(format!(
                "months must be at most {MAX_MONTHS}"
            )));
        }
        return Ok(months);
    }

    match from_plan {
        Some(months) if months > MAX_MONTHS => {
            warn!("Plan declares {months} months, laying out the first {MAX_MONTHS}");
            Ok(MAX_MONTHS)
        }
        Some(months) => Ok(months),
        None => Ok(default.min(MAX_MONTHS)),
    }
}

/// Roles are slugs: lowercase ASCII letters, digits, `-` and `_`.
pub fn validate_role(role: &str) -> Result<(), AppError> {
    let ok = !role.is_empty()
        && role.len() <= 100
        && role
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid role slug '{role}'")))
    }
}

fn log_skipped(role: &str, plan: &NormalizedPlan) {
    for entry in &plan.tasks {
        if let TaskEntry::Invalid(task) = entry {
            warn!(
                "Blueprint {role}: task {} not drawn ({})",
                task.id,
                task.reason.describe()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_months_precedence() {
        assert_eq!(resolve_months(Some(3), Some(9), 6).unwrap(), 3);
        assert_eq!(resolve_months(None, Some(9), 6).unwrap(), 9);
        assert_eq!(resolve_months(None, None, 6).unwrap(), 6);
        assert_eq!(resolve_months(Some(0), Some(9), 6).unwrap(), 0);
    }

    #[test]
    fn test_resolve_months_upper_bound() {
        assert!(resolve_months(Some(MAX_MONTHS + 1), None, 6).is_err());
        assert_eq!(resolve_months(Some(MAX_MONTHS), None, 6).unwrap(), MAX_MONTHS);
    }

    #[test]
    fn test_plan_month_count_is_clamped() {
        assert_eq!(resolve_months(None, Some(150), 6).unwrap(), MAX_MONTHS);
        assert_eq!(resolve_months(None, None, 500).unwrap(), MAX_MONTHS);
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("data-analyst").is_ok());
        assert!(validate_role("ml_engineer2").is_ok());
        assert!(validate_role("").is_err());
        assert!(validate_role("Data Analyst").is_err());
        assert!(validate_role("../etc").is_err());
    }

    #[test]
    fn test_hover_state_from_query() {
        let query = TimelineQuery {
            hover_task: Some("t1".to_string()),
            hover_month: Some(2),
            x: Some(5.0),
            ..Default::default()
        };
        let hover = query.hover_state();
        assert_eq!(hover.cell, Some(("t1".to_string(), 2)));
        assert_eq!(hover.pointer, Some(Pointer { x: 5.0, y: 0.0 }));

        assert_eq!(TimelineQuery::default().hover_state(), HoverState::default());

        let pointer_only = TimelineQuery {
            x: Some(3.0),
            ..Default::default()
        };
        assert_eq!(
            pointer_only.pointer_event(),
            PointerEvent::Move(Pointer { x: 3.0, y: 0.0 })
        );
        assert_eq!(pointer_only.hover_state(), HoverState::default());
    }
}
