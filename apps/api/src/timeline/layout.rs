//! Maps a normalized plan to a positioned timeline layout.
//!
//! # Geometry
//! Months are 1-indexed and inclusive:
//! - `left_pct  = (start - 1) / total_months * 100`
//! - `width_pct = (end - start + 1) / total_months * 100`
//!
//! No clamping is applied. Bars reaching past `total_months` keep their raw geometry
//! and carry `overflows = true`.

use serde::Serialize;

use crate::timeline::normalize::{InvalidReason, NormalizedPlan, Task, TaskEntry, TaskKind};
use crate::timeline::palette::{color_for, Color};
use crate::timeline::summary::{compute_summary, SummaryMetric};

/// One of the three mutually-exclusive render branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimelineView {
    /// No plan, or a plan with zero tasks.
    NoData,
    /// Tasks exist but no month labels could be produced.
    Unavailable { task_count: usize },
    Ready(TimelineLayout),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub total_months: u32,
    pub labels: Vec<String>,
    pub summary: Vec<SummaryMetric>,
    pub technical: Vec<TaskBar>,
    pub non_technical: Vec<TaskBar>,
    pub legend: Vec<LegendItem>,
}

impl TimelineLayout {
    pub fn bars(&self) -> impl Iterator<Item = &TaskBar> {
        self.technical.iter().chain(self.non_technical.iter())
    }

    pub fn find_bar(&self, task_id: &str) -> Option<&TaskBar> {
        self.bars().find(|b| b.id == task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskBar {
    pub id: String,
    pub name: String,
    pub kind: TaskKind,
    pub start: u32,
    pub end: u32,
    pub duration: u32,
    pub left_pct: f64,
    pub width_pct: f64,
    pub color: Color,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub overflows: bool,
}

impl TaskBar {
    pub fn covers_month(&self, month: u32) -> bool {
        (self.start..=self.end).contains(&month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub id: String,
    pub name: String,
    pub kind: TaskKind,
    pub color: Color,
    /// Set when the task has no drawable month range.
    pub skipped: Option<InvalidReason>,
}

/// Longest timeline that is laid out, in months.
pub const MAX_MONTHS: u32 = 120;

/// Exactly `total_months` header labels: the plan's own label for each month where it
/// has one, "Month N" otherwise. Extra plan labels are dropped.
pub fn display_labels(plan_labels: &[String], total_months: u32) -> Vec<String> {
    (1..=total_months)
        .map(|m| {
            plan_labels
                .get(m as usize - 1)
                .cloned()
                .unwrap_or_else(|| format!("Month {m}"))
        })
        .collect()
}

/// `(left_pct, width_pct)` for a 1-indexed inclusive month range.
pub fn bar_geometry(start: u32, end: u32, total_months: u32) -> (f64, f64) {
    let total = total_months as f64;
    let left = (start as f64 - 1.0) / total * 100.0;
    let width = (end as f64 - start as f64 + 1.0) / total * 100.0;
    (left, width)
}

/// Builds the view for a normalized plan.
pub fn build_view(plan: &NormalizedPlan, total_months: u32) -> TimelineView {
    if plan.tasks.is_empty() {
        return TimelineView::NoData;
    }

    // A plan that carries its own labels but no month count is laid out on its labels.
    let total_months = if total_months == 0 {
        u32::try_from(plan.labels.len())
            .unwrap_or(MAX_MONTHS)
            .min(MAX_MONTHS)
    } else {
        total_months
    };
    if total_months == 0 {
        return TimelineView::Unavailable {
            task_count: plan.tasks.len(),
        };
    }

    let labels = display_labels(&plan.labels, total_months);

    let colors = assign_colors(&plan.tasks);

    let mut technical = Vec::new();
    let mut non_technical = Vec::new();
    for (entry, color) in plan.tasks.iter().zip(&colors) {
        let TaskEntry::Valid(task) = entry else {
            continue;
        };
        match task.kind {
            TaskKind::Technical => technical.push(task_bar(task, *color, total_months)),
            TaskKind::NonTechnical => non_technical.push(task_bar(task, *color, total_months)),
            TaskKind::Other => {}
        }
    }

    let legend = plan
        .tasks
        .iter()
        .zip(&colors)
        .map(|(entry, color)| LegendItem {
            id: entry.id().to_string(),
            name: entry.display_name().to_string(),
            kind: entry.kind(),
            color: *color,
            skipped: match entry {
                TaskEntry::Valid(_) => None,
                TaskEntry::Invalid(t) => Some(t.reason),
            },
        })
        .collect();

    TimelineView::Ready(TimelineLayout {
        total_months,
        summary: compute_summary(plan, &labels),
        labels,
        technical,
        non_technical,
        legend,
    })
}

/// Colors follow plan order: bucketed tasks by position within their bucket,
/// unbucketed tasks by position in the flat list.
fn assign_colors(entries: &[TaskEntry]) -> Vec<Color> {
    let mut technical_seen = 0;
    let mut non_technical_seen = 0;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let kind = entry.kind();
            let index = match kind {
                TaskKind::Technical => {
                    technical_seen += 1;
                    technical_seen - 1
                }
                TaskKind::NonTechnical => {
                    non_technical_seen += 1;
                    non_technical_seen - 1
                }
                TaskKind::Other => i,
            };
            color_for(kind, index)
        })
        .collect()
}

fn task_bar(task: &Task, color: Color, total_months: u32) -> TaskBar {
    let (left_pct, width_pct) = bar_geometry(task.start, task.end, total_months);
    TaskBar {
        id: task.id.clone(),
        name: task.display_name().to_string(),
        kind: task.kind,
        start: task.start,
        end: task.end,
        duration: task.duration(),
        left_pct,
        width_pct,
        color,
        difficulty: task.difficulty.clone(),
        description: task.description.clone(),
        overflows: task.end > total_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::normalize::normalize;
    use serde_json::json;

    fn ready(view: TimelineView) -> TimelineLayout {
        match view {
            TimelineView::Ready(layout) => layout,
            other => panic!("expected ready layout, got {other:?}"),
        }
    }

    #[test]
    fn test_geometry_example() {
        let (left, width) = bar_geometry(2, 4, 6);
        assert!((left - 16.6667).abs() < 0.001);
        assert!((width - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_synthesizes_exactly_total_months_labels() {
        let plan = normalize(Some(&json!({"tasks": [{"start": 1, "end": 2}]})), 4);
        let layout = ready(build_view(&plan, 4));
        assert_eq!(layout.labels, vec!["Month 1", "Month 2", "Month 3", "Month 4"]);
    }

    #[test]
    fn test_plan_labels_take_precedence() {
        let plan = normalize(
            Some(&json!({"tasks": [{"start": 1, "end": 1}], "labels": ["Jan", "Feb"]})),
            2,
        );
        assert_eq!(ready(build_view(&plan, 2)).labels, vec!["Jan", "Feb"]);
    }

    #[test]
    fn test_labels_fitted_to_month_count() {
        let plan = normalize(
            Some(&json!({"tasks": [{"start": 1, "end": 1}], "labels": ["Jan", "Feb", "Mar", "Apr"]})),
            2,
        );
        assert_eq!(ready(build_view(&plan, 2)).labels, vec!["Jan", "Feb"]);

        let plan = normalize(
            Some(&json!({"tasks": [{"start": 1, "end": 1}], "labels": ["Jan"]})),
            3,
        );
        assert_eq!(
            ready(build_view(&plan, 3)).labels,
            vec!["Jan", "Month 2", "Month 3"]
        );
    }

    #[test]
    fn test_label_derived_month_count_is_capped() {
        let labels: Vec<String> = (1..=150).map(|i| format!("W{i}")).collect();
        let plan = normalize(
            Some(&json!({"tasks": [{"start": 1, "end": 1}], "labels": labels})),
            0,
        );
        let layout = ready(build_view(&plan, 0));
        assert_eq!(layout.total_months, MAX_MONTHS);
        assert_eq!(layout.labels.len(), MAX_MONTHS as usize);
    }

    #[test]
    fn test_no_data_branch() {
        assert_eq!(build_view(&normalize(None, 6), 6), TimelineView::NoData);
        let empty = normalize(Some(&json!({"tasks": [], "labels": ["a"]})), 6);
        assert_eq!(build_view(&empty, 6), TimelineView::NoData);
    }

    #[test]
    fn test_unavailable_branch() {
        let plan = normalize(Some(&json!({"tasks": [{"start": 1, "end": 1}]})), 0);
        assert_eq!(
            build_view(&plan, 0),
            TimelineView::Unavailable { task_count: 1 }
        );
    }

    #[test]
    fn test_zero_months_with_labels_uses_label_count() {
        let plan = normalize(
            Some(&json!({"tasks": [{"start": 1, "end": 1, "type": "technical"}], "labels": ["a", "b"]})),
            0,
        );
        let layout = ready(build_view(&plan, 0));
        assert_eq!(layout.total_months, 2);
        assert!((layout.technical[0].width_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_task_skipped_from_rows_but_in_legend() {
        let plan = normalize(
            Some(&json!({"tasks": [
                {"id": "ok", "type": "technical", "start": 1, "end": 2},
                {"id": "broken", "type": "technical", "start": 2}
            ]})),
            6,
        );
        let layout = ready(build_view(&plan, 6));
        assert_eq!(layout.technical.len(), 1);
        assert_eq!(layout.legend.len(), 2);
        assert_eq!(layout.legend[1].name, "Unnamed Task");
        assert_eq!(layout.legend[1].skipped, Some(InvalidReason::MissingEnd));
        assert_eq!(layout.summary[0].value, "2");
    }

    #[test]
    fn test_other_kind_only_in_legend() {
        let plan = normalize(
            Some(&json!({"tasks": [
                {"id": "x", "start": 1, "end": 2},
                {"id": "y", "type": "non-technical", "start": 1, "end": 2}
            ]})),
            6,
        );
        let layout = ready(build_view(&plan, 6));
        assert!(layout.technical.is_empty());
        assert_eq!(layout.non_technical.len(), 1);
        assert_eq!(layout.legend.len(), 2);
        assert_eq!(layout.legend[0].color, color_for(TaskKind::Other, 0));
    }

    #[test]
    fn test_colors_index_within_bucket() {
        let plan = normalize(
            Some(&json!({"tasks": [
                {"type": "non-technical", "start": 1, "end": 1},
                {"type": "technical", "start": 1, "end": 1},
                {"type": "technical", "start": 1, "end": 1}
            ]})),
            3,
        );
        let layout = ready(build_view(&plan, 3));
        assert_eq!(layout.technical[0].color, color_for(TaskKind::Technical, 0));
        assert_eq!(layout.technical[1].color, color_for(TaskKind::Technical, 1));
        assert_eq!(layout.non_technical[0].color, color_for(TaskKind::NonTechnical, 0));
        assert_eq!(layout.legend[1].color, layout.technical[0].color);
    }

    #[test]
    fn test_overflow_is_flagged_not_clamped() {
        let plan = normalize(
            Some(&json!({"tasks": [{"type": "technical", "start": 5, "end": 8}]})),
            6,
        );
        let bar = &ready(build_view(&plan, 6)).technical[0];
        assert!(bar.overflows);
        assert!(bar.left_pct + bar.width_pct > 100.0);
    }

    #[test]
    fn test_covers_month() {
        let plan = normalize(
            Some(&json!({"tasks": [{"id": "t", "type": "technical", "start": 2, "end": 3}]})),
            4,
        );
        let layout = ready(build_view(&plan, 4));
        let bar = layout.find_bar("t").unwrap();
        assert!(!bar.covers_month(1));
        assert!(bar.covers_month(2));
        assert!(bar.covers_month(3));
        assert!(!bar.covers_month(4));
    }
}
