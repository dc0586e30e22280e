use serde::{Deserialize, Serialize};

use crate::timeline::normalize::{NormalizedPlan, TaskKind};

/// A derived summary card. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetric {
    pub label: String,
    pub value: String,
    pub hint: String,
}

/// Computes the summary cards for a normalized plan.
///
/// Returns an empty list when the plan has no tasks. `labels` are the display
/// labels (already synthesized by the renderer when the plan had none).
pub fn compute_summary(plan: &NormalizedPlan, labels: &[String]) -> Vec<SummaryMetric> {
    let total = plan.tasks.len();
    if total == 0 {
        return vec![];
    }

    let technical = plan.bucket(TaskKind::Technical).count();
    let non_technical = plan.bucket(TaskKind::NonTechnical).count();

    let mut metrics = vec![SummaryMetric {
        label: "Total Tasks".to_string(),
        value: total.to_string(),
        hint: format!("{technical} technical · {non_technical} non-technical"),
    }];

    let durations: Vec<u32> = plan.valid_tasks().map(|t| t.duration()).collect();
    metrics.push(match average_duration(&durations) {
        Some(avg) => SummaryMetric {
            label: "Average Duration".to_string(),
            value: format!("{avg:.1} mo"),
            hint: "Average time per task".to_string(),
        },
        None => SummaryMetric {
            label: "Average Duration".to_string(),
            value: "—".to_string(),
            hint: "No task has a complete month range".to_string(),
        },
    });

    // Strict `>` keeps the first-seen task on ties.
    let mut longest = None;
    for task in plan.valid_tasks() {
        match longest {
            Some((_, best)) if task.duration() <= best => {}
            _ => longest = Some((task, task.duration())),
        }
    }
    if let Some((task, duration)) = longest {
        metrics.push(SummaryMetric {
            label: "Longest Task".to_string(),
            value: task.display_name().to_string(),
            hint: format!("{duration} {}", pluralize_months(duration)),
        });
    }

    let first = labels.first().map(String::as_str).unwrap_or("Start");
    let last = labels.last().map(String::as_str).unwrap_or("Finish");
    metrics.push(SummaryMetric {
        label: "Timeline Span".to_string(),
        value: format!("{first} → {last}"),
        hint: format!("{} {}", labels.len(), pluralize_months(labels.len() as u32)),
    });

    metrics
}

/// Mean duration rounded to one decimal place. `None` when there is nothing to average.
pub fn average_duration(durations: &[u32]) -> Option<f64> {
    if durations.is_empty() {
        return None;
    }
    let sum: u64 = durations.iter().map(|&d| u64::from(d)).sum();
    let avg = sum as f64 / durations.len() as f64;
    Some((avg * 10.0).round() / 10.0)
}

fn pluralize_months(n: u32) -> &'static str {
    if n == 1 {
        "month"
    } else {
        "months"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::normalize::normalize;
    use serde_json::json;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Month {i}")).collect()
    }

    #[test]
    fn test_no_tasks_no_metrics() {
        let plan = normalize(Some(&json!({"tasks": []})), 6);
        assert!(compute_summary(&plan, &labels(6)).is_empty());
    }

    #[test]
    fn test_average_duration_one_decimal() {
        let plan = normalize(
            Some(&json!({"tasks": [{"start": 1, "end": 2}, {"start": 3, "end": 3}]})),
            6,
        );
        let metrics = compute_summary(&plan, &labels(6));
        let avg = metrics.iter().find(|m| m.label == "Average Duration").unwrap();
        assert_eq!(avg.value, "1.5 mo");
    }

    #[test]
    fn test_average_rounding() {
        assert_eq!(average_duration(&[1, 1, 2]), Some(1.3));
        assert_eq!(average_duration(&[]), None);
    }

    #[test]
    fn test_longest_task_first_seen_wins() {
        let plan = normalize(
            Some(&json!({"tasks": [
                {"name": "A", "start": 1, "end": 3},
                {"name": "B", "start": 2, "end": 4},
                {"name": "C", "start": 1, "end": 2}
            ]})),
            6,
        );
        let metrics = compute_summary(&plan, &labels(6));
        let longest = metrics.iter().find(|m| m.label == "Longest Task").unwrap();
        assert_eq!(longest.value, "A");
        assert_eq!(longest.hint, "3 months");
    }

    #[test]
    fn test_count_includes_invalid_tasks() {
        let plan = normalize(
            Some(&json!({"tasks": [
                {"type": "technical", "start": 1, "end": 1},
                {"type": "non-technical", "end": 2}
            ]})),
            6,
        );
        let metrics = compute_summary(&plan, &labels(2));
        assert_eq!(metrics[0].value, "2");
        assert_eq!(metrics[0].hint, "1 technical · 1 non-technical");
        let avg = metrics.iter().find(|m| m.label == "Average Duration").unwrap();
        assert_eq!(avg.value, "1.0 mo");
    }

    #[test]
    fn test_span_fallback_labels() {
        let plan = normalize(Some(&json!({"tasks": [{"start": 1, "end": 1}]})), 0);
        let metrics = compute_summary(&plan, &[]);
        let span = metrics.last().unwrap();
        assert_eq!(span.value, "Start → Finish");
    }

    #[test]
    fn test_span_uses_first_and_last_label() {
        let plan = normalize(Some(&json!({"tasks": [{"start": 1, "end": 1}]})), 3);
        let metrics = compute_summary(&plan, &labels(3));
        assert_eq!(metrics.last().unwrap().value, "Month 1 → Month 3");
    }
}
