//! Coerces a loosely-typed plan payload into typed task entries.
//!
//! Validity is decided exactly once, here. Every raw task record becomes either
//! `TaskEntry::Valid` (renderable bar) or `TaskEntry::Invalid` (kept for counts and
//! the legend, never drawn). Nothing is dropped at this stage.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

pub const UNNAMED_TASK: &str = "Unnamed Task";

/// Task grouping by declared type. Only the exact literals select a named bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Technical,
    NonTechnical,
    Other,
}

impl TaskKind {
    pub fn from_raw(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("technical") => TaskKind::Technical,
            Some("non-technical") => TaskKind::NonTechnical,
            _ => TaskKind::Other,
        }
    }
}

/// A renderable task: 1-indexed inclusive month range with `start >= 1` and `end >= start`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    pub name: Option<String>,
    pub kind: TaskKind,
    pub start: u32,
    pub end: u32,
    pub difficulty: Option<String>,
    pub description: Option<String>,
}

impl Task {
    pub fn duration(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_TASK)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    NotAnObject,
    MissingStart,
    MissingEnd,
    StartBeforeFirstMonth,
    EndBeforeStart,
}

impl InvalidReason {
    pub fn describe(&self) -> &'static str {
        match self {
            InvalidReason::NotAnObject => "task record is not an object",
            InvalidReason::MissingStart => "start month is missing",
            InvalidReason::MissingEnd => "end month is missing",
            InvalidReason::StartBeforeFirstMonth => "start month is before month 1",
            InvalidReason::EndBeforeStart => "end month is before start month",
        }
    }
}

/// A task record that cannot be placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidTask {
    pub id: String,
    pub name: Option<String>,
    pub kind: TaskKind,
    pub reason: InvalidReason,
}

impl InvalidTask {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_TASK)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskEntry {
    Valid(Task),
    Invalid(InvalidTask),
}

impl TaskEntry {
    pub fn id(&self) -> &str {
        match self {
            TaskEntry::Valid(t) => &t.id,
            TaskEntry::Invalid(t) => &t.id,
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            TaskEntry::Valid(t) => t.kind,
            TaskEntry::Invalid(t) => t.kind,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TaskEntry::Valid(t) => t.display_name(),
            TaskEntry::Invalid(t) => t.display_name(),
        }
    }

    pub fn as_valid(&self) -> Option<&Task> {
        match self {
            TaskEntry::Valid(t) => Some(t),
            TaskEntry::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedPlan {
    pub tasks: Vec<TaskEntry>,
    pub labels: Vec<String>,
}

impl NormalizedPlan {
    pub fn valid_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter_map(TaskEntry::as_valid)
    }

    /// Entries of one bucket, in plan order.
    pub fn bucket(&self, kind: TaskKind) -> impl Iterator<Item = &TaskEntry> {
        self.tasks.iter().filter(move |t| t.kind() == kind)
    }
}

/// Normalizes a raw plan payload.
///
/// `total_months` is accepted for parity with the renderer contract; label synthesis
/// is the renderer's job, so an empty `labels` field stays empty here.
pub fn normalize(raw: Option<&Value>, _total_months: u32) -> NormalizedPlan {
    let Some(plan) = raw.and_then(Value::as_object) else {
        return NormalizedPlan::default();
    };

    let mut tasks: Vec<TaskEntry> = plan
        .get("tasks")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .enumerate()
                .map(|(i, raw_task)| normalize_task(i, raw_task))
                .collect()
        })
        .unwrap_or_default();
    dedupe_ids(&mut tasks);

    let labels = plan
        .get("labels")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(coerce_label).collect())
        .unwrap_or_default();

    NormalizedPlan { tasks, labels }
}

fn normalize_task(index: usize, raw: &Value) -> TaskEntry {
    let fallback_id = format!("task-{}", index + 1);
    let Some(obj) = raw.as_object() else {
        return TaskEntry::Invalid(InvalidTask {
            id: fallback_id,
            name: None,
            kind: TaskKind::Other,
            reason: InvalidReason::NotAnObject,
        });
    };

    let id = obj.get("id").and_then(coerce_id).unwrap_or(fallback_id);
    let name = obj.get("name").and_then(coerce_text);
    let kind = TaskKind::from_raw(obj.get("type"));

    let start = obj.get("start").and_then(coerce_month);
    let end = obj.get("end").and_then(coerce_month);

    let invalid = |reason| {
        TaskEntry::Invalid(InvalidTask {
            id: id.clone(),
            name: name.clone(),
            kind,
            reason,
        })
    };

    // A zero month is treated as absent, same as a missing field.
    let start = match start {
        None | Some(0) => return invalid(InvalidReason::MissingStart),
        Some(s) if s < 1 => return invalid(InvalidReason::StartBeforeFirstMonth),
        Some(s) => s,
    };
    let end = match end {
        None | Some(0) => return invalid(InvalidReason::MissingEnd),
        Some(e) if e < start => return invalid(InvalidReason::EndBeforeStart),
        Some(e) => e,
    };

    TaskEntry::Valid(Task {
        id,
        name,
        kind,
        start: start as u32,
        end: end as u32,
        difficulty: obj.get("difficulty").and_then(coerce_text),
        description: obj.get("description").and_then(coerce_text),
    })
}

/// Hover and rows are keyed by id, so a repeated id (from the plan or a fallback
/// `task-N` clashing with a real one) gets a `-2`, `-3`... suffix in plan order.
fn dedupe_ids(tasks: &mut [TaskEntry]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(tasks.len());
    for entry in tasks.iter_mut() {
        let id = match entry {
            TaskEntry::Valid(task) => &mut task.id,
            TaskEntry::Invalid(task) => &mut task.id,
        };
        if seen.contains(id.as_str()) {
            let mut n = 2;
            while seen.contains(&format!("{id}-{n}")) {
                n += 1;
            }
            *id = format!("{id}-{n}");
        }
        seen.insert(id.clone());
    }
}

/// Integers, integral floats and numeric strings are accepted as months.
/// Values beyond `u32::MAX` are treated as absent.
fn coerce_month(value: &Value) -> Option<i64> {
    let month = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (month <= i64::from(u32::MAX)).then_some(month)
}

fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn coerce_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
