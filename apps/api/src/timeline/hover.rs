//! Transient hover state for one rendered timeline, and the tooltip derived from it.

use serde::{Deserialize, Serialize};

use crate::timeline::layout::{TaskBar, TimelineLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverMode {
    None,
    Task,
    TaskAndMonth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

/// Pointer input over a rendered timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    EnterTask { task_id: String, pointer: Pointer },
    EnterCell { task_id: String, month: u32, pointer: Pointer },
    Move(Pointer),
    Leave,
}

/// Single "currently hovered" slot owned by one timeline instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub task_id: Option<String>,
    pub cell: Option<(String, u32)>,
    pub pointer: Option<Pointer>,
}

impl HoverState {
    pub fn mode(&self) -> HoverMode {
        match (&self.task_id, &self.cell) {
            (_, Some(_)) => HoverMode::TaskAndMonth,
            (Some(_), None) => HoverMode::Task,
            (None, None) => HoverMode::None,
        }
    }

    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::EnterTask { task_id, pointer } => self.enter_task(&task_id, pointer),
            PointerEvent::EnterCell {
                task_id,
                month,
                pointer,
            } => self.enter_cell(&task_id, month, pointer),
            PointerEvent::Move(pointer) => self.move_pointer(pointer),
            PointerEvent::Leave => self.leave(),
        }
    }

    /// Pointer entered a task bar.
    pub fn enter_task(&mut self, task_id: &str, pointer: Pointer) {
        self.task_id = Some(task_id.to_string());
        self.cell = None;
        self.pointer = Some(pointer);
    }

    /// Pointer entered the month cell of a task row.
    pub fn enter_cell(&mut self, task_id: &str, month: u32, pointer: Pointer) {
        self.task_id = Some(task_id.to_string());
        self.cell = Some((task_id.to_string(), month));
        self.pointer = Some(pointer);
    }

    fn move_pointer(&mut self, pointer: Pointer) {
        if self.mode() != HoverMode::None {
            self.pointer = Some(pointer);
        }
    }

    /// Pointer left the timeline; everything resets.
    fn leave(&mut self) {
        *self = HoverState::default();
    }

    pub fn tooltip(&self, layout: &TimelineLayout) -> Option<Tooltip> {
        let task_id = self.task_id.as_deref()?;
        let bar = layout.find_bar(task_id)?;
        let month = self.cell.as_ref().map(|(_, m)| *m);

        Some(Tooltip {
            task_id: bar.id.clone(),
            title: bar.name.clone(),
            range: month_range(bar, &layout.labels),
            duration: format!("{} mo", bar.duration),
            difficulty: bar.difficulty.clone(),
            description: bar.description.clone(),
            month: month.map(|m| MonthDetail {
                month: m,
                label: label_for(&layout.labels, m),
                active: bar.covers_month(m),
            }),
            pointer: self.pointer.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub task_id: String,
    pub title: String,
    pub range: String,
    pub duration: String,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub month: Option<MonthDetail>,
    pub pointer: Pointer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthDetail {
    pub month: u32,
    pub label: String,
    pub active: bool,
}

fn label_for(labels: &[String], month: u32) -> String {
    month
        .checked_sub(1)
        .and_then(|i| labels.get(i as usize))
        .cloned()
        .unwrap_or_else(|| format!("Month {month}"))
}

fn month_range(bar: &TaskBar, labels: &[String]) -> String {
    if bar.start == bar.end {
        label_for(labels, bar.start)
    } else {
        format!(
            "{} – {}",
            label_for(labels, bar.start),
            label_for(labels, bar.end)
        )
    }
}
