//! HTML rendering of a timeline view through an embedded Handlebars template.
//!
//! Handlebars escapes every `{{value}}`, so task names and labels from the planner are
//! safe to interpolate.

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

use crate::timeline::hover::{HoverState, Tooltip};
use crate::timeline::layout::{LegendItem, TaskBar, TimelineLayout, TimelineView};
use crate::timeline::summary::SummaryMetric;

const TEMPLATE_NAME: &str = "timeline";

/// Renders timeline views to HTML fragments.
pub struct TimelineRenderer {
    handlebars: Handlebars<'static>,
}

impl TimelineRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string(TEMPLATE_NAME, TIMELINE_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, view: &TimelineView, hover: &HoverState) -> Result<String> {
        let context = RenderContext::from_view(view, hover);
        Ok(self.handlebars.render(TEMPLATE_NAME, &context)?)
    }
}

#[derive(Debug, Serialize)]
struct RenderContext<'a> {
    no_data: bool,
    unavailable: bool,
    task_count: usize,
    ready: Option<ReadyContext<'a>>,
}

#[derive(Debug, Serialize)]
struct ReadyContext<'a> {
    summary: &'a [SummaryMetric],
    labels: &'a [String],
    sections: Vec<SectionContext>,
    legend: Vec<LegendContext<'a>>,
    tooltip: Option<TooltipContext>,
}

#[derive(Debug, Serialize)]
struct SectionContext {
    title: &'static str,
    rows: Vec<RowContext>,
}

#[derive(Debug, Serialize)]
struct RowContext {
    id: String,
    name: String,
    bar_style: String,
    hovered: bool,
    difficulty: Option<String>,
    cells: Vec<CellContext>,
}

#[derive(Debug, Serialize)]
struct CellContext {
    month: u32,
    active: bool,
    hovered: bool,
}

#[derive(Debug, Serialize)]
struct LegendContext<'a> {
    name: &'a str,
    swatch_style: String,
    skipped: bool,
}

#[derive(Debug, Serialize)]
struct TooltipContext {
    style: String,
    tooltip: Tooltip,
}

impl<'a> RenderContext<'a> {
    fn from_view(view: &'a TimelineView, hover: &HoverState) -> Self {
        match view {
            TimelineView::NoData => RenderContext {
                no_data: true,
                unavailable: false,
                task_count: 0,
                ready: None,
            },
            TimelineView::Unavailable { task_count } => RenderContext {
                no_data: false,
                unavailable: true,
                task_count: *task_count,
                ready: None,
            },
            TimelineView::Ready(layout) => RenderContext {
                no_data: false,
                unavailable: false,
                task_count: layout.legend.len(),
                ready: Some(ReadyContext::from_layout(layout, hover)),
            },
        }
    }
}

impl<'a> ReadyContext<'a> {
    fn from_layout(layout: &'a TimelineLayout, hover: &HoverState) -> Self {
        let mut sections = Vec::new();
        if !layout.technical.is_empty() {
            sections.push(SectionContext {
                title: "Technical Skills",
                rows: rows(&layout.technical, layout.total_months, hover),
            });
        }
        if !layout.non_technical.is_empty() {
            sections.push(SectionContext {
                title: "Non-Technical Skills",
                rows: rows(&layout.non_technical, layout.total_months, hover),
            });
        }

        ReadyContext {
            summary: &layout.summary,
            labels: &layout.labels,
            sections,
            legend: layout.legend.iter().map(legend_item).collect(),
            tooltip: hover.tooltip(layout).map(|tooltip| TooltipContext {
                style: format!(
                    "left: {}px; top: {}px;",
                    tooltip.pointer.x + 12.0,
                    tooltip.pointer.y + 12.0
                ),
                tooltip,
            }),
        }
    }
}

fn rows(bars: &[TaskBar], total_months: u32, hover: &HoverState) -> Vec<RowContext> {
    bars.iter()
        .map(|bar| {
            let hovered_month = hover
                .cell
                .as_ref()
                .filter(|(id, _)| *id == bar.id)
                .map(|(_, m)| *m);
            RowContext {
                id: bar.id.clone(),
                name: bar.name.clone(),
                bar_style: format!(
                    "left: {:.4}%; width: {:.4}%; background-color: {};",
                    bar.left_pct, bar.width_pct, bar.color
                ),
                hovered: hover.task_id.as_deref() == Some(bar.id.as_str()),
                difficulty: bar.difficulty.clone(),
                cells: (1..=total_months)
                    .map(|month| CellContext {
                        month,
                        active: bar.covers_month(month),
                        hovered: hovered_month == Some(month),
                    })
                    .collect(),
            }
        })
        .collect()
}

fn legend_item(item: &LegendItem) -> LegendContext<'_> {
    LegendContext {
        name: &item.name,
        swatch_style: format!("background-color: {};", item.color),
        skipped: item.skipped.is_some(),
    }
}

const TIMELINE_TEMPLATE: &str = r#"<section class="timeline w-full">
{{#if no_data}}
  <div class="rounded-lg border border-gray-200 bg-gray-50 p-8 text-center" data-state="no-data">
    <h3 class="text-lg font-semibold text-gray-700">No timeline data available</h3>
    <p class="mt-2 text-sm text-gray-500">This blueprint does not have any planned tasks yet.</p>
  </div>
{{/if}}
{{#if unavailable}}
  <div class="rounded-lg border border-amber-200 bg-amber-50 p-8 text-center" data-state="unavailable">
    <h3 class="text-lg font-semibold text-amber-700">Unable to generate timeline</h3>
    <p class="mt-2 text-sm text-amber-600">{{task_count}} tasks were found but no months could be laid out.</p>
  </div>
{{/if}}
{{#with ready}}
  <div class="grid grid-cols-2 gap-4 md:grid-cols-4" data-state="ready">
    {{#each summary}}
    <div class="rounded-lg bg-white p-4 shadow-sm">
      <p class="text-xs uppercase tracking-wide text-gray-500">{{label}}</p>
      <p class="mt-1 text-xl font-bold text-gray-900">{{value}}</p>
      <p class="mt-1 text-xs text-gray-400">{{hint}}</p>
    </div>
    {{/each}}
  </div>
  <div class="mt-6 overflow-x-auto rounded-lg bg-white shadow-sm">
    <div class="flex border-b border-gray-200">
      <div class="w-48 shrink-0 p-2 text-sm font-semibold text-gray-600">Task</div>
      <div class="flex flex-1">
        {{#each labels}}
        <div class="flex-1 p-2 text-center text-xs font-medium text-gray-500">{{this}}</div>
        {{/each}}
      </div>
    </div>
    {{#each sections}}
    <div class="border-b border-gray-100">
      <h4 class="bg-gray-50 px-2 py-1 text-sm font-semibold text-gray-700">{{title}}</h4>
      {{#each rows}}
      <div class="flex items-center{{#if hovered}} bg-indigo-50{{/if}}" data-task-id="{{id}}">
        <div class="w-48 shrink-0 truncate p-2 text-sm text-gray-800">{{name}}{{#if difficulty}} <span class="text-xs text-gray-400">({{difficulty}})</span>{{/if}}</div>
        <div class="relative flex h-10 flex-1">
          {{#each cells}}
          <div class="flex-1 border-l border-gray-100{{#if hovered}} bg-gray-100{{/if}}" data-month="{{month}}" data-active="{{active}}"></div>
          {{/each}}
          <div class="absolute top-2 h-6 rounded" style="{{bar_style}}"></div>
        </div>
      </div>
      {{/each}}
    </div>
    {{/each}}
  </div>
  <ul class="mt-4 flex flex-wrap gap-3">
    {{#each legend}}
    <li class="flex items-center gap-2 text-sm{{#if skipped}} text-gray-400 line-through{{else}} text-gray-700{{/if}}">
      <span class="inline-block h-3 w-3 rounded-full" style="{{swatch_style}}"></span>{{name}}
    </li>
    {{/each}}
  </ul>
  {{#with tooltip}}
  <div class="fixed z-50 rounded-md bg-gray-900 p-3 text-xs text-white shadow-lg" style="{{style}}" role="tooltip">
    <p class="font-semibold">{{tooltip.title}}</p>
    <p>{{tooltip.range}} · {{tooltip.duration}}</p>
    {{#if tooltip.difficulty}}<p>Difficulty: {{tooltip.difficulty}}</p>{{/if}}
    {{#if tooltip.description}}<p class="mt-1 text-gray-300">{{tooltip.description}}</p>{{/if}}
    {{#with tooltip.month}}<p class="mt-1">{{label}}: {{#if active}}in progress{{else}}not scheduled{{/if}}</p>{{/with}}
  </div>
  {{/with}}
{{/with}}
</section>
"#;
