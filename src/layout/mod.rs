//! Gantt chart geometry.
//!
//! [`compute_layout`] places one [`Area`] per task, in pre-order, on a
//! single running row cursor so every group sits directly above its
//! children. [`connector::compute_connections`] then routes the links
//! between those areas. Coordinates are pixels relative to the chart origin;
//! renderers add [`LayoutConfig::padding`] on every side.

pub mod config;
pub mod connector;
pub mod grid;
pub mod metrics;

/// Widest timeline, padding included, that a chart may span.
pub const MAX_CHART_WIDTH: i64 = 1 << 20;

pub use config::LayoutConfig;
pub use connector::{Connection, compute_connections};
pub use grid::{GridKind, GridLine};
pub use metrics::{MonospaceMetrics, TextMeasure};

use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;
use crate::task::TaskId;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Placement of one task on the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub task: TaskId,
    pub rect: Rect,
    pub text_rect: Rect,
    pub display_label: String,
    pub is_group: bool,
    pub is_milestone: bool,
    pub percent_complete: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub areas: Vec<Area>,
    pub grid: Vec<GridLine>,
    /// Full image size, padding included.
    pub canvas: Size,
    pub padding: i32,
    pub grid_start: NaiveDateTime,
    pub grid_end: NaiveDateTime,
}

/// Layout plus routed links: everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttChart {
    #[serde(flatten)]
    pub layout: Layout,
    pub connections: Vec<Connection>,
}

pub fn chart(
    schedule: &Schedule,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> ScheduleResult<GanttChart> {
    let layout = compute_layout(schedule, config, measure)?;
    let connections = compute_connections(&layout.areas, schedule.links());
    Ok(GanttChart {
        layout,
        connections,
    })
}

/// Places every task of a resolved schedule.
pub fn compute_layout(
    schedule: &Schedule,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> ScheduleResult<Layout> {
    config.validate()?;

    let mut grid_start = schedule.start();
    let mut grid_end = schedule.start();
    for &root in schedule.roots() {
        let timing = schedule.resolved_timing(root)?;
        grid_start = grid_start.min(timing.start);
        grid_end = grid_end.max(timing.end);
    }

    let span_days = (grid_end - grid_start).num_milliseconds() as f64 / 86_400_000.0;
    let span_width = span_days * config.pixels_per_day as f64 + 2.0 * config.padding as f64;
    if span_width > MAX_CHART_WIDTH as f64 {
        return Err(ScheduleError::ChartTooLarge {
            width: span_width as i64,
            max: MAX_CHART_WIDTH,
        });
    }

    let mut areas: Vec<Area> = Vec::with_capacity(schedule.len());
    for id in schedule.preorder() {
        let area = place_task(schedule, id, config, measure, grid_start, areas.last())?;
        areas.push(area);
    }

    let width = areas
        .iter()
        .map(|a| a.rect.right().max(a.text_rect.right()))
        .max()
        .unwrap_or(0);
    let height = areas
        .iter()
        .map(|a| a.rect.bottom().max(a.text_rect.bottom()))
        .max()
        .unwrap_or(0);
    let canvas = Size {
        width: width + 2 * config.padding,
        height: height + 2 * config.padding,
    };

    let grid = grid::date_grid(grid_start, canvas, config);
    debug!(
        areas = areas.len(),
        width = canvas.width,
        height = canvas.height,
        "computed layout"
    );

    Ok(Layout {
        areas,
        grid,
        canvas,
        padding: config.padding,
        grid_start,
        grid_end,
    })
}

fn place_task(
    schedule: &Schedule,
    id: TaskId,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
    grid_start: NaiveDateTime,
    previous: Option<&Area>,
) -> ScheduleResult<Area> {
    let task = schedule.task(id);
    let timing = schedule.resolved_timing(id)?;
    let percent_complete = schedule.effective_percent(id).unwrap_or(0.0);
    let is_group = task.is_group();
    let is_milestone = !is_group && timing.duration.is_zero();

    let x = to_pixels(timing.start - grid_start, config.pixels_per_day);
    let y = previous.map_or(0, |a| a.rect.bottom() + config.row_gap);
    let width = to_pixels(timing.duration, config.pixels_per_day);

    let display_label = if task.description.is_empty() {
        format!("({})", task.label)
    } else {
        format!("({}) {}", task.label, task.description)
    };
    let text = measure.measure(&display_label);
    let inset = config.text_inset;

    let mut text_rect = Rect::new(x + inset, y + inset, text.width, text.height);
    let mut rect = Rect::new(x, y, width, text.height + 2 * inset);

    if is_milestone {
        rect.x -= config.milestone_width / 2;
        rect.width = config.milestone_width;
    } else {
        let min_width = if is_group {
            config.group_min_width
        } else {
            config.task_min_width
        };
        rect.width = rect.width.max(min_width);
    }
    if text_rect.width + 2 * inset > rect.width {
        text_rect.x = rect.right() + inset;
    }

    Ok(Area {
        task: id,
        rect,
        text_rect,
        display_label,
        is_group,
        is_milestone,
        percent_complete,
    })
}

/// Whole pixels covered by `span`, truncated.
pub(crate) fn to_pixels(span: TimeDelta, pixels_per_day: i32) -> i32 {
    let days = span.num_milliseconds() as f64 / 86_400_000.0;
    (days * pixels_per_day as f64) as i32
}
