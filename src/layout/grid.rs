use super::{LayoutConfig, Size, to_pixels};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridKind {
    /// Midnight, labelled with the date.
    Day,
    /// 06:00, 12:00, 18:00.
    Quarter,
    Hour,
}

/// Vertical date line, in canvas coordinates (padding included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLine {
    pub x: i32,
    pub kind: GridKind,
    pub label: Option<String>,
}

/// Lines from midnight of `start`'s day until the right edge of the canvas,
/// hourly when `config.hour_grid` is set and daily otherwise.
pub fn date_grid(start: NaiveDateTime, canvas: Size, config: &LayoutConfig) -> Vec<GridLine> {
    let step = if config.hour_grid {
        TimeDelta::hours(1)
    } else {
        TimeDelta::days(1)
    };

    let mut lines = Vec::new();
    let mut current = start.date().and_time(Default::default());
    loop {
        let x = to_pixels(current - start, config.pixels_per_day) + config.padding;
        if x >= canvas.width {
            break;
        }
        if x >= 0 {
            lines.push(line_at(current, x, config.hour_grid));
        }
        current += step;
    }
    lines
}

fn line_at(at: NaiveDateTime, x: i32, hour_labels: bool) -> GridLine {
    let hour = at.hour();
    if hour == 0 {
        GridLine {
            x,
            kind: GridKind::Day,
            label: Some(at.format("%Y-%m-%d (%A)").to_string()),
        }
    } else if hour % 6 == 0 {
        GridLine {
            x,
            kind: GridKind::Quarter,
            label: hour_labels.then(|| hour.to_string()),
        }
    } else {
        GridLine {
            x,
            kind: GridKind::Hour,
            label: None,
        }
    }
}
