use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Chart geometry knobs. Every field has a default, so a partial JSON file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub pixels_per_day: i32,
    pub padding: i32,
    /// Vertical gap between consecutive rows.
    pub row_gap: i32,
    /// Inset of the label inside its bar, and its gap when placed outside.
    pub text_inset: i32,
    pub milestone_width: i32,
    pub group_min_width: i32,
    pub task_min_width: i32,
    /// Draw hourly lines between day lines.
    pub hour_grid: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_day: 400,
            padding: 20,
            row_gap: 6,
            text_inset: 2,
            milestone_width: 12,
            group_min_width: 8,
            task_min_width: 2,
            hour_grid: true,
        }
    }
}

impl LayoutConfig {
    /// Overrides fields from the schedule's `/settings` section
    /// (`daywidth`, `padding`, `rowgap`, `hourgrid`).
    pub fn apply_settings(&mut self, schedule: &Schedule) -> ScheduleResult<()> {
        if let Some(v) = schedule.setting("daywidth") {
            self.pixels_per_day = parse_setting("daywidth", v)?;
        }
        if let Some(v) = schedule.setting("padding") {
            self.padding = parse_setting("padding", v)?;
        }
        if let Some(v) = schedule.setting("rowgap") {
            self.row_gap = parse_setting("rowgap", v)?;
        }
        if let Some(v) = schedule.setting("hourgrid") {
            self.hour_grid = parse_setting("hourgrid", &v.to_lowercase())?;
        }
        self.validate()
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.pixels_per_day <= 0 {
            return Err(ScheduleError::InvalidSetting {
                key: "daywidth".into(),
                value: self.pixels_per_day.to_string(),
            });
        }
        if self.padding < 0 {
            return Err(ScheduleError::InvalidSetting {
                key: "padding".into(),
                value: self.padding.to_string(),
            });
        }
        if self.row_gap < 0 {
            return Err(ScheduleError::InvalidSetting {
                key: "rowgap".into(),
                value: self.row_gap.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_setting<T: FromStr>(key: &str, value: &str) -> ScheduleResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScheduleError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        })
}
