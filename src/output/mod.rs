use crate::error::ScheduleError;
use crate::layout::{self, LayoutConfig, TextMeasure};
use crate::schedule::Schedule;
use chrono::{NaiveDateTime, TimeDelta};
use std::fmt;
use std::io;
use std::str::FromStr;
use thiserror::Error;

pub mod csv;
pub mod svg;
pub mod text;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("unknown output format '{0}' (expected text, csv, json or svg)")]
    UnknownOutputFormat(String),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("formatting error: {0}")]
    Fmt(#[from] fmt::Error),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Every report or chart the tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Text,
    Csv,
    /// Chart geometry for external renderers.
    Json,
    Svg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Text,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Svg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Svg => "svg",
        }
    }

    /// Suffix appended to the input file name.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "gantt.json",
            OutputFormat::Svg => "gantt.svg",
        }
    }

    /// Renders a resolved schedule into the file contents for this format.
    pub fn render(
        self,
        schedule: &Schedule,
        config: &LayoutConfig,
        measure: &dyn TextMeasure,
    ) -> OutputResult<String> {
        match self {
            OutputFormat::Text => text::render(schedule),
            OutputFormat::Csv => csv::render(schedule),
            OutputFormat::Json => {
                let chart = layout::chart(schedule, config, measure)?;
                Ok(serde_json::to_string_pretty(&chart)?)
            }
            OutputFormat::Svg => {
                let chart = layout::chart(schedule, config, measure)?;
                Ok(svg::render(&chart)?)
            }
        }
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| OutputError::UnknownOutputFormat(s.trim().to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn format_instant(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%d %H:%M").to_string()
}

/// `[d.]hh:mm:ss`
pub(crate) fn format_span(span: TimeDelta) -> String {
    let total = span.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let (days, rem) = (total / 86_400, total % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);
    if days > 0 {
        format!("{sign}{days}.{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// At most two decimals, trailing zeros dropped.
pub(crate) fn format_percent(percent: f64) -> String {
    let text = format!("{percent:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
