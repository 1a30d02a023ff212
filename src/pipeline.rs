use crate::error::{ScheduleError, ScheduleResult};
use crate::graph::dependency_cycles;
use crate::layout::{LayoutConfig, MonospaceMetrics};
use crate::output::{OutputFormat, OutputResult};
use crate::parser::parse_schedule;
use crate::schedule::Schedule;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Layout values forced from the command line. They win over both the
/// configuration file and the plan's own settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutOverrides {
    pub pixels_per_day: Option<i32>,
    pub padding: Option<i32>,
    pub hour_grid: Option<bool>,
}

impl LayoutOverrides {
    pub fn apply(&self, config: &mut LayoutConfig) {
        if let Some(v) = self.pixels_per_day {
            config.pixels_per_day = v;
        }
        if let Some(v) = self.padding {
            config.padding = v;
        }
        if let Some(v) = self.hour_grid {
            config.hour_grid = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    pub formats: Vec<OutputFormat>,
    pub layout: LayoutConfig,
    pub overrides: LayoutOverrides,
}

/// Rendered file contents, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub format: OutputFormat,
    pub path: PathBuf,
    pub contents: String,
}

/// Parses a plan, resolves its links and computes every start time.
pub fn build_schedule(input: &str) -> ScheduleResult<Schedule> {
    let mut schedule = parse_schedule(input)?.resolve_links()?;
    if let Err(err) = schedule.calculate_times() {
        if matches!(err, ScheduleError::UnresolvedSchedule { .. }) {
            for cycle in dependency_cycles(&schedule) {
                warn!(tasks = %cycle.join(" -> "), "dependency cycle");
            }
        }
        return Err(err);
    }
    Ok(schedule)
}

/// `report.plan` + `csv` -> `report.plan.csv`
pub fn output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Renders every requested format in memory. Fails as a whole if any
/// single format fails.
pub fn render_outputs(
    schedule: &Schedule,
    input: &Path,
    options: &ProcessOptions,
) -> OutputResult<Vec<RenderedOutput>> {
    let mut config = options.layout.clone();
    config.apply_settings(schedule)?;
    options.overrides.apply(&mut config);
    config.validate()?;

    let measure = MonospaceMetrics::default();
    options
        .formats
        .iter()
        .map(|&format| {
            Ok(RenderedOutput {
                format,
                path: output_path(input, format),
                contents: format.render(schedule, &config, &measure)?,
            })
        })
        .collect()
}

/// Runs one plan file end to end and returns the paths written. Nothing is
/// written unless every output rendered.
pub fn process_file(input: &Path, options: &ProcessOptions) -> OutputResult<Vec<PathBuf>> {
    let text = fs::read_to_string(input)?;
    let schedule = build_schedule(&text)?;
    let outputs = render_outputs(&schedule, input, options)?;

    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        fs::write(&output.path, output.contents)?;
        info!(format = %output.format, path = %output.path.display(), "wrote output");
        written.push(output.path);
    }
    Ok(written)
}
