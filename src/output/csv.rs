use super::{OutputResult, format_instant, format_percent, format_span};
use crate::schedule::Schedule;
use crate::task::TaskId;
use ::csv::{QuoteStyle, WriterBuilder};
use std::io;

const FIXED_COLUMNS: [&str; 7] = [
    "Parents",
    "Label",
    "Description",
    "Start",
    "End",
    "Time",
    "Percent",
];

/// One row per task in pre-order. Nested tasks are labelled
/// `label in parent-label`, metadata columns follow the fixed ones in
/// first-seen order, and every field is quoted.
pub fn render(schedule: &Schedule) -> OutputResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(schedule.metadata_columns().iter().map(|c| c.display.clone()));
    writer.write_record(&header)?;

    for &root in schedule.roots() {
        write_task(schedule, &mut writer, root, None)?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

fn write_task<W: io::Write>(
    schedule: &Schedule,
    writer: &mut ::csv::Writer<W>,
    id: TaskId,
    group: Option<&str>,
) -> OutputResult<()> {
    let task = schedule.task(id);
    let timing = schedule.resolved_timing(id)?;
    let percent = schedule.effective_percent(id).unwrap_or(0.0);

    let label = match group {
        Some(group) => format!("{} in {}", task.label, group),
        None => task.label.clone(),
    };
    let parents = task
        .parents()
        .iter()
        .map(|&p| schedule.task(p).label.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut record = vec![
        parents,
        label.clone(),
        task.description.clone(),
        format_instant(timing.start),
        format_instant(timing.end),
        format_span(timing.duration),
        format!("{}%", format_percent(percent)),
    ];
    record.extend(
        schedule
            .metadata_columns()
            .iter()
            .map(|c| task.metadata.get(&c.key).unwrap_or_default().to_string()),
    );
    writer.write_record(&record)?;

    for &child in task.children() {
        write_task(schedule, writer, child, Some(&label))?;
    }
    Ok(())
}
