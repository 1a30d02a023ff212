use super::{OutputResult, format_instant, format_percent};
use crate::schedule::Schedule;
use crate::task::TaskId;
use std::fmt::Write;

/// Indented plain-text report, one block per task.
pub fn render(schedule: &Schedule) -> OutputResult<String> {
    let mut out = String::new();
    for &root in schedule.roots() {
        write_task(schedule, &mut out, 0, root)?;
    }
    Ok(out)
}

fn write_task(schedule: &Schedule, out: &mut String, indent: usize, id: TaskId) -> OutputResult<()> {
    let task = schedule.task(id);
    let timing = schedule.resolved_timing(id)?;
    let percent = schedule.effective_percent(id).unwrap_or(0.0);
    let tabs = "\t".repeat(indent);

    writeln!(
        out,
        "{tabs}{} - {}% ({} to {})",
        task.label,
        format_percent(percent),
        format_instant(timing.start),
        format_instant(timing.end)
    )?;

    if !task.metadata.is_empty() {
        let tags = task
            .metadata
            .iter()
            .map(|(k, v)| format!("[{k}:{v}]"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{tabs}{tags}")?;
    }

    let description = task
        .description
        .lines()
        .map(|line| format!("{tabs}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    writeln!(out, "{description}")?;
    out.push_str("--------\n");

    for &child in task.children() {
        write_task(schedule, out, indent + 1, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::{NaiveDate, TimeDelta};

    #[test]
    fn nested_tasks_are_indented() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut s = Schedule::new(start);
        let g = s.add_root(Task::new("g", "Group"));
        let c = s.add_child(
            g,
            Task::new("c", "line one\nline two")
                .with_duration(TimeDelta::days(1))
                .with_percent(25.0),
        );
        s.insert_metadata(c, "Owner", "ana");
        s.calculate_times().unwrap();

        let out = render(&s).unwrap();
        let expected = "\
g - 25% (2024-01-01 00:00 to 2024-01-02 00:00)
Group
--------
\tc - 25% (2024-01-01 00:00 to 2024-01-02 00:00)
\t[owner:ana]
\tline one
\tline two
--------
";
        assert_eq!(out, expected);
    }
}
