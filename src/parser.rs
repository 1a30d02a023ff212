//! Plan file reader.
//!
//! A plan has three sections, switched by `/settings`, `/tasks` and `/links`
//! lines (the file starts in settings):
//!
//! ```text
//! /settings
//! start: 2024-01-01
//! daywidth: 200
//! /tasks
//! ;design 100% 2d Design the thing [owner:Ana]
//! ;build 50% 3d Build it
//! > ;frame 1d Frame
//! > ;wire 4h Wiring
//!   continues the wiring description
//! ;ship 0d Release
//! /links
//! design build ship
//! ```
//!
//! Leading `>` marks nest a task under the previous one. `[key:value]`
//! tokens in a description become task metadata; a `start` entry pins the
//! task's start. A links line `a b c` adds `a -> b` and `b -> c`.

use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;
use crate::task::{Task, TaskId};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::debug;

/// A link as written in the file, before labels are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    pub parent: String,
    pub child: String,
}

/// Output of [`parse_schedule`]: the full task tree plus the links still to
/// be resolved against it.
#[derive(Debug, Clone)]
pub struct ParsedSchedule {
    pub schedule: Schedule,
    pub links: Vec<PendingLink>,
}

impl ParsedSchedule {
    /// Adds every pending link, in file order.
    pub fn resolve_links(mut self) -> ScheduleResult<Schedule> {
        for link in &self.links {
            self.schedule.add_link(&link.parent, &link.child)?;
        }
        Ok(self.schedule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Settings,
    Tasks,
    Links,
}

struct Level {
    parent: Option<TaskId>,
    depth: usize,
}

struct Parser {
    schedule: Schedule,
    start: Option<NaiveDateTime>,
    section: Section,
    levels: Vec<Level>,
    task_lines: Vec<(TaskId, usize)>,
    links: Vec<PendingLink>,
}

pub fn parse_schedule(input: &str) -> ScheduleResult<ParsedSchedule> {
    let mut parser = Parser::new();
    for (idx, raw) in input.lines().enumerate() {
        parser.line(idx + 1, raw.trim())?;
    }
    parser.finish()
}

impl Parser {
    fn new() -> Self {
        Self {
            // Replaced in `finish`; a plan without any start is rejected there.
            schedule: Schedule::new(NaiveDateTime::default()),
            start: None,
            section: Section::Settings,
            levels: vec![Level {
                parent: None,
                depth: 0,
            }],
            task_lines: Vec::new(),
            links: Vec::new(),
        }
    }

    fn line(&mut self, number: usize, line: &str) -> ScheduleResult<()> {
        if line.starts_with('/') {
            self.section = match line.to_lowercase().as_str() {
                "/settings" => Section::Settings,
                "/tasks" => Section::Tasks,
                "/links" => Section::Links,
                _ => {
                    return Err(ScheduleError::malformed(
                        number,
                        format!("unknown section '{line}'"),
                    ));
                }
            };
            return Ok(());
        }

        match self.section {
            Section::Settings => self.setting(number, line),
            Section::Tasks => self.task_line(number, line),
            Section::Links => {
                let labels: Vec<&str> = line.split_whitespace().collect();
                for pair in labels.windows(2) {
                    self.links.push(PendingLink {
                        parent: pair[0].to_string(),
                        child: pair[1].to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    fn setting(&mut self, number: usize, line: &str) -> ScheduleResult<()> {
        let Some((key, value)) = line.split_once(':') else {
            return Ok(());
        };
        let key = key.trim();
        if !key.chars().all(is_label_char) {
            return Ok(());
        }
        let value = value.trim();
        if key.eq_ignore_ascii_case("start") {
            let start = parse_instant(value).ok_or_else(|| {
                ScheduleError::malformed(number, format!("invalid start '{value}'"))
            })?;
            self.start = Some(start);
        } else {
            self.schedule.set_setting(key, value);
        }
        Ok(())
    }

    fn task_line(&mut self, number: usize, line: &str) -> ScheduleResult<()> {
        if !is_task_line(line) {
            if let Some(last) = self.last_task_at_level() {
                let task = self.schedule.task_mut(last);
                task.description.push('\n');
                task.description.push_str(line);
            }
            return Ok(());
        }

        let mut rest = line;
        let mut depth = 0usize;
        while let Some(stripped) = rest.strip_prefix('>') {
            rest = stripped.trim_start();
            depth += 1;
        }

        let top_depth = self.levels.last().map_or(0, |l| l.depth);
        if depth > top_depth {
            if let Some(last) = self.last_task_at_level() {
                self.levels.push(Level {
                    parent: Some(last),
                    depth,
                });
            }
        } else {
            while self.levels.len() > 1 && self.levels.last().is_some_and(|l| depth < l.depth) {
                self.levels.pop();
            }
        }

        let body = rest.strip_prefix(';').unwrap_or(rest);
        let task = parse_task_body(number, body)?;
        let id = match self.levels.last().and_then(|l| l.parent) {
            Some(parent) => self.schedule.add_child(parent, task),
            None => self.schedule.add_root(task),
        };
        self.task_lines.push((id, number));
        Ok(())
    }

    fn last_task_at_level(&self) -> Option<TaskId> {
        match self.levels.last().and_then(|l| l.parent) {
            Some(parent) => self.schedule.task(parent).children().last().copied(),
            None => self.schedule.roots().last().copied(),
        }
    }

    fn finish(mut self) -> ScheduleResult<ParsedSchedule> {
        let task_lines = std::mem::take(&mut self.task_lines);
        for (id, number) in task_lines {
            self.extract_metadata(id, number)?;
        }

        let start = match self.start {
            Some(start) => start,
            None => self
                .schedule
                .tasks()
                .filter_map(|(_, t)| t.start)
                .min()
                .ok_or_else(|| ScheduleError::malformed(0, "missing 'start' setting"))?,
        };
        self.schedule.set_start(start);

        debug!(
            tasks = self.schedule.len(),
            links = self.links.len(),
            "parsed schedule"
        );
        Ok(ParsedSchedule {
            schedule: self.schedule,
            links: self.links,
        })
    }

    /// Moves `[key:value]` tokens out of the description into metadata.
    fn extract_metadata(&mut self, id: TaskId, number: usize) -> ScheduleResult<()> {
        let (description, entries) = split_metadata(&self.schedule.task(id).description);
        self.schedule.task_mut(id).description = description;

        for (key, value) in entries {
            if key.eq_ignore_ascii_case("start") {
                let start = parse_instant(&value).ok_or_else(|| {
                    ScheduleError::malformed(number, format!("invalid start '{value}'"))
                })?;
                self.schedule.task_mut(id).start = Some(start);
            }
            self.schedule.insert_metadata(id, &key, value);
        }
        Ok(())
    }
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_task_line(line: &str) -> bool {
    line.trim_start_matches([' ', '\t', '>']).starts_with(';')
}

/// `label [percent%] [amount(d|h|m)] description`
fn parse_task_body(number: usize, body: &str) -> ScheduleResult<Task> {
    let label_len = body.find(|c: char| !is_label_char(c)).unwrap_or(body.len());
    let label = &body[..label_len];
    let mut rest = body[label_len..].trim_start();

    let mut percent = 0.0;
    if let Some((amount, after)) = leading_number(rest, |c| c == '%') {
        percent = parse_number(number, amount)?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(ScheduleError::malformed(
                number,
                format!("percent {amount} is outside 0-100"),
            ));
        }
        rest = after.trim_start();
    }

    let mut duration = TimeDelta::zero();
    if let Some((amount, after)) = leading_number(rest, |c| matches!(c, 'd' | 'h' | 'm')) {
        let value = parse_number(number, amount)?;
        let unit_seconds = match after.chars().next() {
            Some('d') => 86_400.0,
            Some('h') => 3_600.0,
            _ => 60.0,
        };
        let seconds = value * unit_seconds;
        duration = (seconds.is_finite() && seconds < i64::MAX as f64)
            .then(|| TimeDelta::try_seconds(seconds as i64))
            .flatten()
            .ok_or_else(|| {
                ScheduleError::malformed(number, format!("duration {amount} is too large"))
            })?;
        rest = after[1..].trim_start();
    }

    Ok(Task::new(label, rest)
        .with_percent(percent)
        .with_duration(duration))
}

/// Splits `text` into a leading run of digits and dots followed by a
/// character accepted by `suffix`. Returns the number and the text starting
/// at that suffix character (percent sign excluded).
fn leading_number(text: &str, suffix: impl Fn(char) -> bool) -> Option<(&str, &str)> {
    let len = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    if len == 0 || !text[..len].chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let next = text[len..].chars().next()?;
    if !suffix(next) {
        return None;
    }
    let after = if next == '%' {
        &text[len + 1..]
    } else {
        &text[len..]
    };
    Some((&text[..len], after))
}

fn parse_number(line: usize, text: &str) -> ScheduleResult<f64> {
    text.parse::<f64>()
        .map_err(|_| ScheduleError::malformed(line, format!("invalid number '{text}'")))
}

/// Returns the description without its `[key:value]` tokens, trimmed, and
/// the tokens in order of appearance.
pub fn split_metadata(description: &str) -> (String, Vec<(String, String)>) {
    let mut entries = Vec::new();
    let mut kept = String::with_capacity(description.len());
    let mut rest = description;

    while let Some(open) = rest.find('[') {
        let token = rest[open + 1..]
            .find(']')
            .map(|close| &rest[open + 1..open + 1 + close])
            .and_then(|inner| inner.split_once(':').map(|(k, v)| (inner, k.trim(), v.trim())))
            .filter(|(_, key, _)| !key.is_empty() && key.chars().all(is_label_char));

        match token {
            Some((inner, key, value)) => {
                kept.push_str(&rest[..open]);
                entries.push((key.to_string(), value.to_string()));
                rest = &rest[open + inner.len() + 2..];
            }
            None => {
                kept.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    kept.push_str(rest);

    let cleaned = kept
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    (cleaned.trim().to_string(), entries)
}

/// Accepts `YYYY-MM-DD`, optionally followed by ` HH:MM[:SS]` or
/// `THH:MM[:SS]`. Slashes may replace the date dashes.
pub fn parse_instant(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    const DATETIME_FORMATS: [&str; 8] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y/%m/%dT%H:%M:%S",
        "%Y/%m/%dT%H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(instant) = NaiveDateTime::parse_from_str(text, format) {
            return Some(instant);
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn parses_task_fields() {
        let task = parse_task_body(1, "build-1 50% 1.5d Build the frame").unwrap();
        assert_eq!(task.label, "build-1");
        assert_eq!(task.percent, 50.0);
        assert_eq!(task.duration, TimeDelta::hours(36));
        assert_eq!(task.description, "Build the frame");
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let task = parse_task_body(1, "m Kickoff").unwrap();
        assert_eq!(task.percent, 0.0);
        assert_eq!(task.duration, TimeDelta::zero());
        assert_eq!(task.description, "Kickoff");

        let task = parse_task_body(1, "w 90m").unwrap();
        assert_eq!(task.duration, TimeDelta::minutes(90));
        assert_eq!(task.description, "");
    }

    #[test]
    fn unit_letter_without_amount_stays_in_description() {
        let task = parse_task_body(1, "a design review").unwrap();
        assert_eq!(task.duration, TimeDelta::zero());
        assert_eq!(task.description, "design review");
    }

    #[test]
    fn bad_numbers_are_malformed() {
        assert!(matches!(
            parse_task_body(4, "a 1.2.3d x"),
            Err(ScheduleError::MalformedInput { line: 4, .. })
        ));
        assert!(matches!(
            parse_task_body(5, "a 150% x"),
            Err(ScheduleError::MalformedInput { line: 5, .. })
        ));
    }

    #[test]
    fn oversized_duration_is_malformed() {
        let err = parse_schedule("start: 2024-01-01\n/tasks\n;a 99999999999999999999d\n")
            .unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn metadata_tokens_are_extracted() {
        let (desc, entries) = split_metadata("Do it [Owner: Ana] now [cost:3]\n[bad token]");
        assert_eq!(desc, "Do it  now\n[bad token]");
        assert_eq!(
            entries,
            vec![
                ("Owner".to_string(), "Ana".to_string()),
                ("cost".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn instants_accept_several_shapes() {
        assert_eq!(parse_instant("2024-01-02"), Some(at(2, 0, 0)));
        assert_eq!(parse_instant("2024-01-02 08:30"), Some(at(2, 8, 30)));
        assert_eq!(parse_instant("2024-01-02T08:30:00"), Some(at(2, 8, 30)));
        assert_eq!(parse_instant("2024/01/03"), Some(at(3, 0, 0)));
        assert_eq!(parse_instant("soon"), None);
    }

    #[test]
    fn nesting_follows_marker_depth() {
        let input = "start: 2024-01-01\n/tasks\n;a\n>;a1\n>>;a1x\n>;a2\n;b\n";
        let parsed = parse_schedule(input).unwrap();
        let s = &parsed.schedule;
        assert_eq!(s.roots().len(), 2);
        let a = s.find_task("a").unwrap();
        let labels: Vec<_> = s
            .task(a)
            .children()
            .iter()
            .map(|&c| s.task(c).label.as_str())
            .collect();
        assert_eq!(labels, vec!["a1", "a2"]);
        let a1 = s.find_task("a1").unwrap();
        assert_eq!(s.task(a1).children().len(), 1);
    }

    #[test]
    fn continuation_lines_extend_description() {
        let input = "start: 2024-01-01\n/tasks\n;a 1d First line\nsecond line\n\n;b\n";
        let parsed = parse_schedule(input).unwrap();
        let a = parsed.schedule.find_task("a").unwrap();
        assert_eq!(
            parsed.schedule.task(a).description,
            "First line\nsecond line"
        );
    }

    #[test]
    fn links_form_chains() {
        let input = "start: 2024-01-01\n/tasks\n;a\n;b\n;c\n/links\na b c\n";
        let parsed = parse_schedule(input).unwrap();
        let pairs: Vec<_> = parsed
            .links
            .iter()
            .map(|l| (l.parent.as_str(), l.child.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "c")]);
    }

    #[test]
    fn unknown_section_is_malformed() {
        let err = parse_schedule("start: 2024-01-01\n/notes\n").unwrap_err();
        assert_eq!(
            err,
            ScheduleError::MalformedInput {
                line: 2,
                message: "unknown section '/notes'".into()
            }
        );
    }

    #[test]
    fn start_falls_back_to_earliest_pinned_task() {
        let input = "/tasks\n;a [start:2024-01-05]\n;b [Start:2024-01-03 12:00]\n";
        let parsed = parse_schedule(input).unwrap();
        assert_eq!(parsed.schedule.start(), at(3, 12, 0));

        assert!(matches!(
            parse_schedule("/tasks\n;a 1d\n"),
            Err(ScheduleError::MalformedInput { .. })
        ));
    }
}
