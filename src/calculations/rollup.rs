//! Derived start, duration and completion of tasks.
//!
//! Leaf tasks answer from their own fields. Group tasks are recomputed from
//! their children on every call, so nothing here can go stale. A `None`
//! result means some task below the queried one has no start yet, or that
//! its end falls outside chrono's date range.

use crate::schedule::Schedule;
use crate::task::TaskId;
use chrono::{NaiveDateTime, TimeDelta};

/// Resolved time span of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start: NaiveDateTime,
    pub duration: TimeDelta,
    pub end: NaiveDateTime,
}

pub fn effective_start(schedule: &Schedule, id: TaskId) -> Option<NaiveDateTime> {
    let task = schedule.task(id);
    if !task.is_group() {
        return task.start;
    }
    let mut earliest: Option<NaiveDateTime> = None;
    for &child in task.children() {
        let start = effective_start(schedule, child)?;
        earliest = Some(earliest.map_or(start, |e| e.min(start)));
    }
    earliest
}

pub fn effective_end(schedule: &Schedule, id: TaskId) -> Option<NaiveDateTime> {
    let task = schedule.task(id);
    if !task.is_group() {
        return task.start?.checked_add_signed(task.duration);
    }
    let mut latest: Option<NaiveDateTime> = None;
    for &child in task.children() {
        let end = effective_end(schedule, child)?;
        latest = Some(latest.map_or(end, |l| l.max(end)));
    }
    latest
}

/// A leaf's duration is known even before its start is.
pub fn effective_duration(schedule: &Schedule, id: TaskId) -> Option<TimeDelta> {
    let task = schedule.task(id);
    if !task.is_group() {
        return Some(task.duration);
    }
    Some(effective_end(schedule, id)? - effective_start(schedule, id)?)
}

/// Duration-weighted mean of the children's completion. When every child is
/// a zero-length milestone the plain mean is used instead.
pub fn effective_percent(schedule: &Schedule, id: TaskId) -> Option<f64> {
    let task = schedule.task(id);
    if !task.is_group() {
        return Some(task.percent);
    }

    let mut total_weight = 0.0;
    let mut weighted = 0.0;
    let mut plain = 0.0;
    for &child in task.children() {
        let weight = effective_duration(schedule, child)?.num_milliseconds() as f64;
        let percent = effective_percent(schedule, child)?;
        total_weight += weight;
        weighted += weight * percent;
        plain += percent;
    }

    if total_weight > 0.0 {
        Some(weighted / total_weight)
    } else {
        Some(plain / task.children().len() as f64)
    }
}

pub fn timing(schedule: &Schedule, id: TaskId) -> Option<Timing> {
    let start = effective_start(schedule, id)?;
    let end = effective_end(schedule, id)?;
    Some(Timing {
        start,
        duration: end - start,
        end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn group_spans_its_children() {
        let mut s = Schedule::new(at(1));
        let g = s.add_root(Task::new("g", ""));
        s.add_child(
            g,
            Task::new("t1", "")
                .with_start(at(1))
                .with_duration(TimeDelta::days(1))
                .with_percent(100.0),
        );
        s.add_child(
            g,
            Task::new("t2", "")
                .with_start(at(2))
                .with_duration(TimeDelta::days(1))
                .with_percent(0.0),
        );

        assert_eq!(effective_start(&s, g), Some(at(1)));
        assert_eq!(effective_duration(&s, g), Some(TimeDelta::days(2)));
        assert_eq!(effective_end(&s, g), Some(at(3)));
        assert_eq!(effective_percent(&s, g), Some(50.0));
    }

    #[test]
    fn milestone_only_group_uses_plain_mean() {
        let mut s = Schedule::new(at(1));
        let h = s.add_root(Task::new("h", ""));
        s.add_child(h, Task::new("m1", "").with_start(at(1)).with_percent(0.0));
        s.add_child(h, Task::new("m2", "").with_start(at(1)).with_percent(100.0));
        assert_eq!(effective_percent(&s, h), Some(50.0));
    }

    #[test]
    fn percent_is_weighted_by_duration() {
        let mut s = Schedule::new(at(1));
        let g = s.add_root(Task::new("g", ""));
        s.add_child(
            g,
            Task::new("long", "")
                .with_start(at(1))
                .with_duration(TimeDelta::days(3))
                .with_percent(100.0),
        );
        s.add_child(
            g,
            Task::new("short", "")
                .with_start(at(1))
                .with_duration(TimeDelta::days(1))
                .with_percent(0.0),
        );
        assert_eq!(effective_percent(&s, g), Some(75.0));
    }

    #[test]
    fn unresolved_child_leaves_group_unresolved() {
        let mut s = Schedule::new(at(1));
        let g = s.add_root(Task::new("g", ""));
        s.add_child(g, Task::new("done", "").with_start(at(1)));
        s.add_child(g, Task::new("pending", "").with_duration(TimeDelta::days(2)));
        assert_eq!(effective_start(&s, g), None);
        assert_eq!(effective_duration(&s, g), None);
        assert_eq!(timing(&s, g), None);
    }

    #[test]
    fn nested_groups_roll_up_through_every_level() {
        let mut s = Schedule::new(at(1));
        let outer = s.add_root(Task::new("outer", ""));
        let inner = s.add_child(outer, Task::new("inner", ""));
        s.add_child(
            inner,
            Task::new("deep", "")
                .with_start(at(4))
                .with_duration(TimeDelta::hours(12)),
        );
        s.add_child(
            outer,
            Task::new("side", "")
                .with_start(at(2))
                .with_duration(TimeDelta::days(1)),
        );
        let t = timing(&s, outer).unwrap();
        assert_eq!(t.start, at(2));
        assert_eq!(t.end, at(4) + TimeDelta::hours(12));
        assert_eq!(t.duration, TimeDelta::hours(60));
    }

    #[test]
    fn unrepresentable_end_is_none() {
        let mut s = Schedule::new(at(1));
        let g = s.add_root(Task::new("g", ""));
        s.add_child(
            g,
            Task::new("far", "")
                .with_start(at(1))
                .with_duration(TimeDelta::days(1_000_000_000)),
        );

        assert_eq!(effective_end(&s, g), None);
        assert_eq!(timing(&s, g), None);
    }
}
