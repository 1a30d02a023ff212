use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use schedule_gen::{Schedule, ScheduleError, Task, build_schedule};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn forward_pass_chains_dependents_after_parents() {
    let mut s = Schedule::new(at(2024, 1, 1));
    let t1 = s.add_root(
        Task::new("T1", "")
            .with_duration(TimeDelta::days(2))
            .with_percent(100.0),
    );
    let t2 = s.add_root(
        Task::new("T2", "")
            .with_duration(TimeDelta::days(3))
            .with_percent(50.0),
    );
    s.add_link("T1", "T2").unwrap();
    s.calculate_times().unwrap();

    assert_eq!(s.effective_start(t1), Some(at(2024, 1, 1)));
    assert_eq!(s.effective_end(t1), Some(at(2024, 1, 3)));
    assert_eq!(s.effective_start(t2), Some(at(2024, 1, 3)));
    assert_eq!(s.effective_end(t2), Some(at(2024, 1, 6)));
}

#[test]
fn group_rolls_up_children() {
    let mut s = Schedule::new(at(2024, 1, 1));
    let g = s.add_root(Task::new("G", ""));
    s.add_child(
        g,
        Task::new("T1", "")
            .with_start(at(2024, 1, 1))
            .with_duration(TimeDelta::days(1))
            .with_percent(100.0),
    );
    s.add_child(
        g,
        Task::new("T2", "")
            .with_start(at(2024, 1, 2))
            .with_duration(TimeDelta::days(1)),
    );
    s.calculate_times().unwrap();

    assert_eq!(s.effective_start(g), Some(at(2024, 1, 1)));
    assert_eq!(s.effective_duration(g), Some(TimeDelta::days(2)));
    assert_eq!(s.effective_percent(g), Some(50.0));
}

#[test]
fn zero_weight_group_uses_plain_mean() {
    let mut s = Schedule::new(at(2024, 1, 1));
    let h = s.add_root(Task::new("H", ""));
    s.add_child(h, Task::new("m1", ""));
    s.add_child(h, Task::new("m2", "").with_percent(100.0));
    s.calculate_times().unwrap();

    assert_eq!(s.effective_percent(h), Some(50.0));
}

#[test]
fn diamond_waits_for_latest_parent() {
    let plan = "\
start: 2024-01-01
/tasks
;a 1d
;b 2d
;c 5d
;d 1d
/links
a b d
a c d
";
    let s = build_schedule(plan).unwrap();
    let d = s.find_task("d").unwrap();
    assert_eq!(s.effective_start(d), Some(at(2024, 1, 7)));
    assert_eq!(s.task(d).parents().len(), 2);
}

#[test]
fn linked_group_shifts_its_children() {
    let plan = "\
start: 2024-01-01
/tasks
;prep 2d
;phase Phase two
> ;x 1d
> ;y 3d
/links
prep phase
";
    let s = build_schedule(plan).unwrap();
    let phase = s.find_task("phase").unwrap();
    let y = s.find_task("y").unwrap();
    assert_eq!(s.effective_start(y), Some(at(2024, 1, 3)));
    assert_eq!(s.effective_start(phase), Some(at(2024, 1, 3)));
    assert_eq!(s.effective_end(phase), Some(at(2024, 1, 6)));
}

#[test]
fn cycle_reports_unresolved_labels() {
    let plan = "\
start: 2024-01-01
/tasks
;a 1d
;b 1d
;c 1d
/links
a b a
";
    let err = build_schedule(plan).unwrap_err();
    match err {
        ScheduleError::UnresolvedSchedule { unresolved } => {
            assert_eq!(unresolved, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn links_are_registered_on_both_ends() {
    let s = build_schedule("start: 2024-01-01\n/tasks\n;a\n;b\n/links\na b\n").unwrap();
    let a = s.find_task("a").unwrap();
    let b = s.find_task("b").unwrap();
    assert_eq!(s.task(a).dependents(), &[b]);
    assert_eq!(s.task(b).parents(), &[a]);
    assert_eq!(s.links().len(), 1);
}

#[test]
fn oversized_duration_is_rejected_by_the_parser() {
    let err = build_schedule("start: 2024-01-01\n/tasks\n;a 99999999999999999999d\n").unwrap_err();
    assert!(matches!(err, ScheduleError::MalformedInput { line: 3, .. }));
}

#[test]
fn end_beyond_the_calendar_fails_instead_of_panicking() {
    let plan = "start: 2024-01-01\n/tasks\n;a 1000000000d\n;b 1d\n/links\na b\n";
    assert_eq!(
        build_schedule(plan).unwrap_err(),
        ScheduleError::DateOutOfRange { label: "a".into() }
    );
}
