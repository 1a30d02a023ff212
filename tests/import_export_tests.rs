use schedule_gen::{
    LayoutConfig, LayoutOverrides, OutputError, OutputFormat, ProcessOptions, ScheduleError,
    process_file,
};
use std::fs;
use tempfile::tempdir;

const PLAN: &str = "\
/settings
start: 2024-01-01
/tasks
;design 100% 2d Design the thing [Owner:Ana]
;build 50% 3d He said \"hi\"
> ;frame 1d Frame
/links
design build
";

fn options(formats: Vec<OutputFormat>) -> ProcessOptions {
    ProcessOptions {
        formats,
        layout: LayoutConfig::default(),
        overrides: LayoutOverrides::default(),
    }
}

#[test]
fn writes_one_file_per_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plan.txt");
    fs::write(&input, PLAN).unwrap();

    let written = process_file(&input, &options(OutputFormat::ALL.to_vec())).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "plan.txt.txt",
            "plan.txt.csv",
            "plan.txt.gantt.json",
            "plan.txt.gantt.svg"
        ]
    );
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn csv_escapes_quotes_and_reads_back() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plan.txt");
    fs::write(&input, PLAN).unwrap();

    let written = process_file(&input, &options(vec![OutputFormat::Csv])).unwrap();
    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.contains(r#""He said ""hi""""#));

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(1), Some("Label"));
    assert_eq!(headers.get(7), Some("Owner"));

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].get(2), Some("He said \"hi\""));
    assert_eq!(rows[2].get(1), Some("frame in build"));
    assert_eq!(rows[0].get(7), Some("Ana"));
}

#[test]
fn text_report_lists_nested_tasks() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plan.txt");
    fs::write(&input, PLAN).unwrap();

    let written = process_file(&input, &options(vec![OutputFormat::Text])).unwrap();
    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("design - 100% (2024-01-01 00:00 to 2024-01-03 00:00)\n"));
    assert!(text.contains("\tframe - 0% (2024-01-03 00:00 to 2024-01-04 00:00)"));
}

#[test]
fn nothing_is_written_when_the_plan_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.txt");
    fs::write(&input, "start: 2024-01-01\n/tasks\n;a\n/links\na missing\n").unwrap();

    let err = process_file(&input, &options(vec![OutputFormat::Text])).unwrap_err();
    assert!(matches!(
        err,
        OutputError::Schedule(ScheduleError::UnknownLabel { .. })
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
