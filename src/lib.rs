pub mod calculations;
pub mod error;
pub mod graph;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod schedule;
pub mod task;

pub use calculations::rollup::Timing;
pub use error::{LinkSide, ScheduleError, ScheduleResult};
pub use layout::{
    Area, Connection, GanttChart, Layout, LayoutConfig, MonospaceMetrics, TextMeasure,
    compute_connections, compute_layout,
};
pub use metadata::{MetadataColumns, TaskMetadata};
pub use output::{OutputError, OutputFormat};
pub use parser::{ParsedSchedule, parse_schedule};
pub use pipeline::{LayoutOverrides, ProcessOptions, build_schedule, process_file};
pub use schedule::{Link, Schedule};
pub use task::{Task, TaskId};
