use crate::metadata::TaskMetadata;
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::fmt;

/// Index of a task inside its owning [`Schedule`](crate::Schedule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub(crate) usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub label: String,
    pub description: String,
    pub metadata: TaskMetadata,
    /// `None` until set by a `start` override or by the propagation pass.
    pub start: Option<NaiveDateTime>,
    /// Ignored for group tasks.
    pub duration: TimeDelta,
    /// Ignored for group tasks.
    pub percent: f64,
    pub(crate) children: Vec<TaskId>,
    pub(crate) parents: Vec<TaskId>,
    pub(crate) dependents: Vec<TaskId>,
}

impl Task {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            metadata: TaskMetadata::new(),
            start: None,
            duration: TimeDelta::zero(),
            percent: 0.0,
            children: Vec::new(),
            parents: Vec::new(),
            dependents: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = percent;
        self
    }

    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Hierarchy children, in declaration order.
    pub fn children(&self) -> &[TaskId] {
        &self.children
    }

    /// Tasks this one depends on (one entry per link).
    pub fn parents(&self) -> &[TaskId] {
        &self.parents
    }

    /// Tasks depending on this one (one entry per link).
    pub fn dependents(&self) -> &[TaskId] {
        &self.dependents
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}
