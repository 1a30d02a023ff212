use crate::calculations::forward_pass::ForwardPass;
use crate::calculations::rollup::{self, Timing};
use crate::error::{LinkSide, ScheduleError, ScheduleResult};
use crate::metadata::MetadataColumns;
use crate::task::{Task, TaskId};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

/// Dependency constraint: `child` cannot start before `parent` ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub parent: TaskId,
    pub child: TaskId,
}

/// A project plan: an arena of tasks, the hierarchy over them, and the
/// dependency links between them.
#[derive(Debug, Clone)]
pub struct Schedule {
    start: NaiveDateTime,
    tasks: Vec<Task>,
    roots: Vec<TaskId>,
    links: Vec<Link>,
    metadata_columns: MetadataColumns,
    settings: BTreeMap<String, String>,
}

impl Schedule {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            tasks: Vec::new(),
            roots: Vec::new(),
            links: Vec::new(),
            metadata_columns: MetadataColumns::default(),
            settings: BTreeMap::new(),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.start = start;
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn roots(&self) -> &[TaskId] {
        &self.roots
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn metadata_columns(&self) -> &MetadataColumns {
        &self.metadata_columns
    }

    /// Panics if `id` was not issued by this schedule.
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    pub fn task_mut(&mut self, id: TaskId) -> &mut Task {
        &mut self.tasks[id.0]
    }

    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (TaskId(i), t))
    }

    pub fn add_root(&mut self, task: Task) -> TaskId {
        let id = self.push(task);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: TaskId, task: Task) -> TaskId {
        let id = self.push(task);
        self.tasks[parent.0].children.push(id);
        id
    }

    fn push(&mut self, task: Task) -> TaskId {
        let id = TaskId(self.tasks.len());
        for (key, _) in task.metadata.iter() {
            self.metadata_columns.record(key);
        }
        self.tasks.push(task);
        id
    }

    /// Sets a metadata entry on a task and records `key`'s display casing
    /// on the schedule if it is new.
    pub fn insert_metadata(&mut self, id: TaskId, key: &str, value: impl Into<String>) {
        self.metadata_columns.record(key);
        self.tasks[id.0].metadata.insert(key, value);
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn set_setting(&mut self, key: &str, value: impl Into<String>) {
        self.settings.insert(key.to_lowercase(), value.into());
    }

    /// All task ids, parents before their descendants.
    pub fn preorder(&self) -> Vec<TaskId> {
        let mut out = Vec::with_capacity(self.tasks.len());
        let mut stack: Vec<TaskId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.tasks[id.0].children.iter().rev().copied());
        }
        out
    }

    /// First task in pre-order whose label matches. Linear scan of the tree.
    pub fn find_task(&self, label: &str) -> Option<TaskId> {
        self.preorder()
            .into_iter()
            .find(|id| self.tasks[id.0].label == label)
    }

    pub fn add_link(&mut self, parent_label: &str, child_label: &str) -> ScheduleResult<()> {
        let parent = self
            .find_task(parent_label)
            .ok_or_else(|| ScheduleError::UnknownLabel {
                label: parent_label.to_string(),
                side: LinkSide::Parent,
            })?;
        let child = self
            .find_task(child_label)
            .ok_or_else(|| ScheduleError::UnknownLabel {
                label: child_label.to_string(),
                side: LinkSide::Child,
            })?;
        self.link(parent, child);
        trace!(parent = parent_label, child = child_label, "linked tasks");
        Ok(())
    }

    pub fn link(&mut self, parent: TaskId, child: TaskId) {
        self.links.push(Link { parent, child });
        self.tasks[parent.0].dependents.push(child);
        self.tasks[child.0].parents.push(parent);
    }

    /// Resolves the start of every leaf task, iterating until no further
    /// task can be resolved.
    pub fn calculate_times(&mut self) -> ScheduleResult<()> {
        ForwardPass::new(self).execute()
    }

    pub fn effective_start(&self, id: TaskId) -> Option<NaiveDateTime> {
        rollup::effective_start(self, id)
    }

    pub fn effective_duration(&self, id: TaskId) -> Option<TimeDelta> {
        rollup::effective_duration(self, id)
    }

    pub fn effective_end(&self, id: TaskId) -> Option<NaiveDateTime> {
        rollup::effective_end(self, id)
    }

    pub fn effective_percent(&self, id: TaskId) -> Option<f64> {
        rollup::effective_percent(self, id)
    }

    pub fn timing(&self, id: TaskId) -> Option<Timing> {
        rollup::timing(self, id)
    }

    /// Like [`Schedule::timing`], for consumers that run after
    /// [`Schedule::calculate_times`] succeeded.
    pub fn resolved_timing(&self, id: TaskId) -> ScheduleResult<Timing> {
        self.timing(id)
            .ok_or_else(|| ScheduleError::UnresolvedSchedule {
                unresolved: vec![self.task(id).label.clone()],
            })
    }
}
