use crate::calculations::rollup;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;
use crate::task::TaskId;
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// Fixed-point start-time propagation.
///
/// Each pass walks the hierarchy from the roots. A task is anchored at its
/// explicit start, or at the latest end among its dependency parents once
/// all of them are resolved, or at the inherited base when it has none.
/// Leaves keep their anchor as their start; groups only hand it down to
/// their children. Passes repeat while they keep resolving tasks.
pub struct ForwardPass<'a> {
    schedule: &'a mut Schedule,
}

impl<'a> ForwardPass<'a> {
    pub fn new(schedule: &'a mut Schedule) -> Self {
        Self { schedule }
    }

    pub fn execute(&mut self) -> ScheduleResult<()> {
        let mut remaining = self.unresolved_count();
        let mut pass = 0usize;

        while remaining > 0 {
            pass += 1;
            let base = self.schedule.start();
            let roots = self.schedule.roots().to_vec();
            for root in roots {
                self.visit(root, base)?;
            }

            let now = self.unresolved_count();
            debug!(
                pass,
                resolved = remaining.saturating_sub(now),
                remaining = now,
                "propagation pass"
            );
            if now >= remaining {
                let unresolved = self.unresolved_labels();
                warn!(pass, remaining = now, "propagation stalled");
                return Err(ScheduleError::UnresolvedSchedule { unresolved });
            }
            remaining = now;
        }

        Ok(())
    }

    fn visit(&mut self, id: TaskId, base: NaiveDateTime) -> ScheduleResult<()> {
        let anchor = match self.schedule.task(id).start {
            Some(start) => Some(start),
            None => self.anchor_from_parents(id, base),
        };
        let Some(anchor) = anchor else {
            return Ok(());
        };

        let task = self.schedule.task_mut(id);
        if !task.is_group() {
            // Every resolved leaf must have a representable end.
            if anchor.checked_add_signed(task.duration).is_none() {
                return Err(ScheduleError::DateOutOfRange {
                    label: task.label.clone(),
                });
            }
            task.start = Some(anchor);
            return Ok(());
        }

        let children = task.children().to_vec();
        for child in children {
            self.visit(child, anchor)?;
        }
        Ok(())
    }

    fn anchor_from_parents(&self, id: TaskId, base: NaiveDateTime) -> Option<NaiveDateTime> {
        let parents = self.schedule.task(id).parents();
        if parents.is_empty() {
            return Some(base);
        }
        let mut latest: Option<NaiveDateTime> = None;
        for &parent in parents {
            let end = rollup::effective_end(self.schedule, parent)?;
            latest = Some(latest.map_or(end, |l| l.max(end)));
        }
        latest
    }

    fn unresolved_count(&self) -> usize {
        self.schedule
            .tasks()
            .filter(|(_, t)| !t.is_group() && t.start.is_none())
            .count()
    }

    fn unresolved_labels(&self) -> Vec<String> {
        self.schedule
            .tasks()
            .filter(|(_, t)| !t.is_group() && t.start.is_none())
            .map(|(_, t)| t.label.clone())
            .collect()
    }
}
