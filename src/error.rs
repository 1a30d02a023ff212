use std::fmt;
use thiserror::Error;

/// Which end of a link failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSide {
    Parent,
    Child,
}

impl fmt::Display for LinkSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSide::Parent => write!(f, "parent"),
            LinkSide::Child => write!(f, "child"),
        }
    }
}

/// Errors raised while building or resolving a schedule. Any of them aborts
/// processing of the current input file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("link {side} '{label}' does not name a task")]
    UnknownLabel { label: String, side: LinkSide },

    /// The propagation loop stalled. Circular dependencies and chains whose
    /// parents never resolve are reported the same way.
    #[error("schedule did not converge, {} task(s) left without a start: {}", .unresolved.len(), .unresolved.join(", "))]
    UnresolvedSchedule { unresolved: Vec<String> },

    #[error("line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    #[error("invalid value '{value}' for setting '{key}'")]
    InvalidSetting { key: String, value: String },

    /// Start plus duration does not fit chrono's date range.
    #[error("task '{label}' ends outside the supported date range")]
    DateOutOfRange { label: String },

    #[error("chart would be {width}px wide, more than the {max}px limit")]
    ChartTooLarge { width: i64, max: i64 },
}

impl ScheduleError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
