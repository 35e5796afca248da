use std::fmt;

use crate::{Task, TaskId};

/// Why a task ended up in the errored partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Navigation,
    Extraction,
    TypeMismatch,
    Empty,
    Unparseable,
    ValueMismatch,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Navigation => write!(f, "navigation failure"),
            FailureCause::Extraction => write!(f, "extraction failure"),
            FailureCause::TypeMismatch => write!(f, "type mismatch"),
            FailureCause::Empty => write!(f, "empty result"),
            FailureCause::Unparseable => write!(f, "unparseable result"),
            FailureCause::ValueMismatch => write!(f, "value mismatch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Completed { value: i64 },
    Errored { cause: FailureCause, detail: String },
}

/// Terminal result of one attempt at a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task: Task,
    pub status: OutcomeStatus,
    /// Position in completion order across both partitions.
    pub sequence: usize,
}

impl TaskOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Completed { .. })
    }

    pub fn detail(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Completed { .. } => None,
            OutcomeStatus::Errored { detail, .. } => Some(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: Vec<TaskOutcome>,
    pub errored: Vec<TaskOutcome>,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn completed_ids(&self) -> Vec<TaskId> {
        self.completed.iter().map(|o| o.task.id).collect()
    }

    pub fn errored_ids(&self) -> Vec<TaskId> {
        self.errored.iter().map(|o| o.task.id).collect()
    }
}

/// State of a single run over a trimmed queue.
///
/// Only the runner loop writes to it; the dashboard reads snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    queue: Vec<Task>,
    cursor: Option<usize>,
    cancelled: bool,
    completed: Vec<TaskOutcome>,
    errored: Vec<TaskOutcome>,
}

impl RunState {
    pub fn new(queue: Vec<Task>) -> Self {
        Self {
            queue,
            ..Self::default()
        }
    }

    pub fn queue(&self) -> &[Task] {
        &self.queue
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Task> {
        self.cursor.and_then(|index| self.queue.get(index))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn completed(&self) -> &[TaskOutcome] {
        &self.completed
    }

    pub fn errored(&self) -> &[TaskOutcome] {
        &self.errored
    }

    pub fn finished_count(&self) -> usize {
        self.completed.len() + self.errored.len()
    }

    pub fn remaining(&self) -> usize {
        self.total().saturating_sub(self.finished_count())
    }

    pub fn is_idle(&self) -> bool {
        self.cursor.is_none()
    }

    /// Marks `index` as the task in flight.
    pub fn begin(&mut self, index: usize) {
        debug_assert!(self.cursor.is_none(), "a task is already in flight");
        debug_assert!(index < self.queue.len());
        self.cursor = Some(index);
    }

    /// Records the outcome of the task in flight and clears the cursor.
    /// Returns `None` when no task was in flight.
    pub fn record(&mut self, status: OutcomeStatus) -> Option<&TaskOutcome> {
        let index = self.cursor.take()?;
        let outcome = TaskOutcome {
            task: self.queue[index].clone(),
            status,
            sequence: self.finished_count(),
        };
        let bucket = if outcome.is_completed() {
            &mut self.completed
        } else {
            &mut self.errored
        };
        bucket.push(outcome);
        bucket.last()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Last `limit` outcomes in actual completion order.
    pub fn recent(&self, limit: usize) -> Vec<&TaskOutcome> {
        let mut all: Vec<&TaskOutcome> = self.completed.iter().chain(&self.errored).collect();
        all.sort_by_key(|outcome| outcome.sequence);
        let skip = all.len().saturating_sub(limit);
        all.into_iter().skip(skip).collect()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            completed: self.completed.clone(),
            errored: self.errored.clone(),
            cancelled: self.cancelled,
        }
    }

    pub fn into_summary(self) -> RunSummary {
        RunSummary {
            completed: self.completed,
            errored: self.errored,
            cancelled: self.cancelled,
        }
    }
}
