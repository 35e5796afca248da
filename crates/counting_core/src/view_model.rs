use crate::dashboard::aggregate_percent;
use crate::{LogEntry, LogRing, RunEvent, RunState, TaskId};

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Footer {
    /// Shown while the run is in progress.
    #[default]
    Hint,
    /// Banner shown once the runner returned.
    Finished { cancelled: bool },
}

/// Renderer-side state fed by run events; the run itself stays with the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    title: String,
    log_path: Option<String>,
    live_log_preview: bool,
    progress: u8,
    /// Id and 1-based queue position of the task most recently started.
    current: Option<(TaskId, usize)>,
    logs: LogRing,
    footer: Footer,
}

impl DashboardState {
    pub fn new(title: impl Into<String>, log_path: Option<String>) -> Self {
        Self {
            title: title.into(),
            log_path,
            live_log_preview: true,
            progress: 0,
            current: None,
            logs: LogRing::default(),
            footer: Footer::Hint,
        }
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.logs = LogRing::with_capacity(capacity);
        self
    }

    pub fn apply_event(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Progress { percent } => self.progress = *percent,
            RunEvent::Log(entry) => self.logs.push(entry.clone()),
        }
    }

    /// Tracks task changes; progress restarts at zero for every new task.
    pub fn observe(&mut self, run: &RunState) {
        let (Some(index), Some(task)) = (run.cursor(), run.current()) else {
            return;
        };
        let next = (task.id, index + 1);
        if self.current != Some(next) {
            self.current = Some(next);
            self.progress = 0;
        }
    }

    pub fn toggle_log_preview(&mut self) {
        self.live_log_preview = !self.live_log_preview;
    }

    pub fn finish(&mut self, cancelled: bool) {
        self.footer = Footer::Finished { cancelled };
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn logs(&self) -> &LogRing {
        &self.logs
    }

    pub fn view(&self, run: &RunState) -> DashboardView {
        let recent = run
            .recent(RECENT_LIMIT)
            .into_iter()
            .map(|outcome| RecentOutcome {
                id: outcome.task.id,
                succeeded: outcome.is_completed(),
            })
            .collect();

        DashboardView {
            title: self.title.clone(),
            completed: run.completed().len(),
            errored: run.errored().len(),
            total: run.total(),
            remaining: run.remaining(),
            recent,
            current: self.current.map(|(id, _)| id),
            position: self.current.map(|(_, position)| position),
            progress: self.progress,
            aggregate_percent: aggregate_percent(run.total(), run.finished_count()),
            log_path: self.log_path.clone(),
            logs: if self.live_log_preview {
                Some(self.logs.iter().cloned().collect())
            } else {
                None
            },
            footer: self.footer,
            max_width: None,
        }
    }
}

/// Immutable snapshot the dashboard frame is drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub completed: usize,
    pub errored: usize,
    pub total: usize,
    pub remaining: usize,
    pub recent: Vec<RecentOutcome>,
    pub current: Option<TaskId>,
    pub position: Option<usize>,
    pub progress: u8,
    /// `None` when the queue is empty.
    pub aggregate_percent: Option<f64>,
    pub log_path: Option<String>,
    /// `None` when the live preview is hidden.
    pub logs: Option<Vec<LogEntry>>,
    pub footer: Footer,
    /// Terminal width the frame must fit in; `None` leaves it unbounded.
    pub max_width: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentOutcome {
    pub id: TaskId,
    pub succeeded: bool,
}
