use crate::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Build the queue for `start..=end` and hand it to the runner.
    StartRun { start: TaskId, end: TaskId },
    /// Soft stop: the runner finishes the task in flight, then stops.
    CancelRun,
    ToggleLogPreview,
    /// Menu "Exit": stop the provider and leave with status 0.
    Exit,
    /// Interrupt key: stop the provider if possible and leave immediately.
    Terminate,
}
