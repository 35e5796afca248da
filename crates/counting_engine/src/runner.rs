use counting_core::{OutcomeStatus, RunEvent, RunState, RunSummary, Task};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::{EventSubscriber, FetchFailure, FetchProvider, ProviderError};

/// Receives every run state change and every provider event, in order.
pub trait RunObserver {
    /// The task in flight changed or an outcome was recorded.
    fn state_changed(&mut self, run: &RunState);

    fn event(&mut self, run: &RunState, event: &RunEvent);
}

/// Observer that ignores everything.
impl RunObserver for () {
    fn state_changed(&mut self, _run: &RunState) {}

    fn event(&mut self, _run: &RunState, _event: &RunEvent) {}
}

/// Walks a queue one task at a time.
///
/// Cancellation is cooperative: the token is checked before each task, so a
/// fetch in flight always runs to completion and gets recorded.
#[derive(Debug, Default)]
pub struct TaskRunner {
    cancel: CancellationToken,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the input side; cancelling it stops the run at the next
    /// task boundary.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run<P>(
        &self,
        provider: &P,
        events: &mut EventSubscriber,
        queue: Vec<Task>,
        observer: &mut dyn RunObserver,
    ) -> Result<RunSummary, ProviderError>
    where
        P: FetchProvider + ?Sized,
    {
        if !provider.is_active() {
            return Err(ProviderError::NotStarted(provider.name().to_string()));
        }

        // Lifecycle chatter from before the run belongs to no task.
        let stale = events.drain().len();
        if stale > 0 {
            engine_debug!("Dropped {} event(s) published before the run", stale);
        }

        let mut run = RunState::new(queue);
        engine_info!("Run started with {} task(s)", run.total());
        observer.state_changed(&run);

        for index in 0..run.total() {
            if self.cancel.is_cancelled() {
                run.cancel();
                engine_info!(
                    "Run cancelled with {} task(s) left untouched",
                    run.remaining()
                );
                break;
            }

            run.begin(index);
            observer.state_changed(&run);
            let task = run.queue()[index].clone();

            let result = {
                let fetch = provider.fetch(&task);
                tokio::pin!(fetch);
                loop {
                    tokio::select! {
                        biased;
                        Some(event) = events.recv() => observer.event(&run, &event),
                        result = &mut fetch => break result,
                    }
                }
            };
            // Everything task `index` published is shown before its outcome.
            for event in events.drain() {
                observer.event(&run, &event);
            }

            let status = match result {
                Ok(value) => OutcomeStatus::Completed { value },
                Err(FetchFailure::Task(err)) => {
                    engine_warn!("Task {} failed ({}): {}", task.id, err.cause, err.detail);
                    OutcomeStatus::Errored {
                        cause: err.cause,
                        detail: err.detail,
                    }
                }
                Err(FetchFailure::Provider(err)) => {
                    engine_error!("Run aborted on task {}: {}", task.id, err);
                    return Err(err);
                }
            };
            run.record(status);
            observer.state_changed(&run);
        }

        engine_info!(
            "Run finished: {} completed, {} errored, cancelled={}",
            run.completed().len(),
            run.errored().len(),
            run.is_cancelled()
        );
        Ok(run.into_summary())
    }
}
