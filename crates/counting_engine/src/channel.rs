use counting_core::{LogLevel, RunEvent};
use tokio::sync::mpsc;

/// Anything a provider can publish run events into.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}

/// Creates the in-process channel between a provider and the renderer.
pub fn event_channel() -> (EventPublisher, EventSubscriber) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventPublisher { tx }, EventSubscriber { rx })
}

#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl EventPublisher {
    /// Publishes progress, clamped to 0..=100.
    pub fn progress(&self, percent: u8) {
        self.emit(RunEvent::progress(percent));
    }

    /// Publishes a log line and mirrors it into the log sink.
    pub fn log(&self, level: LogLevel, label: &str, message: &str) {
        let sink_level = match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Error => log::Level::Error,
        };
        engine_logging::record(sink_level, label, message);
        let event = match level {
            LogLevel::Debug => RunEvent::debug(label, message),
            LogLevel::Error => RunEvent::error(label, message),
        };
        self.emit(event);
    }
}

impl EventSink for EventPublisher {
    fn emit(&self, event: RunEvent) {
        // Nobody listening is fine: a provider may run without a dashboard.
        let _ = self.tx.send(event);
    }
}

#[derive(Debug)]
pub struct EventSubscriber {
    rx: mpsc::UnboundedReceiver<RunEvent>,
}

impl EventSubscriber {
    /// Waits for the next event; `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<RunEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<RunEvent> {
        self.rx.try_recv().ok()
    }

    /// Everything already queued, oldest first.
    pub fn drain(&mut self) -> Vec<RunEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_publish_order() {
        let (publisher, mut subscriber) = event_channel();
        publisher.progress(10);
        publisher.log(LogLevel::Debug, "Scraper", "navigating");
        publisher.progress(250);

        assert_eq!(
            subscriber.drain(),
            vec![
                RunEvent::Progress { percent: 10 },
                RunEvent::debug("Scraper", "navigating"),
                RunEvent::Progress { percent: 100 },
            ]
        );
        assert!(subscriber.try_recv().is_none());
    }

    #[test]
    fn publishing_without_subscriber_is_silent() {
        let (publisher, subscriber) = event_channel();
        drop(subscriber);
        publisher.progress(50);
    }
}
