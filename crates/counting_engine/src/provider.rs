use counting_core::{FailureCause, LogLevel, Task};

use crate::decode::decode_page;
use crate::extract::{extract_value, resolve_number};
use crate::fetch::{EVALUATION_PROGRESS, NAVIGATION_PROGRESS};
use crate::{EventPublisher, FetchFailure, FetchSettings, HttpFetcher, ProviderError, TaskError};

const STARTED_PROGRESS: u8 = 10;
const DONE_PROGRESS: u8 = 100;

/// Performs the remote retrieval for a task and publishes progress/log
/// events while doing so.
#[async_trait::async_trait]
pub trait FetchProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Fails with [`ProviderError::AlreadyActive`] when already started.
    async fn start(&mut self) -> Result<(), ProviderError>;

    /// Fails with [`ProviderError::NotActive`] when not started.
    async fn stop(&mut self) -> Result<(), ProviderError>;

    /// Resolves to the value found for `task`, which must equal its id.
    async fn fetch(&self, task: &Task) -> Result<i64, FetchFailure>;
}

/// Fetches pages over HTTP and evaluates extraction recipes on them.
pub struct HttpFetchProvider {
    name: String,
    settings: FetchSettings,
    events: EventPublisher,
    session: Option<HttpFetcher>,
}

impl HttpFetchProvider {
    pub fn new(settings: FetchSettings, events: EventPublisher) -> Self {
        let provider = Self {
            name: "Scraper".to_string(),
            settings,
            events,
            session: None,
        };
        provider.debug("Scraper object constructed.");
        provider
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn debug(&self, message: &str) {
        self.events.log(LogLevel::Debug, &self.name, message);
    }

    fn error(&self, message: &str) {
        self.events.log(LogLevel::Error, &self.name, message);
    }

    async fn fetch_number(&self, fetcher: &HttpFetcher, task: &Task) -> Result<i64, TaskError> {
        self.debug(&format!("Navigating to {}", task.url));
        self.events.progress(NAVIGATION_PROGRESS);
        let output = fetcher.fetch(&task.url, &self.events).await.map_err(|err| {
            TaskError::new(
                FailureCause::Navigation,
                format!("Error while navigating to {}: {err}", task.url),
            )
        })?;

        self.debug("Evaluating query function.");
        self.events.progress(EVALUATION_PROGRESS);
        let page = decode_page(&output).map_err(|err| {
            TaskError::new(
                FailureCause::Extraction,
                format!("Failed to evaluate query function, error was: {err}"),
            )
        })?;
        let value = extract_value(&page.html, &task.extract)?;

        self.debug(&format!("Parsing {value} into a number"));
        let number = resolve_number(value)?;

        let expected = task.expected_value();
        if i64::try_from(expected).ok() != Some(number) {
            return Err(TaskError::new(
                FailureCause::ValueMismatch,
                format!("Mismatched number. Expected {expected} but got {number}"),
            ));
        }
        Ok(number)
    }
}

#[async_trait::async_trait]
impl FetchProvider for HttpFetchProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }

    async fn start(&mut self) -> Result<(), ProviderError> {
        if self.session.is_some() {
            return Err(ProviderError::AlreadyActive(self.name.clone()));
        }

        self.debug("Building HTTP client");
        let fetcher = HttpFetcher::new(self.settings.clone()).map_err(|err| {
            let err = ProviderError::Launch {
                name: self.name.clone(),
                message: err.to_string(),
            };
            self.error(&err.to_string());
            err
        })?;
        self.session = Some(fetcher);
        self.debug(&format!("Successfully started {}.", self.name));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ProviderError> {
        if self.session.take().is_none() {
            return Err(ProviderError::NotActive(self.name.clone()));
        }
        self.debug(&format!("Successfully stopped {}.", self.name));
        Ok(())
    }

    async fn fetch(&self, task: &Task) -> Result<i64, FetchFailure> {
        self.debug(&format!(
            "Attempting to fetch number {} from {}",
            task.id, task.url
        ));
        self.events.progress(STARTED_PROGRESS);

        let Some(fetcher) = self.session.as_ref() else {
            let err = ProviderError::NotStarted(self.name.clone());
            self.error(&err.to_string());
            return Err(err.into());
        };

        match self.fetch_number(fetcher, task).await {
            Ok(number) => {
                self.events.progress(DONE_PROGRESS);
                self.debug(&format!("Finished fetch, returned number {number}"));
                Ok(number)
            }
            Err(err) => {
                self.error(&err.detail);
                Err(err.into())
            }
        }
    }
}
