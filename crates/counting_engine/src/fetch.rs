use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use counting_core::RunEvent;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{EventSink, FetchMetadata, FetchOutput, NavigationError, NavigationFailure};

/// Progress reported when the response headers arrive.
pub(crate) const NAVIGATION_PROGRESS: u8 = 25;
/// Progress reported once the body is fully read.
pub(crate) const EVALUATION_PROGRESS: u8 = 75;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Loads page bytes over HTTP with size, type and redirect limits.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
    redirect_counter: Arc<AtomicUsize>,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, NavigationError> {
        let redirect_counter = Arc::new(AtomicUsize::new(0));
        let client = build_client(&settings, redirect_counter.clone())?;
        Ok(Self {
            settings,
            client,
            redirect_counter,
        })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    /// Fetches `url`, publishing body progress between the navigation and
    /// evaluation marks when the length is known.
    pub async fn fetch(
        &self,
        url: &str,
        sink: &dyn EventSink,
    ) -> Result<FetchOutput, NavigationError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| NavigationError::new(NavigationFailure::InvalidUrl, err.to_string()))?;
        self.redirect_counter.store(0, Ordering::Relaxed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NavigationError::new(
                NavigationFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let expected_len = response.content_length();
        if let Some(content_len) = expected_len {
            if content_len > self.settings.max_bytes {
                return Err(NavigationError::new(
                    NavigationFailure::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(NavigationError::new(
                    NavigationFailure::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(NavigationError::new(
                    NavigationFailure::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
            if let Some(total) = expected_len {
                sink.emit(RunEvent::progress(body_progress(bytes.len() as u64, total)));
            }
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            redirect_count: self.redirect_counter.load(Ordering::Relaxed),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

fn build_client(
    settings: &FetchSettings,
    redirect_counter: Arc<AtomicUsize>,
) -> Result<reqwest::Client, NavigationError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        let count = attempt.previous().len();
        redirect_counter.store(count, Ordering::Relaxed);
        if count >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.clone())
        .redirect(policy)
        .build()
        .map_err(|err| NavigationError::new(NavigationFailure::Network, err.to_string()))
}

/// Maps `received / total` onto the navigation..evaluation progress span.
fn body_progress(received: u64, total: u64) -> u8 {
    if total == 0 {
        return EVALUATION_PROGRESS;
    }
    let span = u64::from(EVALUATION_PROGRESS - NAVIGATION_PROGRESS);
    let step = span * received.min(total) / total;
    NAVIGATION_PROGRESS + step as u8
}

fn map_reqwest_error(err: reqwest::Error) -> NavigationError {
    if err.is_timeout() {
        return NavigationError::new(NavigationFailure::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return NavigationError::new(NavigationFailure::RedirectLimitExceeded, err.to_string());
    }
    NavigationError::new(NavigationFailure::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::body_progress;

    #[test]
    fn body_progress_spans_navigation_to_evaluation() {
        assert_eq!(body_progress(0, 100), 25);
        assert_eq!(body_progress(50, 100), 50);
        assert_eq!(body_progress(100, 100), 75);
        assert_eq!(body_progress(10, 0), 75);
    }
}
