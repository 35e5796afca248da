use std::fmt;

use counting_core::FailureCause;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// Failure while loading a page, before any extraction happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    pub kind: NavigationFailure,
    pub message: String,
}

impl NavigationError {
    pub(crate) fn new(kind: NavigationFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for NavigationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationFailure::InvalidUrl => write!(f, "invalid url"),
            NavigationFailure::HttpStatus(code) => write!(f, "http status {code}"),
            NavigationFailure::Timeout => write!(f, "timeout"),
            NavigationFailure::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            NavigationFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            NavigationFailure::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            NavigationFailure::Network => write!(f, "network error"),
        }
    }
}

/// Recoverable failure of a single task. The runner records it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct TaskError {
    pub cause: FailureCause,
    pub detail: String,
}

impl TaskError {
    pub fn new(cause: FailureCause, detail: impl Into<String>) -> Self {
        Self {
            cause,
            detail: detail.into(),
        }
    }
}

/// Provider lifecycle failures. These end the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0} is already active.")]
    AlreadyActive(String),
    #[error("{0} is not active.")]
    NotActive(String),
    #[error("Use .start() before running fetches on {0}.")]
    NotStarted(String),
    #[error("failed to start {name}: {message}")]
    Launch { name: String, message: String },
}

/// Result error of `FetchProvider::fetch`: task-level or lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
