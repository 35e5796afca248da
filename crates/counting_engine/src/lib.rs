//! Counting engine: page retrieval, extraction and the sequential run loop.
mod channel;
mod decode;
mod extract;
mod fetch;
mod provider;
mod runner;
mod types;

pub use channel::{event_channel, EventPublisher, EventSink, EventSubscriber};
pub use decode::{decode_html, decode_page, DecodeError, DecodedHtml};
pub use extract::{extract_value, parse_leading_int, resolve_number, ExtractedValue};
pub use fetch::{FetchSettings, HttpFetcher, DEFAULT_USER_AGENT};
pub use provider::{FetchProvider, HttpFetchProvider};
pub use runner::{RunObserver, TaskRunner};
pub use types::{
    FetchFailure, FetchMetadata, FetchOutput, NavigationError, NavigationFailure, ProviderError,
    TaskError,
};
