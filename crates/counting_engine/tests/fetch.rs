use std::sync::{Arc, Mutex};
use std::time::Duration;

use counting_core::RunEvent;
use counting_engine::{EventSink, FetchSettings, HttpFetcher, NavigationFailure};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<RunEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: RunEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn fetcher(settings: FetchSettings) -> HttpFetcher {
    HttpFetcher::new(settings).expect("client builds")
}

#[tokio::test]
async fn fetcher_returns_html_and_emits_body_progress() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let sink = TestSink::default();
    let url = format!("{}/doc", server.uri());

    let output = fetcher(FetchSettings::default())
        .fetch(&url, &sink)
        .await
        .expect("fetch ok");
    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, output.metadata.original_url);
    assert_eq!(output.metadata.redirect_count, 0);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");

    let progress: Vec<u8> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            RunEvent::Progress { percent } => Some(percent),
            RunEvent::Log(_) => None,
        })
        .collect();
    assert_eq!(progress.last(), Some(&75));
    assert!(progress.iter().all(|p| (25..=75).contains(p)));
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = fetcher(FetchSettings::default())
        .fetch(&url, &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, NavigationFailure::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let err = fetcher(FetchSettings::default())
        .fetch("not a url", &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, NavigationFailure::InvalidUrl);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());

    let err = fetcher(settings)
        .fetch(&url, &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, NavigationFailure::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());

    let err = fetcher(settings)
        .fetch(&url, &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        NavigationFailure::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_non_html_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let url = format!("{}/data", server.uri());
    let err = fetcher(FetchSettings::default())
        .fetch(&url, &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        NavigationFailure::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}
