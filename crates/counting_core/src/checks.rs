//! Validation checks over task definitions. They never touch the runner.

use std::collections::HashMap;
use std::fmt;

use url::Url;

use crate::{Task, TaskId};

pub const CHECK_FORMATS: &str = "Check Formats";
pub const CHECK_ORDER: &str = "Check Order";
pub const CHECK_REPEATING_DOMAINS: &str = "Check Repeating Domains";
pub const SCRAPE_TEST: &str = "Scrape Test";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Fail => write!(f, "FAIL"),
            CheckStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub check: &'static str,
    pub subject: String,
    pub status: CheckStatus,
    pub reason: String,
}

impl CheckResult {
    pub fn pass(check: &'static str, subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(check, subject, CheckStatus::Pass, reason)
    }

    pub fn fail(check: &'static str, subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(check, subject, CheckStatus::Fail, reason)
    }

    pub fn skip(check: &'static str, subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(check, subject, CheckStatus::Skipped, reason)
    }

    fn skipped(check: &'static str) -> Self {
        Self::skip(check, "No tasks", "There were no tasks to check.")
    }

    fn new(
        check: &'static str,
        subject: impl Into<String>,
        status: CheckStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            check,
            subject: subject.into(),
            status,
            reason: reason.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status != CheckStatus::Fail
    }
}

pub fn run_static_checks(tasks: &[Task]) -> Vec<CheckResult> {
    vec![
        check_formats(tasks),
        check_order(tasks),
        check_repeating_domains(tasks),
    ]
}

pub fn check_formats(tasks: &[Task]) -> CheckResult {
    if tasks.is_empty() {
        return CheckResult::skipped(CHECK_FORMATS);
    }
    for task in tasks {
        let subject = format!("Number {}", task.id);
        if task.url.trim().is_empty() {
            return CheckResult::fail(CHECK_FORMATS, subject, "Task does not have a URL.");
        }
        let parsed = match Url::parse(&task.url) {
            Ok(parsed) => parsed,
            Err(err) => {
                return CheckResult::fail(
                    CHECK_FORMATS,
                    subject,
                    format!("URL could not be parsed ({err}), rejected.\nURL: \"{}\"", task.url),
                );
            }
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return CheckResult::fail(
                CHECK_FORMATS,
                subject,
                format!("URL scheme must be http or https.\nURL: \"{}\"", task.url),
            );
        }
        if !parsed.host_str().is_some_and(|host| host.contains('.')) {
            return CheckResult::fail(
                CHECK_FORMATS,
                subject,
                format!("URL does not have a dotted host name.\nURL: \"{}\"", task.url),
            );
        }
        if task.extract.selector.trim().is_empty() {
            return CheckResult::fail(CHECK_FORMATS, subject, "Extraction selector is empty.");
        }
    }
    CheckResult::pass(
        CHECK_FORMATS,
        "All numbers passed",
        "There were no formatting errors. All numbers passed.",
    )
}

pub fn check_order(tasks: &[Task]) -> CheckResult {
    let mut ids: Vec<TaskId> = tasks.iter().map(|task| task.id).collect();
    ids.sort_unstable();
    let Some(&min) = ids.first() else {
        return CheckResult::skipped(CHECK_ORDER);
    };

    let mut previous = min;
    for &id in &ids[1..] {
        let expected = previous + 1;
        if id != expected {
            return CheckResult::fail(
                CHECK_ORDER,
                format!("Number {expected}"),
                format!(
                    "Numbers are not in sequence. Expected {expected} after {previous}, but instead got {id}"
                ),
            );
        }
        previous = id;
    }
    CheckResult::pass(
        CHECK_ORDER,
        "All numbers passed",
        "There was no error in the order. All numbers passed.",
    )
}

pub fn check_repeating_domains(tasks: &[Task]) -> CheckResult {
    if tasks.is_empty() {
        return CheckResult::skipped(CHECK_REPEATING_DOMAINS);
    }
    let mut seen: HashMap<String, TaskId> = HashMap::new();
    for task in tasks {
        let Some(domain) = domain_of(&task.url) else {
            return CheckResult::fail(
                CHECK_REPEATING_DOMAINS,
                "Unrecognized URL",
                format!("{} has no recognizable domain", task.url),
            );
        };
        if let Some(first) = seen.get(&domain) {
            return CheckResult::fail(
                CHECK_REPEATING_DOMAINS,
                "Repeated URL found",
                format!(
                    "Number {} and number {first} have the same domain {domain}",
                    task.id
                ),
            );
        }
        seen.insert(domain, task.id);
    }
    CheckResult::pass(
        CHECK_REPEATING_DOMAINS,
        "No repeating domains",
        "There were no repeating domains. All links passed.",
    )
}

/// Host of `url` in lower case without a leading `www.`.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (!host.is_empty()).then_some(host)
}
