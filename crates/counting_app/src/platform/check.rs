//! `check` subcommand: definition checks plus an optional live scrape.

use anyhow::bail;
use counting_core::checks::{run_static_checks, CheckResult, CheckStatus, SCRAPE_TEST};
use counting_core::{id_bounds, trim_range, Task, TaskId};
use counting_engine::{event_channel, FetchFailure, FetchProvider, FetchSettings, HttpFetchProvider};
use crossterm::style::Stylize;
use engine_logging::engine_info;

use super::cli::CheckArgs;

/// Runs every check and prints the results. Returns `false` if any failed.
pub async fn run(tasks: &[Task], args: &CheckArgs, settings: FetchSettings) -> anyhow::Result<bool> {
    let (start, end) = resolve_range(tasks, args.start, args.end)?;
    let range = trim_range(tasks, start, end);
    engine_info!("Checking ids {}..={} ({} task(s))", start, end, range.len());

    let mut results = run_static_checks(&range);
    results.push(if args.live {
        scrape_test(&range, settings).await?
    } else {
        CheckResult::skip(SCRAPE_TEST, "Live fetch", "Pass --live to fetch every task.")
    });

    for result in &results {
        print_result(result);
    }
    Ok(results.iter().all(CheckResult::passed))
}

fn resolve_range(
    tasks: &[Task],
    start: Option<TaskId>,
    end: Option<TaskId>,
) -> anyhow::Result<(TaskId, TaskId)> {
    let Some((first, last)) = id_bounds(tasks) else {
        bail!("there are no task definitions to check");
    };
    let start = start.unwrap_or(first);
    if start < first {
        bail!("--start {start} is below the lowest task id {first}");
    }
    Ok((start, end.unwrap_or(last)))
}

/// Fetches each task in order and stops at the first failure.
async fn scrape_test(tasks: &[Task], settings: FetchSettings) -> anyhow::Result<CheckResult> {
    if tasks.is_empty() {
        return Ok(CheckResult::skip(SCRAPE_TEST, "No tasks", "There were no tasks to fetch."));
    }
    let (publisher, _events) = event_channel();
    let mut provider = HttpFetchProvider::new(settings, publisher).with_name("Scrape Test");
    provider.start().await?;

    let mut failure = None;
    for task in tasks {
        match provider.fetch(task).await {
            Ok(_) => {}
            Err(FetchFailure::Task(err)) => {
                failure = Some(CheckResult::fail(
                    SCRAPE_TEST,
                    format!("Number {}", task.id),
                    err.detail,
                ));
                break;
            }
            Err(FetchFailure::Provider(err)) => return Err(err.into()),
        }
    }
    provider.stop().await?;

    Ok(failure.unwrap_or_else(|| {
        CheckResult::pass(
            SCRAPE_TEST,
            "All numbers passed",
            format!("All {} number(s) were fetched and matched.", tasks.len()),
        )
    }))
}

fn print_result(result: &CheckResult) {
    let status = match result.status {
        CheckStatus::Pass => result.status.to_string().green(),
        CheckStatus::Fail => result.status.to_string().red(),
        CheckStatus::Skipped => result.status.to_string().yellow(),
    };
    println!("[{status}] {} - {}", result.check.bold(), result.subject);
    for line in result.reason.lines() {
        println!("    {line}");
    }
}
