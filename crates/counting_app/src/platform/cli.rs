//! Command-line flags for the counting binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use counting_core::TaskId;
use counting_engine::FetchSettings;
use log::LevelFilter;

/// Fetches a list of pages and checks that each one counts up by one.
#[derive(Debug, Parser)]
#[command(name = "webscrape-counting", version, about, long_about = None)]
pub struct Cli {
    /// RON file with task definitions. Defaults to the built-in set.
    #[arg(long, global = true, value_name = "FILE")]
    pub tasks: Option<PathBuf>,
    /// Where the session log is written.
    #[arg(long, global = true, value_name = "FILE", default_value = "logs/cli.log")]
    pub log_file: PathBuf,
    /// Lowest level written to the log file.
    #[arg(long, global = true, value_enum, default_value_t = LogLevelArg::Debug)]
    pub log_level: LogLevelArg,
    /// Whole-request timeout for each page.
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,
    /// User agent sent with every request.
    #[arg(long, global = true, value_name = "UA")]
    pub user_agent: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate the task definitions instead of opening the menu.
    Check(CheckArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// First task id to check. Defaults to the lowest id.
    #[arg(long, value_name = "ID")]
    pub start: Option<TaskId>,
    /// Last task id to check. Defaults to the highest id.
    #[arg(long, value_name = "ID")]
    pub end: Option<TaskId>,
    /// Also fetch every task in range.
    #[arg(long)]
    pub live: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        settings
    }
}
