mod app;
mod check;
mod cli;
mod dashboard;
mod definitions;
mod input;
mod logging;
mod terminal;

pub use app::{report_fatal, run_app};
