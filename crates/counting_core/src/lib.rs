//! Counting core: task model, run state, screen state machine and dashboard
//! layout. Everything here is pure; IO lives in the engine and the app.
pub mod checks;
mod dashboard;
mod effect;
mod event;
mod frame;
mod msg;
mod run;
mod screens;
mod state;
mod task;
mod update;
mod view_model;

pub use dashboard::{aggregate_percent, progress_bar, render as render_dashboard, PROGRESS_BAR_WIDTH};
pub use effect::Effect;
pub use event::{LogEntry, LogLevel, LogRing, RunEvent, LOG_PREVIEW_LIMIT};
pub use frame::{Frame, Line, Span, Tone};
pub use msg::{KeyPress, Msg};
pub use run::{FailureCause, OutcomeStatus, RunState, RunSummary, TaskOutcome};
pub use screens::render_screen;
pub use state::{
    AppState, MenuChoice, RangeField, RangePrompt, Screen, LOG_TOGGLE_KEY, QUIT_KEY,
};
pub use task::{id_bounds, trim_range, ExtractSpec, Reduce, Task, TaskId, ValueSource};
pub use update::update;
pub use view_model::{DashboardState, DashboardView, Footer, RecentOutcome, RECENT_LIMIT};

/// Title shown on every screen.
pub const APP_TITLE: &str = "Webscrape Counting";
