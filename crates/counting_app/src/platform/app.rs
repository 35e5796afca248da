use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use counting_core::{
    id_bounds, render_screen, trim_range, update, AppState, Effect, KeyPress, Msg, Task, TaskId,
    APP_TITLE,
};
use counting_engine::{
    event_channel, EventSubscriber, FetchProvider, FetchSettings, HttpFetchProvider, TaskRunner,
};
use crossterm::style::Stylize;
use engine_logging::{engine_error, engine_info, engine_warn};
use tokio::sync::mpsc;

use super::check;
use super::cli::{Cli, Command};
use super::dashboard::{Dashboard, SharedDashboard};
use super::definitions;
use super::input;
use super::logging;
use super::terminal::{self, TerminalGuard};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_path = logging::initialize(&cli.log_file, cli.log_level.into())?;
    engine_info!("Session log at {}", log_path.display());

    let tasks = definitions::load(cli.tasks.as_deref())?;
    let settings = cli.fetch_settings();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not build the async runtime")?;

    match &cli.command {
        Some(Command::Check(args)) => {
            let passed = runtime.block_on(check::run(&tasks, args, settings))?;
            if !passed {
                anyhow::bail!("one or more checks failed");
            }
            Ok(())
        }
        None => runtime.block_on(run_shell(tasks, settings, log_path)),
    }
}

/// Prints a fatal error once the terminal is back to normal.
pub fn report_fatal(err: &anyhow::Error) {
    engine_error!("Fatal: {:#}", err);
    eprintln!("{} {:#}", "Error:".red().bold(), err);
}

async fn run_shell(tasks: Vec<Task>, settings: FetchSettings, log_path: PathBuf) -> anyhow::Result<()> {
    let (first_id, last_id) =
        id_bounds(&tasks).context("task definitions contain no tasks")?;
    let (publisher, events) = event_channel();
    let provider = HttpFetchProvider::new(settings, publisher);

    let guard = TerminalGuard::enter().context("could not take over the terminal")?;
    let keys = input::spawn_listener();
    let mut shell = Shell {
        state: AppState::new(first_id, last_id),
        tasks,
        provider,
        events,
        keys,
        log_path: log_path.display().to_string(),
        dashboard: None,
    };
    let result = shell.run().await;
    drop(guard);
    let reason = result?;
    println!("{}", reason.message().red());
    Ok(())
}

/// Why the shell loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitReason {
    Interrupt,
    Exit,
    InputClosed,
}

impl ExitReason {
    fn message(self) -> String {
        let kind = match self {
            ExitReason::Interrupt => "keyboard interrupt",
            ExitReason::Exit => "Exit",
            ExitReason::InputClosed => "input closed",
        };
        format!("Terminated process [{kind}]")
    }
}

enum Flow {
    Continue,
    Quit(ExitReason),
}

struct Shell {
    state: AppState,
    tasks: Vec<Task>,
    provider: HttpFetchProvider,
    events: EventSubscriber,
    keys: mpsc::UnboundedReceiver<KeyPress>,
    log_path: String,
    dashboard: Option<SharedDashboard>,
}

impl Shell {
    async fn run(&mut self) -> anyhow::Result<ExitReason> {
        self.redraw()?;
        while let Some(key) = self.keys.recv().await {
            let effects = dispatch(&mut self.state, Msg::Key(key));
            let mut redraw = self.state.consume_dirty();
            for effect in effects {
                match effect {
                    Effect::StartRun { start, end } => {
                        if let Flow::Quit(reason) = self.start_run(start, end).await? {
                            return self.shutdown(reason).await;
                        }
                        redraw = true;
                    }
                    Effect::ToggleLogPreview => {
                        if let Some(dashboard) = &self.dashboard {
                            dashboard.with(Dashboard::toggle_log_preview);
                            redraw = true;
                        }
                    }
                    // Only meaningful while a run is in flight.
                    Effect::CancelRun => {}
                    Effect::Exit => return self.shutdown(ExitReason::Exit).await,
                    Effect::Terminate => return self.shutdown(ExitReason::Interrupt).await,
                }
            }
            if redraw {
                self.redraw()?;
            }
        }
        engine_warn!("Input channel closed; leaving");
        self.shutdown(ExitReason::InputClosed).await
    }

    async fn start_run(&mut self, start: TaskId, end: TaskId) -> anyhow::Result<Flow> {
        if !self.provider.is_active() {
            self.provider.start().await?;
        }
        let queue = trim_range(&self.tasks, start, end);
        engine_info!("Starting run for ids {}..={} ({} task(s))", start, end, queue.len());

        let dashboard = SharedDashboard::new(Dashboard::new(self.log_path.clone()));
        self.dashboard = Some(dashboard.clone());
        dashboard.with(|d| d.redraw())?;

        let runner = TaskRunner::new();
        let cancel = runner.cancellation();
        let mut observer = dashboard.clone();
        let summary = {
            let run = runner.run(&self.provider, &mut self.events, queue, &mut observer);
            tokio::pin!(run);
            loop {
                tokio::select! {
                    result = &mut run => break result?,
                    key = self.keys.recv() => {
                        let Some(key) = key else {
                            return Ok(Flow::Quit(ExitReason::InputClosed));
                        };
                        for effect in dispatch(&mut self.state, Msg::Key(key)) {
                            match effect {
                                Effect::CancelRun => {
                                    engine_info!("Stop requested; finishing the task in flight");
                                    cancel.cancel();
                                }
                                Effect::ToggleLogPreview => {
                                    dashboard.with(|d| {
                                        d.toggle_log_preview();
                                        d.redraw()
                                    })?;
                                }
                                // Dropping `run` abandons the fetch in flight.
                                Effect::Terminate => {
                                    return Ok(Flow::Quit(ExitReason::Interrupt));
                                }
                                Effect::StartRun { .. } | Effect::Exit => {}
                            }
                        }
                        self.state.consume_dirty();
                    }
                }
            }
        };

        dashboard.with(|d| d.finish(summary.cancelled));
        dispatch(
            &mut self.state,
            Msg::RunFinished {
                cancelled: summary.cancelled,
            },
        );
        Ok(Flow::Continue)
    }

    fn redraw(&self) -> anyhow::Result<()> {
        match render_screen(&self.state, APP_TITLE) {
            Some(frame) => terminal::draw(&frame)?,
            None => {
                if let Some(dashboard) = &self.dashboard {
                    dashboard.with(|d| d.redraw())?;
                }
            }
        }
        Ok(())
    }

    async fn shutdown(&mut self, reason: ExitReason) -> anyhow::Result<ExitReason> {
        if self.provider.is_active() {
            if let Err(err) = self.provider.stop().await {
                engine_warn!("Provider stop failed: {}", err);
            }
        }
        engine_info!("Exiting: {:?}", reason);
        Ok(reason)
    }
}

fn dispatch(state: &mut AppState, msg: Msg) -> Vec<Effect> {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    effects
}
