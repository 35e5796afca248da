use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use counting_core::{render_dashboard, DashboardState, RunEvent, RunState, APP_TITLE};
use counting_engine::RunObserver;
use engine_logging::engine_warn;

use super::terminal;

/// Dashboard for the current or last run. It outlives the run so the
/// Finished screen and the log toggle can redraw it.
pub struct Dashboard {
    state: DashboardState,
    run: RunState,
}

impl Dashboard {
    pub fn new(log_path: String) -> Self {
        Self {
            state: DashboardState::new(APP_TITLE, Some(log_path)),
            run: RunState::default(),
        }
    }

    pub fn toggle_log_preview(&mut self) {
        self.state.toggle_log_preview();
    }

    pub fn finish(&mut self, cancelled: bool) {
        self.state.finish(cancelled);
    }

    pub fn redraw(&self) -> io::Result<()> {
        let mut view = self.state.view(&self.run);
        view.max_width = terminal::columns();
        terminal::draw(&render_dashboard(&view))
    }

    fn redraw_logged(&self) {
        if let Err(err) = self.redraw() {
            engine_warn!("Dashboard redraw failed: {}", err);
        }
    }
}

/// Observer handed to the runner; the shell keeps another handle to react to
/// keys while the run is in flight.
#[derive(Clone)]
pub struct SharedDashboard(Rc<RefCell<Dashboard>>);

impl SharedDashboard {
    pub fn new(dashboard: Dashboard) -> Self {
        Self(Rc::new(RefCell::new(dashboard)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Dashboard) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

impl RunObserver for SharedDashboard {
    fn state_changed(&mut self, run: &RunState) {
        let mut dashboard = self.0.borrow_mut();
        dashboard.state.observe(run);
        dashboard.run = run.clone();
        dashboard.redraw_logged();
    }

    fn event(&mut self, _run: &RunState, event: &RunEvent) {
        let mut dashboard = self.0.borrow_mut();
        dashboard.state.apply_event(event);
        dashboard.redraw_logged();
    }
}
