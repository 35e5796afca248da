use counting_core::{
    aggregate_percent, progress_bar, render_dashboard, render_screen, update, AppState,
    DashboardState, ExtractSpec, FailureCause, Footer, KeyPress, Msg, OutcomeStatus, RunEvent,
    RunState, Task, Tone, PROGRESS_BAR_WIDTH,
};
use pretty_assertions::assert_eq;

fn filled(bar: &str) -> usize {
    bar.chars().filter(|c| *c == '█').count()
}

fn queue(ids: &[u64]) -> Vec<Task> {
    ids.iter()
        .map(|id| Task::new(*id, format!("https://t{id}.example.com"), ExtractSpec::text("p")))
        .collect()
}

#[test]
fn progress_bar_fill_counts() {
    assert_eq!(filled(&progress_bar(0.0, PROGRESS_BAR_WIDTH)), 0);
    assert_eq!(filled(&progress_bar(50.0, PROGRESS_BAR_WIDTH)), 11);
    assert_eq!(filled(&progress_bar(100.0, PROGRESS_BAR_WIDTH)), 21);
    for percent in [0.0, 33.0, 50.0, 99.0, 100.0] {
        assert_eq!(progress_bar(percent, PROGRESS_BAR_WIDTH).chars().count(), 21);
    }
}

#[test]
fn aggregate_after_each_outcome() {
    assert_eq!(aggregate_percent(4, 0), Some(0.0));
    assert_eq!(aggregate_percent(4, 2), Some(50.0));
    assert_eq!(aggregate_percent(4, 4), Some(100.0));
    assert_eq!(aggregate_percent(0, 0), None);
}

#[test]
fn view_tracks_counters_and_current_task() {
    let mut run = RunState::new(queue(&[1, 2, 3, 4]));
    let mut dashboard = DashboardState::new("Title", Some("logs/cli.log".to_string()));

    run.begin(0);
    dashboard.observe(&run);
    dashboard.apply_event(&RunEvent::progress(75));
    run.record(OutcomeStatus::Completed { value: 1 });
    run.begin(1);
    dashboard.observe(&run);
    run.record(OutcomeStatus::Errored {
        cause: FailureCause::Navigation,
        detail: "offline".into(),
    });

    let view = dashboard.view(&run);
    assert_eq!(view.completed, 1);
    assert_eq!(view.errored, 1);
    assert_eq!(view.total, 4);
    assert_eq!(view.remaining, 2);
    assert_eq!(view.aggregate_percent, Some(50.0));
    assert_eq!(view.current, Some(2));
    assert_eq!(view.position, Some(2));
    // A new task starts from zero.
    assert_eq!(view.progress, 0);
    assert_eq!(view.footer, Footer::Hint);
}

#[test]
fn frame_shows_blocks_and_colors_failures() {
    let mut run = RunState::new(queue(&[1, 2, 3]));
    let mut dashboard = DashboardState::new("Webscrape Counting", Some("logs/cli.log".into()));
    run.begin(0);
    dashboard.observe(&run);
    run.record(OutcomeStatus::Completed { value: 1 });
    run.begin(1);
    dashboard.observe(&run);
    dashboard.apply_event(&RunEvent::error("Scraper", "page went away"));
    run.record(OutcomeStatus::Errored {
        cause: FailureCause::Extraction,
        detail: "page went away".into(),
    });

    let frame = render_dashboard(&dashboard.view(&run));
    assert!(frame.contains("Webscrape Counting"));
    assert!(frame.contains("Completed: 1"));
    assert!(frame.contains("Errored:   1"));
    assert!(frame.contains("Total:     3"));
    assert!(frame.contains("1 left to go."));
    assert!(frame.contains("Logs -> logs/cli.log"));
    assert!(frame.contains("* (SCRAPER) page went away"));
    assert!(frame.contains("'q' to stop"));

    let alert_texts: Vec<String> = frame
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .filter(|span| span.tone == Tone::Alert)
        .map(|span| span.text.clone())
        .collect();
    assert!(alert_texts.iter().any(|text| text == "2"));
    assert!(alert_texts.iter().any(|text| text.contains("page went away")));
    assert!(!alert_texts.iter().any(|text| text == "1"));

    let widths: Vec<usize> = frame.lines.iter().map(|line| line.width()).collect();
    assert!(widths.iter().all(|w| *w == widths[0]));
}

#[test]
fn empty_queue_skips_aggregate_bar() {
    let run = RunState::new(Vec::new());
    let dashboard = DashboardState::new("T", None);
    let frame = render_dashboard(&dashboard.view(&run));

    let bars = frame
        .text_lines()
        .iter()
        .filter(|line| line.contains('░'))
        .count();
    // Only the per-task bar remains.
    assert_eq!(bars, 1);
    assert!(!frame.contains("Logs ->"));
}

#[test]
fn hidden_preview_keeps_log_path() {
    let run = RunState::new(queue(&[1]));
    let mut dashboard = DashboardState::new("T", Some("run.log".into()));
    dashboard.apply_event(&RunEvent::debug("Scraper", "navigating"));
    dashboard.toggle_log_preview();

    let frame = render_dashboard(&dashboard.view(&run));
    assert!(frame.contains("Logs -> run.log"));
    assert!(!frame.contains("navigating"));
}

#[test]
fn finished_banner_replaces_hint() {
    let run = RunState::new(queue(&[1]));
    let mut dashboard = DashboardState::new("T", None);
    dashboard.finish(false);
    let frame = render_dashboard(&dashboard.view(&run));

    assert!(frame.contains("Scraping is finished. Press q to return."));
    assert!(!frame.contains("'q' to stop"));
}

#[test]
fn preview_keeps_five_latest_logs() {
    let run = RunState::new(queue(&[1]));
    let mut dashboard = DashboardState::new("T", Some("x.log".into()));
    for index in 0..7 {
        dashboard.apply_event(&RunEvent::debug("Scraper", format!("step {index}")));
    }
    let view = dashboard.view(&run);
    let messages: Vec<String> = view
        .logs
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.message)
        .collect();
    assert_eq!(
        messages,
        vec!["step 2", "step 3", "step 4", "step 5", "step 6"]
    );
}

#[test]
fn prompt_screen_shows_invalid_number() {
    let (state, _) = update(AppState::new(1, 4), Msg::Key(KeyPress::Enter));
    let (state, _) = update(state, Msg::Key(KeyPress::Char('x')));
    let (state, _) = update(state, Msg::Key(KeyPress::Enter));

    let frame = render_screen(&state, "Webscrape Counting").expect("prompt frame");
    assert!(frame.contains("Invalid Number"));
    assert!(frame.contains("Start from: 1_"));
}

#[test]
fn menu_screen_highlights_selection() {
    let frame = render_screen(&AppState::new(1, 4), "Webscrape Counting").expect("menu frame");
    let selected: Vec<String> = frame
        .lines
        .iter()
        .flat_map(|line| line.spans.iter())
        .filter(|span| span.tone == Tone::Selected)
        .map(|span| span.text.clone())
        .collect();
    assert_eq!(selected, vec![" Start ".to_string()]);
}

#[test]
fn long_log_lines_stay_inside_the_terminal_width() {
    let mut run = RunState::new(queue(&(1..=12).collect::<Vec<_>>()));
    let mut dashboard = DashboardState::new("Webscrape Counting", Some("logs/cli.log".into()));
    for index in 0..12 {
        run.begin(index);
        dashboard.observe(&run);
        run.record(OutcomeStatus::Errored {
            cause: FailureCause::Navigation,
            detail: "offline".into(),
        });
    }
    dashboard.apply_event(&RunEvent::error(
        "Scraper",
        format!(
            "Error while navigating to https://cloud.google.com/text-to-speech/docs/release-notes: \
             network error: error sending request for url ({})",
            "x".repeat(120)
        ),
    ));

    let mut view = dashboard.view(&run);
    let unbounded = render_dashboard(&view);
    assert!(unbounded.lines.iter().any(|line| line.width() > 80));

    view.max_width = Some(80);
    let frame = render_dashboard(&view);
    let widths: Vec<usize> = frame.lines.iter().map(|line| line.width()).collect();
    assert!(widths.iter().all(|w| *w <= 80), "widths: {widths:?}");
    assert!(widths.iter().all(|w| *w == widths[0]));
    assert!(frame.contains("* (SCRAPER) Error while navigating to"));
    assert!(frame.contains("…"));
}
