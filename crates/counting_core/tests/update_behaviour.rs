use std::sync::Once;

use counting_core::{
    update, AppState, Effect, KeyPress, MenuChoice, Msg, RangeField, Screen,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn press(state: AppState, key: KeyPress) -> (AppState, Vec<Effect>) {
    update(state, Msg::Key(key))
}

fn type_text(mut state: AppState, text: &str) -> AppState {
    for ch in text.chars() {
        state = press(state, KeyPress::Char(ch)).0;
    }
    state
}

fn clear_input(mut state: AppState) -> AppState {
    for _ in 0..16 {
        state = press(state, KeyPress::Backspace).0;
    }
    state
}

fn prompt_input(state: &AppState) -> (RangeField, String, bool) {
    match state.screen() {
        Screen::Prompt(prompt) => (prompt.field, prompt.input.clone(), prompt.invalid),
        other => panic!("expected prompt, got {other:?}"),
    }
}

/// Menu -> Start -> accept both defaults.
fn start_run_with_defaults(state: AppState) -> (AppState, Vec<Effect>) {
    let (state, _) = press(state, KeyPress::Enter);
    let (state, _) = press(state, KeyPress::Enter);
    press(state, KeyPress::Enter)
}

#[test]
fn start_prompts_with_defaults_and_starts_run() {
    init_logging();
    let state = AppState::new(1, 4);
    let (state, effects) = press(state, KeyPress::Enter);
    assert!(effects.is_empty());
    assert_eq!(prompt_input(&state), (RangeField::Start, "1".to_string(), false));

    let (state, effects) = press(state, KeyPress::Enter);
    assert!(effects.is_empty());
    assert_eq!(prompt_input(&state), (RangeField::End, "4".to_string(), false));

    let (state, effects) = press(state, KeyPress::Enter);
    assert_eq!(effects, vec![Effect::StartRun { start: 1, end: 4 }]);
    assert_eq!(
        state.screen(),
        &Screen::Running {
            cancel_requested: false
        }
    );
}

#[test]
fn typed_range_replaces_defaults() {
    init_logging();
    let (state, _) = press(AppState::new(1, 10), KeyPress::Enter);
    let state = type_text(clear_input(state), "3");
    let (state, _) = press(state, KeyPress::Enter);
    let state = type_text(clear_input(state), "7");
    let (_state, effects) = press(state, KeyPress::Enter);

    assert_eq!(effects, vec![Effect::StartRun { start: 3, end: 7 }]);
}

#[test]
fn non_numeric_input_reprompts_with_default() {
    init_logging();
    let (state, _) = press(AppState::new(1, 4), KeyPress::Enter);
    let state = type_text(clear_input(state), "abc");
    let (state, effects) = press(state, KeyPress::Enter);

    assert!(effects.is_empty());
    assert_eq!(prompt_input(&state), (RangeField::Start, "1".to_string(), true));
}

#[test]
fn zero_is_rejected() {
    init_logging();
    let (state, _) = press(AppState::new(1, 4), KeyPress::Enter);
    let state = type_text(clear_input(state), "0");
    let (state, _) = press(state, KeyPress::Enter);

    assert_eq!(prompt_input(&state), (RangeField::Start, "1".to_string(), true));
}

#[test]
fn empty_input_reprompts_silently() {
    init_logging();
    let (state, _) = press(AppState::new(2, 4), KeyPress::Enter);
    let state = clear_input(state);
    let (state, effects) = press(state, KeyPress::Enter);

    assert!(effects.is_empty());
    assert_eq!(prompt_input(&state), (RangeField::Start, "2".to_string(), false));
}

#[test]
fn quit_key_is_text_inside_prompt() {
    init_logging();
    let (state, _) = press(AppState::new(1, 4), KeyPress::Enter);
    let (state, effects) = press(state, KeyPress::Char('q'));

    assert!(effects.is_empty());
    assert_eq!(prompt_input(&state).1, "1q");
}

#[test]
fn menu_selection_wraps_and_exit_emits_effect() {
    init_logging();
    let (state, _) = press(AppState::new(1, 4), KeyPress::Right);
    assert_eq!(
        state.screen(),
        &Screen::Menu {
            selected: MenuChoice::Exit
        }
    );

    let (state, effects) = press(state, KeyPress::Enter);
    assert_eq!(effects, vec![Effect::Exit]);

    let (state, _) = press(state, KeyPress::Left);
    assert_eq!(
        state.screen(),
        &Screen::Menu {
            selected: MenuChoice::Start
        }
    );
}

#[test]
fn quit_while_running_requests_cancel_once() {
    init_logging();
    let (state, _) = start_run_with_defaults(AppState::new(1, 4));

    let (state, effects) = press(state, KeyPress::Char('q'));
    assert_eq!(effects, vec![Effect::CancelRun]);
    assert_eq!(
        state.screen(),
        &Screen::Running {
            cancel_requested: true
        }
    );

    let (_state, effects) = press(state, KeyPress::Char('q'));
    assert!(effects.is_empty());
}

#[test]
fn run_finished_then_quit_returns_to_menu() {
    init_logging();
    let (state, _) = start_run_with_defaults(AppState::new(1, 4));
    let (state, _) = update(state, Msg::RunFinished { cancelled: false });
    assert_eq!(state.screen(), &Screen::Finished { cancelled: false });

    let (mut state, effects) = press(state, KeyPress::Char('q'));
    assert!(effects.is_empty());
    assert_eq!(state.screen(), &Screen::default());
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn run_finished_outside_a_run_is_ignored() {
    init_logging();
    let state = AppState::new(1, 4);
    let (next, effects) = update(state.clone(), Msg::RunFinished { cancelled: true });

    assert_eq!(next.screen(), state.screen());
    assert!(effects.is_empty());
}

#[test]
fn interrupt_terminates_from_every_screen() {
    init_logging();
    let menu = AppState::new(1, 4);
    let (prompt, _) = press(menu.clone(), KeyPress::Enter);
    let (running, _) = start_run_with_defaults(menu.clone());
    let (finished, _) = update(running.clone(), Msg::RunFinished { cancelled: true });

    for state in [menu, prompt, running, finished] {
        let (_state, effects) = press(state, KeyPress::Interrupt);
        assert_eq!(effects, vec![Effect::Terminate]);
    }
}

#[test]
fn log_toggle_only_on_dashboard() {
    init_logging();
    let (running, _) = start_run_with_defaults(AppState::new(1, 4));
    let (_running, effects) = press(running, KeyPress::Char('l'));
    assert_eq!(effects, vec![Effect::ToggleLogPreview]);

    let (_menu, effects) = press(AppState::new(1, 4), KeyPress::Char('l'));
    assert!(effects.is_empty());
}

#[test]
fn finished_screen_accepts_only_quit() {
    init_logging();
    let (running, _) = start_run_with_defaults(AppState::new(1, 4));
    let (finished, _) = update(running, Msg::RunFinished { cancelled: false });

    for key in [KeyPress::Char('l'), KeyPress::Enter, KeyPress::Esc] {
        let (next, effects) = press(finished.clone(), key);
        assert_eq!(next.screen(), finished.screen());
        assert!(effects.is_empty());
    }
    let (menu, _) = press(finished, KeyPress::Char('q'));
    assert_eq!(menu.screen(), &Screen::default());
}

#[test]
fn escape_leaves_the_prompt_for_the_menu() {
    init_logging();
    let (prompt, _) = press(AppState::new(1, 4), KeyPress::Enter);
    let (end_prompt, _) = press(prompt.clone(), KeyPress::Enter);

    for state in [prompt, end_prompt] {
        assert!(matches!(state.screen(), Screen::Prompt(_)));
        let (next, effects) = press(state, KeyPress::Esc);
        assert_eq!(next.screen(), &Screen::default());
        assert!(effects.is_empty());
    }
}

#[test]
fn escape_is_ignored_while_running() {
    init_logging();
    let (running, _) = start_run_with_defaults(AppState::new(1, 4));
    let (next, effects) = press(running.clone(), KeyPress::Esc);
    assert_eq!(next.screen(), running.screen());
    assert!(effects.is_empty());
}
