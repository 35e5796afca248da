use crate::state::MAX_PROMPT_INPUT;
use crate::{
    AppState, Effect, KeyPress, MenuChoice, Msg, RangeField, RangePrompt, Screen, TaskId,
    LOG_TOGGLE_KEY, QUIT_KEY,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        // The interrupt key bypasses every screen.
        Msg::Key(KeyPress::Interrupt) => vec![Effect::Terminate],
        Msg::Key(key) => match state.screen.clone() {
            Screen::Menu { selected } => menu_key(&mut state, selected, key),
            Screen::Prompt(prompt) => prompt_key(&mut state, prompt, key),
            Screen::Running { cancel_requested } => running_key(&mut state, cancel_requested, key),
            Screen::Finished { .. } => finished_key(&mut state, key),
        },
        Msg::RunFinished { cancelled } => {
            if state.is_running() {
                state.set_screen(Screen::Finished { cancelled });
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn menu_key(state: &mut AppState, selected: MenuChoice, key: KeyPress) -> Vec<Effect> {
    match key {
        KeyPress::Left | KeyPress::Right | KeyPress::Tab => {
            state.set_screen(Screen::Menu {
                selected: selected.next(),
            });
            Vec::new()
        }
        KeyPress::Enter => match selected {
            MenuChoice::Start => {
                let first = state.first_id;
                state.set_screen(Screen::Prompt(RangePrompt::new(RangeField::Start, first, None)));
                Vec::new()
            }
            MenuChoice::Exit => vec![Effect::Exit],
        },
        _ => Vec::new(),
    }
}

fn prompt_key(state: &mut AppState, mut prompt: RangePrompt, key: KeyPress) -> Vec<Effect> {
    match key {
        KeyPress::Char(ch) if !ch.is_control() => {
            if prompt.input.chars().count() >= MAX_PROMPT_INPUT {
                return Vec::new();
            }
            prompt.input.push(ch);
            state.set_screen(Screen::Prompt(prompt));
            Vec::new()
        }
        KeyPress::Backspace => {
            if prompt.input.pop().is_some() {
                state.set_screen(Screen::Prompt(prompt));
            }
            Vec::new()
        }
        KeyPress::Enter => submit_prompt(state, prompt),
        KeyPress::Esc => {
            state.set_screen(Screen::default());
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn submit_prompt(state: &mut AppState, prompt: RangePrompt) -> Vec<Effect> {
    let default = match prompt.field {
        RangeField::Start => state.first_id,
        RangeField::End => state.last_id,
    };

    let trimmed = prompt.input.trim();
    if trimmed.is_empty() {
        // Empty input re-asks with the default filled back in.
        let retry = RangePrompt::new(prompt.field, default, prompt.start);
        state.set_screen(Screen::Prompt(retry));
        return Vec::new();
    }

    let Some(value) = parse_range_value(trimmed) else {
        let mut retry = RangePrompt::new(prompt.field, default, prompt.start);
        retry.invalid = true;
        state.set_screen(Screen::Prompt(retry));
        return Vec::new();
    };

    match (prompt.field, prompt.start) {
        (RangeField::Start, _) => {
            let last = state.last_id;
            state.set_screen(Screen::Prompt(RangePrompt::new(
                RangeField::End,
                last,
                Some(value),
            )));
            Vec::new()
        }
        (RangeField::End, Some(start)) => {
            state.set_screen(Screen::Running {
                cancel_requested: false,
            });
            vec![Effect::StartRun { start, end: value }]
        }
        (RangeField::End, None) => {
            // Unreachable through the prompt flow; restart from the first field.
            let first = state.first_id;
            state.set_screen(Screen::Prompt(RangePrompt::new(RangeField::Start, first, None)));
            Vec::new()
        }
    }
}

/// Positive integers only; zero is rejected like any other non-number.
fn parse_range_value(input: &str) -> Option<TaskId> {
    input.parse::<TaskId>().ok().filter(|value| *value > 0)
}

fn running_key(state: &mut AppState, cancel_requested: bool, key: KeyPress) -> Vec<Effect> {
    match key {
        KeyPress::Char(QUIT_KEY) if !cancel_requested => {
            state.set_screen(Screen::Running {
                cancel_requested: true,
            });
            vec![Effect::CancelRun]
        }
        KeyPress::Char(LOG_TOGGLE_KEY) => vec![Effect::ToggleLogPreview],
        _ => Vec::new(),
    }
}

/// Once the run is over only the quit key is accepted.
fn finished_key(state: &mut AppState, key: KeyPress) -> Vec<Effect> {
    if key == KeyPress::Char(QUIT_KEY) {
        state.set_screen(Screen::default());
    }
    Vec::new()
}
