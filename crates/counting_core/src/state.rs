use crate::TaskId;

pub const QUIT_KEY: char = 'q';
pub const LOG_TOGGLE_KEY: char = 'l';
pub(crate) const MAX_PROMPT_INPUT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuChoice {
    #[default]
    Start,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 2] = [MenuChoice::Start, MenuChoice::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Start => "Start",
            MenuChoice::Exit => "Exit",
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            MenuChoice::Start => MenuChoice::Exit,
            MenuChoice::Exit => MenuChoice::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Start,
    End,
}

impl RangeField {
    pub fn label(self) -> &'static str {
        match self {
            RangeField::Start => "Start from: ",
            RangeField::End => "End at:     ",
        }
    }
}

/// Numeric prompt collecting the start/end of the range to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePrompt {
    pub field: RangeField,
    pub input: String,
    /// Accepted start value, set once the first field was submitted.
    pub start: Option<TaskId>,
    /// Last submission was rejected.
    pub invalid: bool,
}

impl RangePrompt {
    pub(crate) fn new(field: RangeField, default: TaskId, start: Option<TaskId>) -> Self {
        Self {
            field,
            input: default.to_string(),
            start,
            invalid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: MenuChoice },
    Prompt(RangePrompt),
    Running { cancel_requested: bool },
    Finished { cancelled: bool },
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Menu {
            selected: MenuChoice::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) screen: Screen,
    pub(crate) first_id: TaskId,
    pub(crate) last_id: TaskId,
    dirty: bool,
}

impl AppState {
    /// `first_id`/`last_id` are the prompt defaults.
    pub fn new(first_id: TaskId, last_id: TaskId) -> Self {
        Self {
            screen: Screen::default(),
            first_id,
            last_id,
            dirty: true,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn first_id(&self) -> TaskId {
        self.first_id
    }

    pub fn last_id(&self) -> TaskId {
        self.last_id
    }

    pub fn is_running(&self) -> bool {
        matches!(self.screen, Screen::Running { .. })
    }

    pub(crate) fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
