#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A key press forwarded by the input listener.
    Key(KeyPress),
    /// The runner returned; `cancelled` is true when the queue was cut short.
    RunFinished { cancelled: bool },
}

/// Terminal keys the shell reacts to, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    Enter,
    Backspace,
    Left,
    Right,
    Tab,
    /// Backs out of the range prompt.
    Esc,
    /// Ctrl-C.
    Interrupt,
}
