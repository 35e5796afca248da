//! Raw-mode terminal ownership and frame drawing.

use std::io::{self, Write};

use counting_core::{Frame, Tone};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

/// Holds raw mode and the alternate screen until dropped.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        install_panic_hook();
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

fn restore() {
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// A panic message printed inside the alternate screen would be lost.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        previous(info);
    }));
}

/// Current terminal width in columns.
pub fn columns() -> Option<usize> {
    terminal::size().ok().map(|(cols, _)| usize::from(cols))
}

/// Clears the screen and draws `frame` from the top-left corner. Lines wider
/// than the terminal are cut so they never wrap into the next row.
pub fn draw(frame: &Frame) -> io::Result<()> {
    let width = columns();
    let mut stdout = io::stdout();
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in frame.lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        let line = match width {
            Some(width) => line.clone().truncate(width),
            None => line.clone(),
        };
        queue!(stdout, MoveTo(0, row))?;
        for span in &line.spans {
            match tone_color(span.tone) {
                Some(color) => queue!(stdout, SetForegroundColor(color))?,
                None => queue!(stdout, SetAttribute(Attribute::Reset))?,
            }
            if span.tone == Tone::Title || span.tone == Tone::Selected {
                queue!(stdout, SetAttribute(Attribute::Bold))?;
            }
            if span.tone == Tone::Selected {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(stdout, Print(&span.text), SetAttribute(Attribute::Reset))?;
        }
    }
    stdout.flush()
}

fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain => None,
        Tone::Title => Some(Color::Cyan),
        Tone::Heading => Some(Color::Yellow),
        Tone::Alert => Some(Color::Red),
        Tone::Success => Some(Color::Green),
        Tone::Selected => Some(Color::White),
        Tone::Border => Some(Color::DarkGrey),
    }
}
