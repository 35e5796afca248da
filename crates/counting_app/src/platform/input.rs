//! Keyboard listener thread.

use std::thread;

use counting_core::KeyPress;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use engine_logging::{engine_debug, engine_warn};
use tokio::sync::mpsc;

/// Spawns the one listener for the process. It only forwards keys; the
/// shell loop decides what they mean.
pub fn spawn_listener() -> mpsc::UnboundedReceiver<KeyPress> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("input-listener".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(press) = map_key(key) {
                        if tx.send(press).is_err() {
                            engine_debug!("Input listener stopped: shell loop is gone");
                            break;
                        }
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    engine_warn!("Input listener stopped: {}", err);
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        engine_warn!("Could not spawn input listener: {}", err);
    }
    rx
}

fn map_key(key: KeyEvent) -> Option<KeyPress> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyPress::Interrupt),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(ch) => Some(KeyPress::Char(ch)),
        KeyCode::Enter => Some(KeyPress::Enter),
        KeyCode::Backspace => Some(KeyPress::Backspace),
        KeyCode::Left => Some(KeyPress::Left),
        KeyCode::Right => Some(KeyPress::Right),
        KeyCode::Tab => Some(KeyPress::Tab),
        KeyCode::Esc => Some(KeyPress::Esc),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyPress::Interrupt)
        );
        assert_eq!(map_key(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn plain_keys_pass_through() {
        assert_eq!(
            map_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(KeyPress::Char('q'))
        );
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyPress::Enter)
        );
        assert_eq!(map_key(key(KeyCode::F(1), KeyModifiers::NONE)), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut release = key(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }
}
