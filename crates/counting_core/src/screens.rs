use crate::{AppState, Frame, Line, MenuChoice, RangeField, Screen, Span, Tone};

/// Frame for the menu and prompt screens. The dashboard draws the others.
pub fn render_screen(state: &AppState, title: &str) -> Option<Frame> {
    let mut frame = Frame::default();
    frame.push(Line::styled(title, Tone::Title));

    match state.screen() {
        Screen::Menu { selected } => {
            let mut line = Line::default();
            for choice in MenuChoice::ALL {
                let tone = if choice == *selected {
                    Tone::Selected
                } else {
                    Tone::Plain
                };
                line.push(Span::new(format!(" {} ", choice.label()), tone));
                line.push(Span::plain(" "));
            }
            frame.push(line);
            frame.push(Line::default());
            frame.push(Line::styled(
                "Left/Right to choose, Enter to confirm",
                Tone::Heading,
            ));
        }
        Screen::Prompt(prompt) => {
            if let (RangeField::End, Some(start)) = (prompt.field, prompt.start) {
                frame.push(Line::plain(format!(
                    "{}{start}",
                    RangeField::Start.label()
                )));
            }
            if prompt.invalid {
                frame.push(Line::styled("Invalid Number", Tone::Alert));
            }
            frame.push(Line::plain(format!("{}{}_", prompt.field.label(), prompt.input)));
        }
        Screen::Running { .. } | Screen::Finished { .. } => return None,
    }

    Some(frame)
}
