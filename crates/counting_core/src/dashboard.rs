//! Dashboard frame layout: title, status/current block, logs, footer.

use crate::frame::{align_pairs, bordered_table, merge_columns};
use crate::{DashboardView, Footer, Frame, Line, LogLevel, Span, Tone};

pub const PROGRESS_BAR_WIDTH: usize = 21;
const FILLED_GLYPH: char = '█';
const EMPTY_GLYPH: char = '░';
const COLUMN_GAP: usize = 6;

/// `round(width * percent / 100)` filled glyphs followed by empty ones.
///
/// Callers clamp `percent` to `0..=100`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = (width as f64 * (percent / 100.0)).round().max(0.0) as usize;
    let empty = width.saturating_sub(filled);
    format!(
        "{}{}",
        FILLED_GLYPH.to_string().repeat(filled),
        EMPTY_GLYPH.to_string().repeat(empty)
    )
}

/// Share of the queue already finished; `None` for an empty queue.
pub fn aggregate_percent(total: usize, finished: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let remaining = total.saturating_sub(finished);
    Some(100.0 - (remaining as f64 / total as f64) * 100.0)
}

pub fn render(view: &DashboardView) -> Frame {
    let mut cells = vec![vec![Line::styled(view.title.clone(), Tone::Title)]];
    cells.push(merge_columns(
        &[status_column(view), current_column(view)],
        COLUMN_GAP,
    ));
    if let Some(logs) = logs_cell(view) {
        cells.push(logs);
    }
    cells.push(vec![footer_line(view.footer)]);
    bordered_table(&cells, view.max_width)
}

fn status_column(view: &DashboardView) -> Vec<Line> {
    let mut lines = vec![Line::styled("Status", Tone::Heading)];
    lines.extend(align_pairs(
        vec![
            ("Completed:".to_string(), Line::plain(view.completed.to_string())),
            ("Errored:".to_string(), Line::plain(view.errored.to_string())),
            ("Total:".to_string(), Line::plain(view.total.to_string())),
        ],
        1,
    ));
    lines.push(Line::default());
    lines.push(recent_strip(view));
    lines
}

fn recent_strip(view: &DashboardView) -> Line {
    let mut line = Line::plain("Recent: ");
    if view.recent.is_empty() {
        line.push(Span::plain("-"));
    }
    for outcome in &view.recent {
        let tone = if outcome.succeeded {
            Tone::Plain
        } else {
            Tone::Alert
        };
        line.push(Span::new(outcome.id.to_string(), tone));
        line.push(Span::plain(" "));
    }
    line
}

fn current_column(view: &DashboardView) -> Vec<Line> {
    let mut lines = vec![Line::styled("Current", Tone::Heading)];
    let position = match (view.current, view.position) {
        (Some(id), Some(position)) => format!("{id} ({position}/{})", view.total),
        _ => format!("- (0/{})", view.total),
    };
    lines.extend(align_pairs(
        vec![("Scraping".to_string(), Line::plain(position))],
        1,
    ));
    lines.push(Line::default());

    let label = match view.current {
        Some(id) => format!("Scraping {id} ({}%)", view.progress),
        None => format!("Waiting ({}%)", view.progress),
    };
    lines.push(Line::plain(label));
    lines.push(Line::plain(progress_bar(
        f64::from(view.progress),
        PROGRESS_BAR_WIDTH,
    )));

    lines.push(Line::plain(format!("{} left to go.", view.remaining)));
    if let Some(percent) = view.aggregate_percent {
        lines.push(Line::plain(progress_bar(percent, PROGRESS_BAR_WIDTH)));
    }
    lines
}

fn logs_cell(view: &DashboardView) -> Option<Vec<Line>> {
    let path = view.log_path.as_ref()?;
    let mut lines = vec![Line::new(vec![
        Span::new("Logs", Tone::Heading),
        Span::plain(format!(" -> {path}")),
    ])];
    for entry in view.logs.iter().flatten() {
        let tone = match entry.level {
            LogLevel::Error => Tone::Alert,
            LogLevel::Debug => Tone::Plain,
        };
        // Multi-line details are flattened to keep the table rectangular.
        let message = entry.message.lines().collect::<Vec<_>>().join(" ");
        lines.push(Line::styled(
            format!("* ({}) {}", entry.label.to_uppercase(), message),
            tone,
        ));
    }
    Some(lines)
}

fn footer_line(footer: Footer) -> Line {
    match footer {
        Footer::Hint => Line::styled("'q' to stop, 'l' to toggle logs", Tone::Heading),
        Footer::Finished { cancelled: false } => {
            Line::styled("Scraping is finished. Press q to return.", Tone::Success)
        }
        Footer::Finished { cancelled: true } => {
            Line::styled("Scraping was stopped. Press q to return.", Tone::Success)
        }
    }
}
