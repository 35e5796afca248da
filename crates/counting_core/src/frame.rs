//! Backend-neutral styled text: the dashboard and shell screens are built as
//! [`Frame`]s and the terminal layer only maps [`Tone`]s to colors.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Plain,
    /// Screen title.
    Title,
    /// Column headings and hints.
    Heading,
    /// Errors and failed tasks.
    Alert,
    /// Completion banner.
    Success,
    /// Highlighted menu entry.
    Selected,
    /// Table borders.
    Border,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }

    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Span::plain(text)])
    }

    pub fn styled(text: impl Into<String>, tone: Tone) -> Self {
        Self::new(vec![Span::new(text, tone)])
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Cuts the line to at most `width` columns, marking the cut with `…`.
    pub fn truncate(mut self, width: usize) -> Self {
        if self.width() <= width {
            return self;
        }
        let mut budget = width.saturating_sub(1);
        let mut kept = Vec::with_capacity(self.spans.len());
        let mut last_tone = Tone::Plain;
        for span in self.spans.drain(..) {
            if budget == 0 {
                break;
            }
            last_tone = span.tone;
            let take = span.width().min(budget);
            budget -= take;
            kept.push(Span::new(span.text.chars().take(take).collect::<String>(), span.tone));
        }
        if width > 0 {
            kept.push(Span::new(ELLIPSIS.to_string(), last_tone));
        }
        self.spans = kept;
        self
    }

    pub(crate) fn pad_to(mut self, width: usize) -> Self {
        let missing = width.saturating_sub(self.width());
        if missing > 0 {
            self.push(Span::plain(" ".repeat(missing)));
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Plain text of every line, mostly for tests and log output.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.text().contains(needle))
    }
}

const TOP_LEFT: char = '╭';
const TOP_RIGHT: char = '╮';
const BOTTOM_LEFT: char = '╰';
const BOTTOM_RIGHT: char = '╯';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TEE_LEFT: char = '├';
const TEE_RIGHT: char = '┤';
const ELLIPSIS: char = '…';
/// Columns taken by the border and padding around the inner width.
pub(crate) const TABLE_CHROME: usize = 4;

/// Draws a single-column bordered table, one cell per block of lines.
///
/// With `max_width` set, the whole table fits in that many columns and
/// longer lines are truncated.
pub(crate) fn bordered_table(cells: &[Vec<Line>], max_width: Option<usize>) -> Frame {
    let widest = cells
        .iter()
        .flatten()
        .map(Line::width)
        .max()
        .unwrap_or(0);
    let inner = match max_width {
        Some(limit) => widest.min(limit.saturating_sub(TABLE_CHROME)),
        None => widest,
    };
    let rule = HORIZONTAL.to_string().repeat(inner + 2);

    let mut frame = Frame::default();
    frame.push(Line::styled(
        format!("{TOP_LEFT}{rule}{TOP_RIGHT}"),
        Tone::Border,
    ));
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            frame.push(Line::styled(
                format!("{TEE_LEFT}{rule}{TEE_RIGHT}"),
                Tone::Border,
            ));
        }
        for line in cell {
            let mut row = Line::styled(format!("{VERTICAL} "), Tone::Border);
            row.spans.extend(line.clone().truncate(inner).pad_to(inner).spans);
            row.push(Span::new(format!(" {VERTICAL}"), Tone::Border));
            frame.push(row);
        }
    }
    frame.push(Line::styled(
        format!("{BOTTOM_LEFT}{rule}{BOTTOM_RIGHT}"),
        Tone::Border,
    ));
    frame
}

/// Aligns `label value` pairs so every value starts in the same column.
pub(crate) fn align_pairs(pairs: Vec<(String, Line)>, gap: usize) -> Vec<Line> {
    let longest = pairs
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    pairs
        .into_iter()
        .map(|(label, value)| {
            let spacing = longest - label.chars().count() + gap;
            let mut line = Line::plain(format!("{label}{}", " ".repeat(spacing)));
            line.spans.extend(value.spans);
            line
        })
        .collect()
}

/// Lays columns side by side; shorter columns are padded with blank cells.
pub(crate) fn merge_columns(columns: &[Vec<Line>], gap: usize) -> Vec<Line> {
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| column.iter().map(Line::width).max().unwrap_or(0))
        .collect();
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

    (0..rows)
        .map(|row| {
            let mut merged = Line::default();
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    merged.push(Span::plain(" ".repeat(gap)));
                }
                let cell = column.get(row).cloned().unwrap_or_default();
                let cell = if index + 1 < columns.len() {
                    cell.pad_to(widths[index])
                } else {
                    cell
                };
                merged.spans.extend(cell.spans);
            }
            merged
        })
        .collect()
}
