use serde::{Deserialize, Serialize};

pub type TaskId = u64;

/// One fetch-and-extract unit of work. The value a task must resolve to is
/// its own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub url: String,
    pub extract: ExtractSpec,
}

impl Task {
    pub fn new(id: TaskId, url: impl Into<String>, extract: ExtractSpec) -> Self {
        Self {
            id,
            url: url.into(),
            extract,
        }
    }

    pub fn expected_value(&self) -> TaskId {
        self.id
    }
}

/// Recipe for pulling a single value out of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractSpec {
    /// CSS selector matched against the whole document.
    pub selector: String,
    /// Which match to use when the selector hits several elements.
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub source: ValueSource,
    #[serde(default)]
    pub reduce: Reduce,
}

impl ExtractSpec {
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            index: 0,
            source: ValueSource::Text,
            reduce: Reduce::Whole,
        }
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.source = ValueSource::Attribute(name.into());
        self
    }

    pub fn reduce(mut self, reduce: Reduce) -> Self {
        self.reduce = reduce;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueSource {
    /// Concatenated text content of the element.
    #[default]
    Text,
    /// Value of a named attribute.
    Attribute(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reduce {
    /// Use the trimmed value as-is.
    #[default]
    Whole,
    /// Single character at a char position, counted after whitespace runs
    /// in element text are collapsed.
    CharAt(usize),
    /// Number of characters in the trimmed value.
    Length,
    /// Number of space separated words in the value.
    WordCount,
}

/// Lowest and highest id in a definition set, used as prompt defaults.
pub fn id_bounds(tasks: &[Task]) -> Option<(TaskId, TaskId)> {
    let first = tasks.iter().map(|task| task.id).min()?;
    let last = tasks.iter().map(|task| task.id).max()?;
    Some((first, last))
}

/// Keeps the tasks whose id lies in `start..=end`, preserving definition order.
pub fn trim_range(tasks: &[Task], start: TaskId, end: TaskId) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| (start..=end).contains(&task.id))
        .cloned()
        .collect()
}
