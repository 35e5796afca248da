use std::collections::VecDeque;

pub const LOG_PREVIEW_LIMIT: usize = 5;

/// Events published by a fetch provider while a task is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Progress of the in-flight task only, 0..=100.
    Progress { percent: u8 },
    Log(LogEntry),
}

impl RunEvent {
    pub fn progress(percent: u8) -> Self {
        RunEvent::Progress {
            percent: percent.min(100),
        }
    }

    pub fn debug(label: impl Into<String>, message: impl Into<String>) -> Self {
        RunEvent::Log(LogEntry::new(LogLevel::Debug, label, message))
    }

    pub fn error(label: impl Into<String>, message: impl Into<String>) -> Self {
        RunEvent::Log(LogEntry::new(LogLevel::Error, label, message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub label: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            label: label.into(),
            message: message.into(),
        }
    }
}

/// Fixed-capacity FIFO of the most recent log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogRing {
    fn default() -> Self {
        Self::with_capacity(LOG_PREVIEW_LIMIT)
    }
}

impl LogRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}
