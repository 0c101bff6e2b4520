use std::collections::VecDeque;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::console::render_value;

/// Source and severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Info,
    Warn,
    Error,
    Server,
    Client,
}

impl Category {
    /// Prefix used when mirroring entries to the process log.
    pub fn prefix(self) -> &'static str {
        match self {
            Category::Info => "INFO",
            Category::Warn => "WARN",
            Category::Error => "ERROR",
            Category::Server => "SERVER",
            Category::Client => "CLIENT",
        }
    }

    fn level(self) -> log::Level {
        match self {
            Category::Warn => log::Level::Warn,
            Category::Error => log::Level::Error,
            Category::Info | Category::Server | Category::Client => log::Level::Info,
        }
    }
}

/// ISO-8601 UTC with milliseconds, e.g. `2026-10-16T08:30:00.123Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One line of the event display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub category: Category,
    pub content: String,
}

impl LogEntry {
    pub fn new(category: Category, content: impl Into<String>) -> Self {
        Self {
            timestamp: iso_timestamp(Utc::now()),
            category,
            content: content.into(),
        }
    }
}

/// Pending change for the view, applied in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogChange {
    Prepend(LogEntry),
    Clear,
}

/// Append-only event log, newest entry first.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    changes: Vec<LogChange>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, category: Category, text: &str) {
        self.push(LogEntry::new(category, text));
    }

    pub fn push_value(&mut self, category: Category, value: &Value) {
        self.push(LogEntry::new(category, render_value(value)));
    }

    fn push(&mut self, entry: LogEntry) {
        log::log!(
            entry.category.level(),
            "{} {}",
            entry.category.prefix(),
            entry.content
        );
        self.entries.push_front(entry.clone());
        self.changes.push(LogChange::Prepend(entry));
    }

    /// Drop every entry. Prepends the view has not seen yet are dropped too.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.changes.clear();
        self.changes.push(LogChange::Clear);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn drain_changes(&mut self) -> Vec<LogChange> {
        std::mem::take(&mut self.changes)
    }
}
