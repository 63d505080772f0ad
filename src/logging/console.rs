//! Console sinks
//!
//! The logger hands display strings (color markup included) to a
//! `ConsoleSink`. The host decides whether to render or drop the markup.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::format::{strip_tags, Severity};

/// Where display strings go
pub trait ConsoleSink: Send + Sync {
    fn info(&self, text: &str);
    fn warning(&self, text: &str);
    fn error(&self, text: &str);

    /// Dispatch on severity
    fn emit(&self, severity: Severity, text: &str) {
        match severity {
            Severity::Info => self.info(text),
            Severity::Warning => self.warning(text),
            Severity::Error => self.error(text),
        }
    }
}

impl<T> ConsoleSink for Arc<T>
where
    T: ConsoleSink + ?Sized,
{
    fn info(&self, text: &str) {
        (**self).info(text)
    }

    fn warning(&self, text: &str) {
        (**self).warning(text)
    }

    fn error(&self, text: &str) {
        (**self).error(text)
    }
}

/// Forwards display strings to `tracing`, markup removed
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn info(&self, text: &str) {
        tracing::info!("{}", strip_tags(text));
    }

    fn warning(&self, text: &str) {
        tracing::warn!("{}", strip_tags(text));
    }

    fn error(&self, text: &str) {
        tracing::error!("{}", strip_tags(text));
    }
}

/// A display string captured by `BufferedConsole`
#[derive(Debug, Clone)]
pub struct ConsoleEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    /// Display text, markup included
    pub text: String,
}

/// Thread-safe ring buffer of console output, for in-app log views
#[derive(Debug)]
pub struct BufferedConsole {
    entries: RwLock<VecDeque<ConsoleEntry>>,
    max_entries: usize,
}

impl BufferedConsole {
    /// Create a buffer keeping at most `max_entries` entries
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries.min(1024))),
            max_entries,
        }
    }

    fn push(&self, severity: Severity, text: &str) {
        if self.max_entries == 0 {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(ConsoleEntry {
                timestamp: Utc::now(),
                severity,
                text: text.to_string(),
            });
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries
            .read()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Entries of one severity, oldest first
    pub fn entries_with(&self, severity: Severity) -> Vec<ConsoleEntry> {
        self.entries
            .read()
            .map(|e| e.iter().filter(|entry| entry.severity == severity).cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl Default for BufferedConsole {
    fn default() -> Self {
        Self::new(1_000)
    }
}

impl ConsoleSink for BufferedConsole {
    fn info(&self, text: &str) {
        self.push(Severity::Info, text);
    }

    fn warning(&self, text: &str) {
        self.push(Severity::Warning, text);
    }

    fn error(&self, text: &str) {
        self.push(Severity::Error, text);
    }
}
