//! Bounded console log
//!
//! FIFO ring of the most recent entries. Appends happen under one lock, so
//! readers never observe more than `capacity` entries or a half-applied
//! eviction.

use crate::protocol::ConsoleLevel;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 200;

/// Console log configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum retained entries
    pub capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// One console line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLogEntry {
    /// Unique entry id
    pub id: Uuid,
    /// Severity
    pub level: ConsoleLevel,
    /// Text
    pub message: String,
}

impl ConsoleLogEntry {
    /// Create entry with a fresh id
    #[must_use]
    pub fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        }
    }

    /// `[level] message`
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("[{}] {}", self.level, self.message)
    }
}

/// Bounded FIFO console log
#[derive(Debug)]
pub struct ConsoleLog {
    capacity: usize,
    inner: Mutex<VecDeque<ConsoleLogEntry>>,
}

impl ConsoleLog {
    /// Create log retaining at most `capacity` entries (at least one)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Create log from configuration
    #[must_use]
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Retention limit
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, returning the evicted one when full
    pub fn append(&self, entry: ConsoleLogEntry) -> Option<ConsoleLogEntry> {
        let mut guard = self.inner.lock();
        let evicted = if guard.len() == self.capacity {
            guard.pop_front()
        } else {
            None
        };
        guard.push_back(entry);
        evicted
    }

    /// Append a new line and return its id
    pub fn push(&self, level: ConsoleLevel, message: impl Into<String>) -> Uuid {
        let entry = ConsoleLogEntry::new(level, message);
        let id = entry.id;
        self.append(entry);
        id
    }

    /// Snapshot of all entries, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<ConsoleLogEntry> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Snapshot filtered by level; `None` keeps everything
    #[must_use]
    pub fn filtered(&self, level: Option<ConsoleLevel>) -> Vec<ConsoleLogEntry> {
        self.inner
            .lock()
            .iter()
            .filter(|entry| level.map_or(true, |wanted| entry.level == wanted))
            .cloned()
            .collect()
    }

    /// Entry count
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Plain-text export, one `[level] message` line per entry
    #[must_use]
    pub fn export_text(&self, level: Option<ConsoleLevel>) -> String {
        self.filtered(level)
            .iter()
            .map(ConsoleLogEntry::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let log = ConsoleLog::new(2);
        log.push(ConsoleLevel::Log, "one");
        log.push(ConsoleLevel::Log, "two");
        let evicted = log.append(ConsoleLogEntry::new(ConsoleLevel::Warn, "three"));
        assert_eq!(evicted.map(|e| e.message), Some("one".to_string()));
        let messages: Vec<_> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn export_uses_bracketed_levels() {
        let log = ConsoleLog::default();
        log.push(ConsoleLevel::Log, "hi");
        log.push(ConsoleLevel::Error, "boom");
        assert_eq!(log.export_text(None), "[log] hi\n[error] boom");
        assert_eq!(log.export_text(Some(ConsoleLevel::Error)), "[error] boom");
        assert_eq!(log.export_text(Some(ConsoleLevel::Warn)), "");
    }

    #[test]
    fn ids_are_unique() {
        let log = ConsoleLog::default();
        let first = log.push(ConsoleLevel::Info, "a");
        let second = log.push(ConsoleLevel::Info, "a");
        assert_ne!(first, second);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let log = ConsoleLog::new(0);
        log.push(ConsoleLevel::Log, "a");
        log.push(ConsoleLevel::Log, "b");
        assert_eq!(log.len(), 1);
    }
}
