//! Log Sink
//!
//! Timestamped, leveled message recorder with a bounded in-memory history.
//! Every component records diagnostics here; console mirroring goes through
//! `tracing` so a subscriber installed by the binary controls formatting
//! and filtering. Debug and info entries are mirrored only in development
//! mode; warnings and errors always are.
//!
//! The history is FIFO-bounded: once at capacity, the oldest entry is
//! evicted on each append.

use std::collections::VecDeque;
use std::error::Error;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Default history capacity.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Severity of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostics; console-mirrored only in development mode.
    Debug,
    /// Informational; console-mirrored only in development mode.
    Info,
    /// Something degraded to a no-op.
    Warn,
    /// A component failed.
    Error,
}

/// One recorded message.
#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    /// Wall-clock time of the record call.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message.
    pub message: String,
    /// Optional structured payload.
    pub data: Option<serde_json::Value>,
}

/// Bounded, shareable log recorder.
pub struct LogSink {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    dev_mode: bool,
}

impl LogSink {
    /// Create a sink retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize, dev_mode: bool) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            capacity: capacity.max(1),
            dev_mode,
        }
    }

    /// Record a debug entry.
    pub fn debug(&self, message: &str) {
        if self.dev_mode {
            tracing::debug!("{message}");
        }
        self.record(LogLevel::Debug, message, None);
    }

    /// Record an info entry.
    pub fn info(&self, message: &str) {
        if self.dev_mode {
            tracing::info!("{message}");
        }
        self.record(LogLevel::Info, message, None);
    }

    /// Record a warning.
    pub fn warn(&self, message: &str) {
        tracing::warn!("{message}");
        self.record(LogLevel::Warn, message, None);
    }

    /// Record an error without a payload.
    pub fn error(&self, message: &str) {
        tracing::error!("{message}");
        self.record(LogLevel::Error, message, None);
    }

    /// Record an error with an arbitrary structured payload.
    pub fn error_with(&self, message: &str, data: serde_json::Value) {
        tracing::error!(?data, "{message}");
        self.record(LogLevel::Error, message, Some(data));
    }

    /// Record an error, normalizing `source` (message plus cause chain)
    /// into the entry's data field.
    pub fn error_with_source(&self, message: &str, source: &dyn Error) {
        let mut chain = Vec::new();
        let mut current: Option<&dyn Error> = Some(source);
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        self.error_with(
            message,
            serde_json::json!({ "error": chain[0], "chain": chain }),
        );
    }

    fn record(&self, level: LogLevel, message: &str, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            data,
        };
        let mut entries = self.entries.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Defensive copy of the retained history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Retained entries at exactly `level`, oldest first.
    #[must_use]
    pub fn by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// History capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether development-mode mirroring is on.
    #[must_use]
    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Discard the retained history.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
