//! Observability sink for pipeline components.
//!
//! The transform engine and the chain builder never log through global state.
//! They receive a `&dyn DiagnosticSink` and report degraded behavior (an
//! unrecognized option, a truncated chain) to it. Two sinks are provided:
//!
//! - [`TracingSink`] forwards every diagnostic to `tracing`.
//! - [`DiagnosticLog`] keeps the most recent entries in memory (and also
//!   forwards to `tracing`), so callers and tests can inspect what happened.

use crate::pipeline::NodeKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default number of entries kept by a [`DiagnosticLog`].
pub const DEFAULT_DIAGNOSTIC_CAPACITY: usize = 1000;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// A single structured observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    /// Node kind the diagnostic concerns, if any.
    pub kind: Option<NodeKind>,
    /// Structured key/value detail (option names, offending values, ids).
    pub details: Vec<(String, String)>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            kind: None,
            details: Vec::new(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Level::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn for_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.details.push((key.into(), value.to_string()));
        self
    }

    /// Look up a detail value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn emit_tracing(&self) {
        let kind = self.kind.map(|k| k.wire_name()).unwrap_or("-");
        let details = self
            .details
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        match self.level {
            Level::Info => tracing::info!(kind, %details, "{}", self.message),
            Level::Warn => tracing::warn!(kind, %details, "{}", self.message),
            Level::Error => tracing::error!(kind, %details, "{}", self.message),
        }
    }
}

/// Destination for diagnostics raised by pipeline components.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Sink that forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        diagnostic.emit_tracing();
    }
}

/// A recorded diagnostic with the time it was observed.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub diagnostic: Diagnostic,
}

/// Bounded in-memory diagnostic log. Oldest entries are evicted first.
#[derive(Debug)]
pub struct DiagnosticLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DIAGNOSTIC_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_DIAGNOSTIC_CAPACITY))),
            capacity: capacity.max(1),
        }
    }

    /// Snapshot of all retained entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Retained diagnostics at or above `level`.
    pub fn at_least(&self, level: Level) -> Vec<Diagnostic> {
        self.entries()
            .into_iter()
            .map(|e| e.diagnostic)
            .filter(|d| d.level >= level)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn record(&self, diagnostic: Diagnostic) {
        diagnostic.emit_tracing();
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= self.capacity {
                entries.pop_front();
            }
            entries.push_back(LogEntry {
                timestamp: Utc::now(),
                diagnostic,
            });
        }
    }
}
