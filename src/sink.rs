//! Log sinks and structured log entries.
//!
//! Every instrumentation point emits a [`LogEntry`] — a timestamped message
//! with the values that flowed through the wrapper — into an injected
//! [`LogSink`]. The default sink writes through `tracing`; [`CapturingSink`]
//! collects entries in memory for tests and programmatic inspection.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An injected logging function. Assumed append-only and safe to call with
/// interleaved invocations from concurrent in-flight operations.
pub type LogSink = Arc<dyn Fn(LogEntry) + Send + Sync>;

/// A timestamped record of one instrumentation point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix epoch timestamp in milliseconds when this entry was emitted.
    pub timestamp: u128,
    /// The descriptive message, prefixed with the wrapped function name.
    pub message: String,
    /// The values that flowed through the wrapper, in order.
    pub values: Vec<Value>,
}

impl LogEntry {
    /// Create a new entry stamped with the current time.
    #[must_use]
    pub fn new(message: impl Into<String>, values: Vec<Value>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis();
        Self {
            timestamp,
            message: message.into(),
            values,
        }
    }
}

/// The default sink: a console-style writer over `tracing`.
///
/// Used when no sink is supplied at construction time.
#[must_use]
pub fn console() -> LogSink {
    Arc::new(|entry: LogEntry| {
        let rendered = entry
            .values
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!(target: "visible_async", "{} {}", entry.message, rendered);
    })
}

/// A sink that records every entry in memory.
///
/// Cloneable and thread-safe; all clones share the same buffer.
///
/// # Example
///
/// ```rust
/// use visible_async::sink::{CapturingSink, LogEntry};
///
/// let capture = CapturingSink::new();
/// let sink = capture.sink();
/// sink(LogEntry::new("map: Limit provided:", vec![serde_json::json!(3)]));
///
/// let entries = capture.snapshot();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].message, "map: Limit provided:");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapturingSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CapturingSink {
    /// Create a new, empty capturing sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`LogSink`] handle that appends into this capture buffer.
    #[must_use]
    pub fn sink(&self) -> LogSink {
        let entries = Arc::clone(&self.entries);
        Arc::new(move |entry| entries.lock().unwrap().push(entry))
    }

    /// Get a snapshot of all entries recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// The messages of all recorded entries, in emission order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    /// Number of entries recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Clear all recorded entries.
    ///
    /// Useful when reusing one capture buffer across several wrapped calls.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
