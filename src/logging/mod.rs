// Logging module - subscriber setup and in-memory log capture
//
// The tracker itself only emits `tracing` events. Hosts that have no
// subscriber of their own can call `init`; hosts that want to show tracker
// logs in-app can add a `BufferLayer` to their subscriber and read the
// captured entries back from a `LogBuffer`.

use crate::config::{LogFormat, LoggingConfig};
use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default number of log entries kept in memory
pub const DEFAULT_CAPACITY: usize = 1000;

/// Install a global subscriber for the tracker's logs
///
/// Precedence: RUST_LOG env var > configured level. Fails if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let default_filter = format!("scope_tracker={}", config.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}

/// A single log entry captured from tracing
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// The tracing target (module path)
    pub target: String,
    pub message: String,
    /// Structured fields other than the message, in recording order
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Value of a structured field, if recorded
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            Level::DEBUG => LogLevel::Debug,
            Level::TRACE => LogLevel::Trace,
        }
    }
}

impl LogLevel {
    /// Get the display string for this log level
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// In-memory log buffer with bounded size (ring buffer)
#[derive(Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogBuffer {
    /// Create a new log buffer holding up to [`DEFAULT_CAPACITY`] entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Add a log entry to the buffer
    /// If the buffer is full, removes the oldest entry
    pub fn add(&self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Get all log entries (most recent last)
    pub fn get_all(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Clear all log entries
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracing layer that captures events into a [`LogBuffer`]
pub struct BufferLayer {
    buffer: LogBuffer,
}

impl BufferLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for BufferLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        self.buffer.add(LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::from(metadata.level()),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }

    fn enabled(&self, _metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        // Filtering happens at subscriber level
        true
    }
}

/// Visitor splitting a tracing event into message and fields
#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for EntryVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let formatted = format!("{:?}", value);
        if field.name() == "message" {
            self.message = formatted;
        } else {
            self.fields.push((field.name().to_string(), formatted));
        }
    }
}
