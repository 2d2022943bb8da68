//! Timestamped pipeline logging.
//!
//! A [`Logger`] is created once by the entry point and cloned into each
//! stage. Clones share the same sink. Entries are written to stderr as text
//! or JSON lines, or kept in memory so tests can inspect them.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// A single log entry
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

/// Line format used when writing to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// `2024-05-01 09:30:00,123 - INFO - message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

impl LogFormat {
    /// Render an entry as one line, without trailing newline.
    pub fn render(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Text => format!(
                "{} - {} - {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S,%3f"),
                entry.level,
                entry.message
            ),
            LogFormat::Json => serde_json::to_string(entry)
                .unwrap_or_else(|_| format!("{{\"level\":\"{}\"}}", entry.level)),
        }
    }
}

#[derive(Debug)]
enum Sink {
    Stderr,
    Memory(Mutex<Vec<LogEntry>>),
}

/// Shared handle to one log sink.
#[derive(Debug, Clone)]
pub struct Logger {
    format: LogFormat,
    sink: Arc<Sink>,
}

impl Logger {
    /// Logger writing rendered lines to stderr.
    pub fn stderr(format: LogFormat) -> Self {
        Self {
            format,
            sink: Arc::new(Sink::Stderr),
        }
    }

    /// Logger keeping entries in memory; read them back with [`Logger::entries`].
    pub fn memory() -> Self {
        Self {
            format: LogFormat::Text,
            sink: Arc::new(Sink::Memory(Mutex::new(Vec::new()))),
        }
    }

    pub fn log(&self, entry: LogEntry) {
        match self.sink.as_ref() {
            Sink::Stderr => eprintln!("{}", self.format.render(&entry)),
            Sink::Memory(entries) => {
                entries
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(entry);
            }
        }
    }

    pub fn info(&self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn warning(&self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.log(LogEntry::error(msg));
    }

    /// Entries recorded so far. Always empty for the stderr sink.
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.sink.as_ref() {
            Sink::Stderr => Vec::new(),
            Sink::Memory(entries) => entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }

    /// Whether any recorded entry at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }
}
