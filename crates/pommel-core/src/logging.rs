//! Logging: tracing subscriber setup and the in-memory action log.
//!
//! Diagnostics go to stderr (and optionally a per-day file) through
//! `tracing`. Test actions additionally land in an [`ActionLog`], a shared
//! in-memory buffer that assertions and reports can inspect after the fact.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Verbosity maps `-v` counts to a default filter; `RUST_LOG` overrides it
/// when set. When `logs_dir` is given, records are also appended to
/// `pommel-YYYYMMDD.log` inside it. The file is bound to the day the process
/// started; runs crossing midnight keep writing to the same file.
pub fn init_logging(verbosity: u8, logs_dir: Option<&Path>) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer);

    match logs_dir.and_then(open_daily_log) {
        Some(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            let _ = registry.with(file_layer).try_init();
        }
        None => {
            let _ = registry.try_init();
        }
    }
}

/// Open (or create) today's log file under `dir`. Failure to create the
/// directory or file disables file logging for the run rather than aborting
/// it.
fn open_daily_log(dir: &Path) -> Option<File> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("warning: cannot create log directory {}: {err}", dir.display());
        return None;
    }
    let path = dir.join(format!("pommel-{}.log", Local::now().format("%Y%m%d")));
    match OpenOptions::new().append(true).create(true).open(&path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("warning: cannot open log file {}: {err}", path.display());
            None
        }
    }
}

/// Severity of an [`LogRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One logged action. `source` names the page or workflow that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub source: String,
    pub message: String,
}

/// Shared, append-only buffer of action records.
///
/// Clones share the underlying buffer, so the session, its pages and the
/// report all observe the same history. Every record is mirrored to the
/// tracing subscriber as it is appended.
#[derive(Clone, Default)]
pub struct ActionLog {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, level: LogLevel, source: &str, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Debug => tracing::debug!(target = "pommel", source, "{message}"),
            LogLevel::Info => tracing::info!(target = "pommel", source, "{message}"),
            LogLevel::Warn => tracing::warn!(target = "pommel", source, "{message}"),
            LogLevel::Error => tracing::error!(target = "pommel", source, "{message}"),
        }
        self.records.lock().unwrap().push(LogRecord {
            timestamp: Utc::now(),
            level,
            source: source.to_string(),
            message,
        });
    }

    pub fn debug(&self, source: &str, message: impl Into<String>) {
        self.record(LogLevel::Debug, source, message);
    }

    pub fn info(&self, source: &str, message: impl Into<String>) {
        self.record(LogLevel::Info, source, message);
    }

    pub fn warn(&self, source: &str, message: impl Into<String>) {
        self.record(LogLevel::Warn, source, message);
    }

    pub fn error(&self, source: &str, message: impl Into<String>) {
        self.record(LogLevel::Error, source, message);
    }

    /// Mark a workflow step boundary.
    pub fn step(&self, source: &str, description: &str) {
        self.record(LogLevel::Info, source, format!("STEP: {description}"));
    }

    /// Record an assertion verdict. Failures log at error level.
    pub fn assertion(&self, source: &str, description: &str, passed: bool) {
        if passed {
            self.record(
                LogLevel::Info,
                source,
                format!("ASSERTION [PASSED]: {description}"),
            );
        } else {
            self.record(
                LogLevel::Error,
                source,
                format!("ASSERTION [FAILED]: {description}"),
            );
        }
    }

    /// Snapshot of all records so far, in append order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records produced by one source.
    pub fn records_from(&self, source: &str) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.source == source)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}
