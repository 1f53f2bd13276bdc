//! Structured logging for the helmet monitoring service
//!
//! Provides context-rich logging with worker identifiers, timestamps, and
//! severity levels. Supports both console output and file-based logging for
//! long-running watch sessions.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::HelmetError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses a config/env level name. Accepts `warn` and `warning`.
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Feed,
    Events,
    Session,
    Monitor,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Feed => write!(f, "FEED"),
            Component::Events => write!(f, "EVENTS"),
            Component::Session => write!(f, "SESSION"),
            Component::Monitor => write!(f, "MONITOR"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - stale route param or an id that no longer exists
    Expected,
    /// Unexpected failure - indicates misconfiguration or broken storage
    Unexpected,
    /// Unknown - feed hiccup; treated as transient, no retry
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, component: Component, worker_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = format_entry(level, component, worker_id, message);
        let worker_part = worker_id.map(|w| format!(" [worker {}]", w)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, worker_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, worker_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// One log line as written to file: timestamp, level, component, context.
pub fn format_entry(level: LogLevel, component: Component, worker_id: Option<&str>, message: &str) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let worker_part = worker_id.map(|w| format!(" [worker {}]", w)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, component, worker_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, component: Component, worker_id: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, worker_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, worker_id: Option<&str>, message: &str) {
    emit(LogLevel::Info, component, worker_id, message);
}

/// Log a warning message
pub fn warn(component: Component, worker_id: Option<&str>, message: &str) {
    emit(LogLevel::Warning, component, worker_id, message);
}

/// Log an error message
pub fn error(component: Component, worker_id: Option<&str>, message: &str) {
    emit(LogLevel::Error, component, worker_id, message);
}

/// Log a debug message
pub fn debug(component: Component, worker_id: Option<&str>, message: &str) {
    emit(LogLevel::Debug, component, worker_id, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an accessor failure.
///
/// Every feed failure is currently treated as transient; there is no retry
/// policy and no distinction from permanent outages.
pub fn classify_failure(err: &HelmetError) -> FailureType {
    match err {
        HelmetError::WorkerNotFound(_)
        | HelmetError::HelmetNotFound(_)
        | HelmetError::EventNotFound(_)
        | HelmetError::InvalidCredentials
        | HelmetError::UserExists(_)
        | HelmetError::InvalidFilter(_) => FailureType::Expected,
        HelmetError::FeedUnavailable(_) => FailureType::Unknown,
        HelmetError::SessionStorage(_) | HelmetError::Config(_) => FailureType::Unexpected,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an accessor failure with automatic classification.
///
/// Views call this and then keep their last-known-good state.
pub fn log_failure(component: Component, worker_id: Option<&str>, operation: &str, err: &HelmetError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(component, worker_id, &message),
        FailureType::Unexpected => error(component, worker_id, &message),
        FailureType::Unknown => warn(component, worker_id, &message),
    }
}

// ---------------------------------------------------------------------------
// Verification Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a feed self-check
pub fn log_verification_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Feed check complete: {}/{} successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(Component::Feed, None, &message);
    } else if successful == 0 {
        error(Component::Feed, None, &message);
    } else {
        warn(Component::Feed, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse(" debug "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn test_failure_classification() {
        let not_found = HelmetError::EventNotFound("E99".to_string());
        assert_eq!(classify_failure(&not_found), FailureType::Expected);

        let feed = HelmetError::FeedUnavailable("helmet gateway timeout".to_string());
        assert_eq!(classify_failure(&feed), FailureType::Unknown);

        let storage = HelmetError::SessionStorage("permission denied".to_string());
        assert_eq!(classify_failure(&storage), FailureType::Unexpected);
    }

    #[test]
    fn test_format_entry_includes_context() {
        let line = format_entry(LogLevel::Warning, Component::Monitor, Some("3"), "poll failed");
        assert!(line.contains("WARN MONITOR [worker 3]: poll failed"), "got {}", line);
    }
}
