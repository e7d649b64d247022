use std::sync::Mutex;

use log::Level;
use serde_json::Value;

/// Target used for every record emitted by [`LogFacade`].
pub const LOG_TARGET: &str = "shard_preflight";

/// Sink for startup narration.
///
/// Every diagnostic produced during validation goes through this trait,
/// so embedders can route it wherever their own logging lives.
pub trait StartupLogger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    /// Debug record carrying a structured payload.
    fn debug_with(&self, value: &Value, message: &str) {
        self.log(Level::Debug, &format!("{} {}", message, value));
    }

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Forwards startup narration to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl StartupLogger for LogFacade {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// A captured log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub payload: Option<Value>,
}

/// In-memory logger that keeps every record in emission order.
///
/// Used by tests to assert on exact diagnostics.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }

    /// All records captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Messages logged at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|record| record.level == level)
            .map(|record| record.message)
            .collect()
    }

    pub fn contains(&self, level: Level, message: &str) -> bool {
        self.records()
            .iter()
            .any(|record| record.level == level && record.message == message)
    }

    pub fn count(&self, level: Level) -> usize {
        self.records()
            .iter()
            .filter(|record| record.level == level)
            .count()
    }

    /// Payload attached to the first debug record with this message.
    pub fn payload_for(&self, message: &str) -> Option<Value> {
        self.records()
            .into_iter()
            .find(|record| record.message == message && record.payload.is_some())
            .and_then(|record| record.payload)
    }
}

impl StartupLogger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.push(LogRecord {
            level,
            message: message.to_string(),
            payload: None,
        });
    }

    fn debug_with(&self, value: &Value, message: &str) {
        self.push(LogRecord {
            level: Level::Debug,
            message: message.to_string(),
            payload: Some(value.clone()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_logger_keeps_order_and_levels() {
        let logger = RecordingLogger::new();
        logger.debug("first");
        logger.warn("second");
        logger.debug("third");

        assert_eq!(logger.messages(Level::Debug), vec!["first", "third"]);
        assert_eq!(logger.count(Level::Warn), 1);
        assert!(logger.contains(Level::Warn, "second"));
        assert!(!logger.contains(Level::Error, "second"));
    }

    #[test]
    fn test_recording_logger_captures_payload() {
        let logger = RecordingLogger::new();
        logger.debug_with(&json!({ "a": 1 }), "Using configuration:");

        assert_eq!(
            logger.payload_for("Using configuration:"),
            Some(json!({ "a": 1 }))
        );
        assert_eq!(logger.messages(Level::Debug), vec!["Using configuration:"]);
    }
}
