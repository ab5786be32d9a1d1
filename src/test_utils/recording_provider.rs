//! A fake backend that remembers every logger it created and every record
//! emitted through those loggers.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::log_record::LogRecord;
use crate::logs::{Logger, LoggerConfig, LoggerProvider};

/// Arguments passed to one `logger_with_config` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedLogger {
    pub name: String,
    pub config: LoggerConfig,
}

#[derive(Default)]
struct Recorded {
    created: Vec<CreatedLogger>,
    emitted: Vec<(String, LogRecord)>,
}

/// Provider that stores creation calls and emitted records for assertions.
///
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct RecordingLoggerProvider {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingLoggerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every `(name, config)` a logger was created with.
    pub fn created(&self) -> Vec<CreatedLogger> {
        self.recorded.lock().created.clone()
    }

    /// Snapshot of `(logger name, record)` pairs in emission order.
    pub fn emitted(&self) -> Vec<(String, LogRecord)> {
        self.recorded.lock().emitted.clone()
    }

    /// Bodies of all emitted records, in emission order.
    pub fn bodies(&self) -> Vec<String> {
        self.recorded
            .lock()
            .emitted
            .iter()
            .filter_map(|(_, record)| record.body.clone())
            .collect()
    }
}

impl LoggerProvider for RecordingLoggerProvider {
    fn logger_with_config(&self, name: &str, config: &LoggerConfig) -> Arc<dyn Logger> {
        self.recorded.lock().created.push(CreatedLogger {
            name: name.to_owned(),
            config: config.clone(),
        });
        Arc::new(RecordingLogger {
            name: name.to_owned(),
            recorded: Arc::clone(&self.recorded),
        })
    }
}

/// Logger created by [`RecordingLoggerProvider`].
pub struct RecordingLogger {
    name: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl Logger for RecordingLogger {
    fn emit(&self, record: LogRecord) {
        self.recorded.lock().emitted.push((self.name.clone(), record));
    }
}
