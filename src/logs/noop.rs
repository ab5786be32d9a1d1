use std::sync::Arc;

use crate::log_record::LogRecord;

use super::{Logger, LoggerConfig, LoggerProvider};

/// Provider whose loggers discard every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLoggerProvider;

impl NoopLoggerProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LoggerProvider for NoopLoggerProvider {
    fn logger_with_config(&self, _name: &str, _config: &LoggerConfig) -> Arc<dyn Logger> {
        Arc::new(NoopLogger)
    }
}

/// Logger that drops everything it receives.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn emit(&self, _record: LogRecord) {}
}
