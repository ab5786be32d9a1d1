//! `log` crate bridge.

use std::sync::OnceLock;

use log::{Metadata, Record};

use super::{is_own_target, logger_name};
use crate::global;
use crate::level::Severity;
use crate::log_record::LogRecord;

/// [`log::Log`] implementation that emits every record on the global logger
/// named after the record target.
///
/// Source location details are attached as `code.*` attributes when present.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogBridge;

impl LogBridge {
    fn to_record(record: &Record<'_>) -> LogRecord {
        let severity = Severity::from(record.level());
        let mut converted = LogRecord::with_message(severity, record.args().to_string())
            .with_severity_text(record.level().as_str());
        if let Some(module) = record.module_path() {
            converted = converted.with_attribute("code.namespace", module);
        }
        if let Some(file) = record.file() {
            converted = converted.with_attribute("code.filepath", file);
        }
        if let Some(line) = record.line() {
            converted = converted.with_attribute("code.lineno", line.to_string());
        }
        converted
    }
}

fn is_enabled_by_global_max(level: log::Level) -> bool {
    log::max_level() >= level.to_level_filter()
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        is_enabled_by_global_max(metadata.level()) && !is_own_target(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let name = logger_name(record.target());
        global::logger(&name).emit(Self::to_record(record));
    }

    fn flush(&self) {}
}

static LOG_BRIDGE: LogBridge = LogBridge;
static INSTALL_RESULT: OnceLock<bool> = OnceLock::new();

/// Install [`LogBridge`] as the process-wide `log` logger.
///
/// Returns `false` when another logger was installed first. The outcome of
/// the first call is cached and returned by every later call.
pub fn install_log_bridge() -> bool {
    *INSTALL_RESULT.get_or_init(|| {
        if log::set_logger(&LOG_BRIDGE).is_err() {
            return false;
        }
        log::set_max_level(log::LevelFilter::Trace);
        true
    })
}
