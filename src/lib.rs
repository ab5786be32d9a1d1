//! Log signal plumbing for an OTLP/HTTP exporter.
//!
//! - [`global`] hands out loggers before any backend exists and wires them to
//!   the first provider installed with [`global::set_logger_provider`].
//! - [`otlp`] builds the HTTP exporter configuration from options,
//!   `OTEL_EXPORTER_OTLP_*` environment variables and settings files.
//! - [`appender`] forwards records from the `log` and `tracing` facades.

#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
pub mod appender;
pub mod global;
pub mod level;
pub mod log_record;
pub mod logs;
pub mod otlp;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use global::{GlobalError, logger, logger_provider, set_logger_provider};
pub use level::{ParseSeverityError, Severity};
pub use log_record::LogRecord;
pub use logs::{Logger, LoggerConfig, LoggerProvider};
