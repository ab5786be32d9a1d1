//! Logger traits implemented by every logging backend.
//!
//! Application code obtains a [`Logger`] from a [`LoggerProvider`] and emits
//! [`LogRecord`] values through it. The global placeholder provider in
//! [`crate::global`] implements the same traits so callers never need to know
//! whether a real backend is installed yet.

mod config;
mod noop;

use std::sync::Arc;

use crate::global::DelegatingLoggerProvider;
use crate::log_record::LogRecord;

pub use config::LoggerConfig;
pub use noop::{NoopLogger, NoopLoggerProvider};

/// A named source of log records.
///
/// `Logger` is `Send + Sync` so a single handle can be shared across threads.
/// Implementations must not block the caller for long inside [`emit`].
///
/// [`emit`]: Logger::emit
pub trait Logger: Send + Sync {
    /// Dispatch a log record.
    fn emit(&self, record: LogRecord);
}

/// Factory for [`Logger`] handles.
pub trait LoggerProvider: Send + Sync {
    /// Return a logger for `name` configured by `config`.
    fn logger_with_config(&self, name: &str, config: &LoggerConfig) -> Arc<dyn Logger>;

    /// Return a logger for `name` with no version, schema URL or attributes.
    fn logger(&self, name: &str) -> Arc<dyn Logger> {
        self.logger_with_config(name, &LoggerConfig::default())
    }

    /// The placeholder registry this provider is, or wraps.
    ///
    /// Wrappers forward the call so installation can detect a placeholder
    /// being made its own backend. Backends keep the default.
    #[doc(hidden)]
    fn placeholder(&self) -> Option<&DelegatingLoggerProvider> {
        None
    }
}

impl<P: LoggerProvider + ?Sized> LoggerProvider for Arc<P> {
    fn logger_with_config(&self, name: &str, config: &LoggerConfig) -> Arc<dyn Logger> {
        (**self).logger_with_config(name, config)
    }

    fn logger(&self, name: &str) -> Arc<dyn Logger> {
        (**self).logger(name)
    }

    fn placeholder(&self) -> Option<&DelegatingLoggerProvider> {
        (**self).placeholder()
    }
}
