//! Placeholder provider that forwards to a backend once one is installed.
//!
//! Loggers requested before installation are cached by `(name, version)` so
//! repeated requests observe the same handle. Installation binds every cached
//! handle to a backend logger and discards the cache; later requests go
//! straight to the backend.

use std::collections::{HashMap, hash_map::Entry};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::log_record::LogRecord;
use crate::logs::{Logger, LoggerConfig, LoggerProvider};

use super::GlobalError;

/// Identity of a placeholder logger while no backend is installed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LoggerKey {
    name: String,
    version: String,
}

#[derive(Default)]
struct Registry {
    loggers: HashMap<LoggerKey, Arc<DelegatingLogger>>,
    delegate: Option<Arc<dyn LoggerProvider>>,
}

/// Provider handing out [`DelegatingLogger`] placeholders until a backend is
/// installed with [`set_delegate`](Self::set_delegate).
#[derive(Default)]
pub struct DelegatingLoggerProvider {
    registry: Mutex<Registry>,
}

impl DelegatingLoggerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `provider` as the backend and rebind every issued placeholder.
    ///
    /// Only the first call takes effect; later calls return
    /// [`GlobalError::DelegateAlreadySet`] and leave the first backend in
    /// place. A provider that wraps this placeholder is rejected with
    /// [`GlobalError::SelfDelegation`].
    ///
    /// Placeholders are bound after the registry lock is released, so
    /// `provider` may acquire loggers from this registry while it creates
    /// them. Records emitted on a placeholder before its binding completes
    /// are dropped.
    pub fn set_delegate(&self, provider: Arc<dyn LoggerProvider>) -> Result<(), GlobalError> {
        if provider
            .placeholder()
            .is_some_and(|inner| std::ptr::eq(inner, self))
        {
            return Err(GlobalError::SelfDelegation);
        }

        let loggers = {
            let mut registry = self.registry.lock();
            if registry.delegate.is_some() {
                return Err(GlobalError::DelegateAlreadySet);
            }
            registry.delegate = Some(Arc::clone(&provider));
            std::mem::take(&mut registry.loggers)
        };

        let mut dropped = 0;
        for logger in loggers.values() {
            logger.bind_delegate(provider.as_ref());
            dropped += logger.dropped_records();
        }

        debug!(
            "logger provider installed: bound {} placeholder loggers, \
             {dropped} records were dropped before installation",
            loggers.len()
        );
        Ok(())
    }

    /// Whether a backend has been installed.
    pub fn is_delegated(&self) -> bool {
        self.registry.lock().delegate.is_some()
    }

    /// Number of cached placeholders. Always zero once a backend is installed.
    pub fn placeholder_count(&self) -> usize {
        self.registry.lock().loggers.len()
    }

    #[cfg(test)]
    pub(crate) fn placeholders(&self) -> Vec<Arc<DelegatingLogger>> {
        self.registry.lock().loggers.values().cloned().collect()
    }
}

impl LoggerProvider for DelegatingLoggerProvider {
    fn logger_with_config(&self, name: &str, config: &LoggerConfig) -> Arc<dyn Logger> {
        let mut registry = self.registry.lock();

        if let Some(delegate) = registry.delegate.clone() {
            drop(registry);
            return delegate.logger_with_config(name, config);
        }

        let key = LoggerKey {
            name: name.to_owned(),
            version: config.version().to_owned(),
        };
        match registry.loggers.entry(key) {
            Entry::Occupied(o) => Arc::clone(o.get()) as Arc<dyn Logger>,
            Entry::Vacant(v) => {
                let logger = Arc::new(DelegatingLogger::new(name, config.clone()));
                v.insert(Arc::clone(&logger));
                logger as Arc<dyn Logger>
            }
        }
    }

    fn placeholder(&self) -> Option<&DelegatingLoggerProvider> {
        Some(self)
    }
}

impl std::fmt::Debug for DelegatingLoggerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("DelegatingLoggerProvider")
            .field("placeholders", &registry.loggers.len())
            .field("delegated", &registry.delegate.is_some())
            .finish()
    }
}

/// Placeholder logger that drops records until it is bound to a backend.
///
/// The delegate slot is written once, by the installation that took this
/// placeholder out of the registry, and read without locking on every
/// [`emit`](Logger::emit).
pub struct DelegatingLogger {
    name: String,
    config: LoggerConfig,
    delegate: OnceCell<Arc<dyn Logger>>,
    dropped_records: AtomicU64,
}

impl DelegatingLogger {
    fn new(name: &str, config: LoggerConfig) -> Self {
        Self {
            name: name.to_owned(),
            config,
            delegate: OnceCell::new(),
            dropped_records: AtomicU64::new(0),
        }
    }

    /// Bind to a logger obtained from `provider` with this placeholder's
    /// original name and configuration. A second bind is ignored.
    fn bind_delegate(&self, provider: &dyn LoggerProvider) {
        self.delegate
            .get_or_init(|| provider.logger_with_config(&self.name, &self.config));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Whether records are being forwarded to a backend.
    pub fn is_bound(&self) -> bool {
        self.delegate.get().is_some()
    }

    /// Records discarded because no backend was bound at emit time.
    pub fn dropped_records(&self) -> u64 {
        self.dropped_records.load(Ordering::Relaxed)
    }
}

impl Logger for DelegatingLogger {
    fn emit(&self, record: LogRecord) {
        match self.delegate.get() {
            Some(delegate) => delegate.emit(record),
            None => {
                self.dropped_records.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl std::fmt::Debug for DelegatingLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatingLogger")
            .field("name", &self.name)
            .field("version", &self.config.version())
            .field("bound", &self.is_bound())
            .finish()
    }
}
