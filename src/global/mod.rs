//! Process-wide logger provider.
//!
//! Until [`set_logger_provider`] is called, [`logger_provider`] hands out a
//! [`DelegatingLoggerProvider`] whose loggers silently drop records. The first
//! installed provider is wired into every logger issued so far, so callers can
//! acquire loggers during start-up and keep them for the life of the process.
//!
//! State lives behind a `parking_lot::RwLock`. Installation into the
//! placeholder happens before the write lock is taken, and the placeholder
//! calls into the new provider without holding its own lock, so a provider
//! may itself call [`logger`] while creating loggers.

mod placeholder;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use delegate::delegate;
use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use thiserror::Error;

use crate::logs::{Logger, LoggerConfig, LoggerProvider};

pub use placeholder::{DelegatingLogger, DelegatingLoggerProvider};

/// Errors reported when installing a logger provider.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GlobalError {
    /// The placeholder already forwards to a provider.
    #[error("a logger provider has already been installed")]
    DelegateAlreadySet,
    /// The global placeholder was passed as its own delegate.
    #[error("the global placeholder provider cannot delegate to itself")]
    SelfDelegation,
}

struct GlobalState {
    placeholder: Arc<DelegatingLoggerProvider>,
    current: Arc<dyn LoggerProvider>,
}

impl GlobalState {
    fn new() -> Self {
        let placeholder = Arc::new(DelegatingLoggerProvider::new());
        Self {
            current: Arc::clone(&placeholder) as Arc<dyn LoggerProvider>,
            placeholder,
        }
    }
}

static GLOBAL: Lazy<RwLock<GlobalState>> = Lazy::new(|| RwLock::new(GlobalState::new()));

/// Cloneable handle to the provider that was current when it was obtained.
#[derive(Clone)]
pub struct GlobalLoggerProvider {
    inner: Arc<dyn LoggerProvider>,
}

impl LoggerProvider for GlobalLoggerProvider {
    delegate! {
        to self.inner {
            fn logger_with_config(&self, name: &str, config: &LoggerConfig) -> Arc<dyn Logger>;
            fn logger(&self, name: &str) -> Arc<dyn Logger>;
            fn placeholder(&self) -> Option<&DelegatingLoggerProvider>;
        }
    }
}

impl std::fmt::Debug for GlobalLoggerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalLoggerProvider").finish_non_exhaustive()
    }
}

/// Return the current global provider.
pub fn logger_provider() -> GlobalLoggerProvider {
    GlobalLoggerProvider {
        inner: Arc::clone(&GLOBAL.read().current),
    }
}

/// Acquire a logger from the current global provider.
pub fn logger(name: &str) -> Arc<dyn Logger> {
    logger_provider().logger(name)
}

/// Acquire a logger with explicit scope settings from the global provider.
pub fn logger_with_config(name: &str, config: &LoggerConfig) -> Arc<dyn Logger> {
    logger_provider().logger_with_config(name, config)
}

/// Install `provider` as the global logger provider.
///
/// The first successful call binds every logger handed out so far to
/// `provider`. Later calls only change which provider serves new requests;
/// loggers issued before the first installation stay bound to the first
/// provider.
///
/// Returns [`GlobalError::SelfDelegation`] if `provider` is the global
/// placeholder itself, directly, through [`logger_provider`], or behind any
/// number of `Arc` layers. Custom wrappers must forward
/// [`LoggerProvider::placeholder`] to be detected.
pub fn set_logger_provider<P>(provider: P) -> Result<(), GlobalError>
where
    P: LoggerProvider + 'static,
{
    let placeholder = Arc::clone(&GLOBAL.read().placeholder);
    let provider: Arc<dyn LoggerProvider> = Arc::new(provider);
    match placeholder.set_delegate(Arc::clone(&provider)) {
        Ok(()) => {}
        Err(GlobalError::DelegateAlreadySet) => {
            debug!("replacing global logger provider; existing loggers keep their first binding");
        }
        Err(err) => return Err(err),
    }

    GLOBAL.write().current = provider;
    Ok(())
}

/// Replace the process-wide state with a fresh placeholder.
///
/// Loggers issued before the reset keep whatever binding they had.
#[cfg(any(test, feature = "test-util"))]
pub fn reset_global_state() {
    *GLOBAL.write() = GlobalState::new();
}
