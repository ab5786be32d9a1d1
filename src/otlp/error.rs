use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning external configuration into exporter options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value could not be interpreted for the given key.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    /// Building the TLS connector failed.
    #[error("TLS configuration failed: {0}")]
    Tls(#[from] native_tls::Error),
    /// A referenced file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The INI document is malformed.
    #[error("invalid INI document: {0}")]
    Ini(#[from] ini::ParseError),
}

impl ConfigError {
    pub(crate) fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
