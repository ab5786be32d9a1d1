//! TLS client settings for the exporter's HTTP connection.

use std::fs;
use std::path::Path;

use native_tls::{Certificate, TlsConnector};

use super::ConfigError;

/// A ready-to-use TLS connector for HTTPS exports.
#[derive(Clone)]
pub struct TlsClientConfig {
    connector: TlsConnector,
}

impl TlsClientConfig {
    /// Wrap an already configured connector.
    pub fn new(connector: TlsConnector) -> Self {
        Self { connector }
    }

    /// Build a connector trusting the PEM-encoded root certificate in `pem`
    /// in addition to the system roots.
    pub fn from_root_pem(pem: &[u8]) -> Result<Self, ConfigError> {
        let certificate = Certificate::from_pem(pem)?;
        let connector = TlsConnector::builder()
            .add_root_certificate(certificate)
            .build()?;
        Ok(Self::new(connector))
    }

    /// Like [`from_root_pem`](Self::from_root_pem), reading the certificate
    /// from `path`.
    pub fn from_root_pem_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let pem = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_root_pem(&pem)
    }

    pub fn connector(&self) -> &TlsConnector {
        &self.connector
    }
}

impl std::fmt::Debug for TlsClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsClientConfig").finish_non_exhaustive()
    }
}
