//! Configuration options for the OTLP/HTTP log exporter.
//!
//! Each `with_*` function returns an [`HttpOption`] that changes exactly one
//! field of the exporter [`Config`]. Options are folded in the order given, so
//! the last option for a field wins:
//!
//! ```
//! use std::time::Duration;
//! use otlplogs::otlp::{self, Compression};
//!
//! let config = otlp::Config::default().apply_options([
//!     otlp::with_endpoint("collector:4318"),
//!     otlp::with_compression(Compression::Gzip),
//!     otlp::with_timeout(Duration::from_secs(3)),
//! ]);
//! assert_eq!(config.url(), "https://collector:4318/v1/logs");
//! ```
//!
//! [`new_http_config`] additionally reads the standard `OTEL_EXPORTER_OTLP_*`
//! environment variables before applying explicit options.

mod config;
pub mod env;
mod error;
pub mod retry;
mod settings;
mod tls;


use std::collections::HashMap;
use std::time::Duration;

pub use config::{
    new_http_config, Compression, Config, HttpOption, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT,
    DEFAULT_URL_PATH,
};
pub use error::ConfigError;
pub use retry::{ExponentialBackoff, RetryConfig};
pub use settings::ExporterSettings;
pub use tls::TlsClientConfig;

/// Set the collector address as `host[:port]`.
///
/// The endpoint must not contain a scheme or URL path; use [`with_insecure`]
/// and [`with_url_path`] for those. Defaults to [`DEFAULT_ENDPOINT`].
pub fn with_endpoint(endpoint: impl Into<String>) -> HttpOption {
    HttpOption::endpoint(endpoint.into())
}

/// Compress export payloads with `compression`.
pub fn with_compression(compression: Compression) -> HttpOption {
    HttpOption::compression(compression)
}

/// Override the URL path logs are posted to. Defaults to [`DEFAULT_URL_PATH`].
pub fn with_url_path(url_path: impl Into<String>) -> HttpOption {
    HttpOption::url_path(url_path.into())
}

/// Use custom TLS settings, e.g. to trust a private certificate authority.
pub fn with_tls_client_config(tls: TlsClientConfig) -> HttpOption {
    HttpOption::tls_client_config(tls)
}

/// Connect to the collector over plain HTTP instead of HTTPS.
pub fn with_insecure() -> HttpOption {
    HttpOption::insecure(true)
}

/// Send `headers` with every export request, replacing previously configured
/// headers.
///
/// Setting `Content-Length`, `Content-Encoding` or `Content-Type` here can
/// break the exporter.
pub fn with_headers(headers: HashMap<String, String>) -> HttpOption {
    HttpOption::headers(headers)
}

/// Maximum time the backend gets to process one export request.
/// Defaults to [`DEFAULT_TIMEOUT`].
pub fn with_timeout(timeout: Duration) -> HttpOption {
    HttpOption::timeout(timeout)
}

/// Retry policy for transient export failures. See [`RetryConfig`] for the
/// defaults.
pub fn with_retry(retry: RetryConfig) -> HttpOption {
    HttpOption::retry(retry)
}
