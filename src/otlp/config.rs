//! Exporter configuration and the option tokens that mutate it.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env;
use super::retry::RetryConfig;
use super::tls::TlsClientConfig;
use super::ConfigError;

/// Collector address used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "localhost:4318";
/// URL path logs are posted to when none is configured.
pub const DEFAULT_URL_PATH: &str = "/v1/logs";
/// Maximum time the backend gets to process one export request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Compression applied to export payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Send payloads uncompressed.
    #[default]
    None,
    /// Compress payloads with gzip.
    Gzip,
}

impl Compression {
    pub fn as_str(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compression {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            _ => Err(ConfigError::invalid(
                "compression",
                s,
                "expected \"none\" or \"gzip\"",
            )),
        }
    }
}

/// Settings the HTTP log exporter is constructed from.
#[derive(Clone, Debug)]
pub struct Config {
    /// Collector `host[:port]`, without scheme or path.
    pub endpoint: String,
    /// Path appended to the endpoint; always starts with `/`.
    pub url_path: String,
    pub compression: Compression,
    /// Use plain HTTP instead of HTTPS.
    pub insecure: bool,
    /// Custom TLS settings; `None` uses the platform defaults.
    pub tls: Option<TlsClientConfig>,
    /// Extra headers sent with every export request.
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            url_path: DEFAULT_URL_PATH.to_owned(),
            compression: Compression::default(),
            insecure: false,
            tls: None,
            headers: HashMap::new(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Apply `options` in order; later options overwrite earlier ones.
    pub fn apply_options(mut self, options: impl IntoIterator<Item = HttpOption>) -> Self {
        for option in options {
            option.apply(&mut self);
        }
        self
    }

    /// Full export URL, e.g. `https://localhost:4318/v1/logs`.
    pub fn url(&self) -> String {
        let scheme = if self.insecure { "http" } else { "https" };
        format!("{scheme}://{}{}", self.endpoint, self.url_path)
    }
}

/// Build the exporter configuration: defaults, then `OTEL_EXPORTER_OTLP_*`
/// environment variables, then `options`.
pub fn new_http_config(options: impl IntoIterator<Item = HttpOption>) -> Config {
    Config::default()
        .apply_options(env::options_from_env())
        .apply_options(options)
}

/// A single configuration change for the HTTP exporter.
///
/// Created by the `with_*` functions in [`crate::otlp`] and folded into a
/// [`Config`] by [`new_http_config`] or [`Config::apply_options`].
#[derive(Clone, Debug)]
pub struct HttpOption(OptionKind);

#[derive(Clone, Debug)]
enum OptionKind {
    Endpoint(String),
    Compression(Compression),
    UrlPath(String),
    RawUrlPath(String),
    TlsClientConfig(TlsClientConfig),
    Insecure(bool),
    Headers(HashMap<String, String>),
    Timeout(Duration),
    Retry(RetryConfig),
}

impl HttpOption {
    pub(crate) fn endpoint(endpoint: String) -> Self {
        Self(OptionKind::Endpoint(endpoint))
    }

    pub(crate) fn compression(compression: Compression) -> Self {
        Self(OptionKind::Compression(compression))
    }

    pub(crate) fn url_path(path: String) -> Self {
        Self(OptionKind::UrlPath(path))
    }

    /// Set the URL path verbatim, bypassing [`clean_path`].
    pub(crate) fn raw_url_path(path: String) -> Self {
        Self(OptionKind::RawUrlPath(path))
    }

    pub(crate) fn tls_client_config(tls: TlsClientConfig) -> Self {
        Self(OptionKind::TlsClientConfig(tls))
    }

    pub(crate) fn insecure(insecure: bool) -> Self {
        Self(OptionKind::Insecure(insecure))
    }

    pub(crate) fn headers(headers: HashMap<String, String>) -> Self {
        Self(OptionKind::Headers(headers))
    }

    pub(crate) fn timeout(timeout: Duration) -> Self {
        Self(OptionKind::Timeout(timeout))
    }

    pub(crate) fn retry(retry: RetryConfig) -> Self {
        Self(OptionKind::Retry(retry))
    }

    /// Update the one field of `config` this option controls.
    pub fn apply(self, config: &mut Config) {
        match self.0 {
            OptionKind::Endpoint(endpoint) => config.endpoint = endpoint,
            OptionKind::Compression(compression) => config.compression = compression,
            OptionKind::UrlPath(path) => config.url_path = clean_path(&path, DEFAULT_URL_PATH),
            OptionKind::RawUrlPath(path) => config.url_path = path,
            OptionKind::TlsClientConfig(tls) => config.tls = Some(tls),
            OptionKind::Insecure(insecure) => config.insecure = insecure,
            OptionKind::Headers(headers) => config.headers = headers,
            OptionKind::Timeout(timeout) => config.timeout = timeout,
            OptionKind::Retry(retry) => config.retry = retry,
        }
    }
}

/// Normalise a URL path like a lexical path clean: drop empty and `.`
/// segments, resolve `..`, and ensure a leading `/`.
///
/// `..` cannot climb above the root of an absolute path, but leading `..`
/// segments of a relative path are kept. Input that cleans to nothing yields
/// `/` when absolute and `default` otherwise.
pub(crate) fn clean_path(path: &str, default: &str) -> String {
    let trimmed = path.trim();
    let rooted = trimmed.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in trimmed.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return if rooted {
            "/".to_owned()
        } else {
            default.to_owned()
        };
    }
    format!("/{}", segments.join("/"))
}
