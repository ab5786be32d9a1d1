//! Standard `OTEL_EXPORTER_OTLP_*` environment variables.
//!
//! Generic variables are read first and the `_LOGS_` variants second, so a
//! signal-specific value overrides the generic one. Values that cannot be
//! parsed are skipped with a warning; they never fail exporter construction.

use std::collections::HashMap;
use std::time::Duration;

use log::warn;
use percent_encoding::percent_decode_str;
use url::Url;

use super::config::{clean_path, Compression, HttpOption, DEFAULT_URL_PATH};
use super::tls::TlsClientConfig;
use super::ConfigError;

const GENERIC_PREFIX: &str = "OTEL_EXPORTER_OTLP_";
const LOGS_PREFIX: &str = "OTEL_EXPORTER_OTLP_LOGS_";

type ParseResult = Result<Vec<HttpOption>, ConfigError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Generic,
    Logs,
}

impl Scope {
    fn key(self, suffix: &str) -> String {
        match self {
            Scope::Generic => format!("{GENERIC_PREFIX}{suffix}"),
            Scope::Logs => format!("{LOGS_PREFIX}{suffix}"),
        }
    }
}

/// Options derived from the process environment.
pub fn options_from_env() -> Vec<HttpOption> {
    options_from_lookup(|key| std::env::var(key).ok())
}

/// Options derived from `lookup`, which maps a variable name to its value.
pub fn options_from_lookup<F>(lookup: F) -> Vec<HttpOption>
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = Vec::new();
    for scope in [Scope::Generic, Scope::Logs] {
        read_scope(scope, &lookup, &mut options);
    }
    options
}

fn read_scope<F>(scope: Scope, lookup: &F, options: &mut Vec<HttpOption>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut read = |suffix: &str, parse: fn(&str, &str, Scope) -> ParseResult| {
        let key = scope.key(suffix);
        let Some(value) = lookup(&key) else {
            return;
        };
        match parse(&key, &value, scope) {
            Ok(parsed) => options.extend(parsed),
            Err(err) => warn!("ignoring {key}: {err}"),
        }
    };

    read("ENDPOINT", parse_endpoint);
    read("INSECURE", |key, value, _| {
        parse_bool(key, value).map(|insecure| vec![HttpOption::insecure(insecure)])
    });
    read("CERTIFICATE", |_, value, _| {
        TlsClientConfig::from_root_pem_file(value.trim())
            .map(|tls| vec![HttpOption::tls_client_config(tls)])
    });
    read("HEADERS", |_, value, _| {
        parse_headers(value).map(|headers| vec![HttpOption::headers(headers)])
    });
    read("COMPRESSION", |_, value, _| {
        value
            .parse::<Compression>()
            .map(|compression| vec![HttpOption::compression(compression)])
    });
    read("TIMEOUT", |key, value, _| {
        parse_millis(key, value).map(|timeout| vec![HttpOption::timeout(timeout)])
    });
}

/// Split an endpoint URL into endpoint, path and transport security options.
///
/// The generic variable names a base URL to which `/v1/logs` is appended; the
/// logs variable names the full URL and its path is used unchanged, or `/`
/// when it has none.
fn parse_endpoint(key: &str, value: &str, scope: Scope) -> ParseResult {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigError::invalid(key, value, err.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| ConfigError::invalid(key, value, "URL has no host"))?;
    let endpoint = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };
    let path = match scope {
        Scope::Generic => {
            let joined = format!("{}{DEFAULT_URL_PATH}", url.path());
            HttpOption::url_path(clean_path(&joined, DEFAULT_URL_PATH))
        }
        Scope::Logs => match url.path() {
            "" => HttpOption::raw_url_path("/".to_owned()),
            path => HttpOption::raw_url_path(path.to_owned()),
        },
    };
    let insecure = matches!(url.scheme(), "http" | "unix");

    Ok(vec![
        HttpOption::endpoint(endpoint),
        path,
        HttpOption::insecure(insecure),
    ])
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected \"true\" or \"false\"")),
    }
}

pub(crate) fn parse_millis(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|err| ConfigError::invalid(key, value, err.to_string()))
}

/// Parse `key1=value1,key2=value2` with percent-encoded keys and values.
pub fn parse_headers(value: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut headers = HashMap::new();
    for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::invalid("headers", pair, "expected key=value"))?;
        let key = decode(raw_key)?;
        if key.is_empty() {
            return Err(ConfigError::invalid("headers", pair, "empty header name"));
        }
        headers.insert(key, decode(raw_value)?);
    }
    Ok(headers)
}

fn decode(raw: &str) -> Result<String, ConfigError> {
    percent_decode_str(raw.trim())
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|err| ConfigError::invalid("headers", raw, err.to_string()))
}
