//! Declarative exporter settings loaded from serde sources or INI files.
//!
//! Every field is optional; [`ExporterSettings::into_options`] only produces
//! options for the fields that are present, so settings can be layered with
//! other option sources.

use std::collections::HashMap;
use std::fs;
use std::num::ParseIntError;
use std::path::Path;
use std::time::Duration;

use ini::{Ini, Properties};
use serde::{Deserialize, Serialize};

use super::config::{Compression, HttpOption};
use super::env::{parse_headers, parse_millis};
use super::retry::RetryConfig;
use super::ConfigError;

const RETRY_KEYS: [&str; 4] = [
    "retry_enabled",
    "retry_initial_interval_ms",
    "retry_max_interval_ms",
    "retry_max_elapsed_time_ms",
];

/// Exporter settings as they appear in configuration files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterSettings {
    pub endpoint: Option<String>,
    pub url_path: Option<String>,
    pub compression: Option<Compression>,
    pub insecure: Option<bool>,
    pub headers: Option<HashMap<String, String>>,
    pub timeout_ms: Option<u64>,
    pub retry: Option<RetryConfig>,
}

impl ExporterSettings {
    /// Convert the present fields into exporter options.
    pub fn into_options(self) -> Vec<HttpOption> {
        let mut options = Vec::new();
        if let Some(endpoint) = self.endpoint {
            options.push(HttpOption::endpoint(endpoint));
        }
        if let Some(path) = self.url_path {
            options.push(HttpOption::url_path(path));
        }
        if let Some(compression) = self.compression {
            options.push(HttpOption::compression(compression));
        }
        if let Some(insecure) = self.insecure {
            options.push(HttpOption::insecure(insecure));
        }
        if let Some(headers) = self.headers {
            options.push(HttpOption::headers(headers));
        }
        if let Some(timeout) = self.timeout_ms {
            options.push(HttpOption::timeout(Duration::from_millis(timeout)));
        }
        if let Some(retry) = self.retry {
            options.push(HttpOption::retry(retry));
        }
        options
    }

    /// Read settings from `section` of an INI document.
    ///
    /// A missing section yields empty settings. Unknown keys are rejected.
    pub fn from_ini_str(text: &str, section: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        match ini.section(Some(section)) {
            Some(props) => Self::from_properties(props),
            None => Ok(Self::default()),
        }
    }

    /// Read settings from `section` of the INI file at `path`.
    pub fn from_ini_file(path: impl AsRef<Path>, section: &str) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini_str(&text, section)
    }

    fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        for (key, value) in props.iter() {
            match key {
                "endpoint" => settings.endpoint = Some(value.trim().to_owned()),
                "url_path" => settings.url_path = Some(value.trim().to_owned()),
                "compression" => settings.compression = Some(value.parse()?),
                "insecure" => settings.insecure = Some(parse_flag(key, value)?),
                "headers" => settings.headers = Some(parse_headers(value)?),
                "timeout_ms" => {
                    let millis = value.trim().parse().map_err(|err: ParseIntError| {
                        ConfigError::invalid(key, value, err.to_string())
                    })?;
                    settings.timeout_ms = Some(millis);
                }
                _ if RETRY_KEYS.contains(&key) => {}
                _ => return Err(ConfigError::invalid(key, value, "unknown key")),
            }
        }
        settings.retry = retry_from_properties(props)?;
        Ok(settings)
    }
}

fn retry_from_properties(props: &Properties) -> Result<Option<RetryConfig>, ConfigError> {
    if !RETRY_KEYS.iter().any(|key| props.get(*key).is_some()) {
        return Ok(None);
    }
    let mut retry = RetryConfig::default();
    if let Some(value) = props.get("retry_enabled") {
        retry.enabled = parse_flag("retry_enabled", value)?;
    }
    if let Some(value) = props.get("retry_initial_interval_ms") {
        retry.initial_interval = parse_millis("retry_initial_interval_ms", value)?;
    }
    if let Some(value) = props.get("retry_max_interval_ms") {
        retry.max_interval = parse_millis("retry_max_interval_ms", value)?;
    }
    if let Some(value) = props.get("retry_max_elapsed_time_ms") {
        retry.max_elapsed_time = parse_millis("retry_max_elapsed_time_ms", value)?;
    }
    Ok(Some(retry))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
    }
}
