//! Options supplied when acquiring a logger.

use std::collections::BTreeMap;

/// Instrumentation scope settings attached to a logger acquisition.
///
/// The version participates in the identity of placeholder loggers handed out
/// by [`DelegatingLoggerProvider`](crate::global::DelegatingLoggerProvider);
/// the remaining fields are passed through to the installed backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoggerConfig {
    version: Option<String>,
    schema_url: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the instrumentation library version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the schema URL describing the emitted telemetry.
    pub fn with_schema_url(mut self, schema_url: impl Into<String>) -> Self {
        self.schema_url = Some(schema_url.into());
        self
    }

    /// Add a scope attribute, replacing any previous value for `key`.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Instrumentation version, or the empty string when unset.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }

    pub fn schema_url(&self) -> Option<&str> {
        self.schema_url.as_deref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}
